// ==========================================
// 商品目录导入 - 导入参数
// ==========================================
// 职责: 定义一次导入运行所需的参数及默认值
// 红线: 不含数据访问逻辑
// ==========================================

use crate::i18n::DEFAULT_LOCALE;
use serde::{Deserialize, Serialize};

/// 默认最大行数（防止超大文件撑爆内存）
pub const DEFAULT_MAX_ROWS: usize = 50_000;

/// 默认的变体属性名
pub const DEFAULT_VARIANT_ATTRIBUTE_NAME: &str = "Varian";

/// 一级类目缺省名称
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";

// ==========================================
// ImportConfig - 导入参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// 行级错误信息语言
    pub locale: String,
    /// 变体值挂载的合成属性名
    pub variant_attribute_name: String,
    /// 一级类目为空时使用的名称
    pub default_category_name: String,
    /// 单个文件允许的最大数据行数
    pub max_rows: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            variant_attribute_name: DEFAULT_VARIANT_ATTRIBUTE_NAME.to_string(),
            default_category_name: DEFAULT_CATEGORY_NAME.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl ImportConfig {
    /// 参数合法性检查，返回第一处问题
    pub fn validate(&self) -> Result<(), String> {
        if self.max_rows == 0 {
            return Err("max_rows 必须大于 0".to_string());
        }
        if self.variant_attribute_name.trim().is_empty() {
            return Err("variant_attribute_name 不能为空".to_string());
        }
        if self.default_category_name.trim().is_empty() {
            return Err("default_category_name 不能为空".to_string());
        }
        Ok(())
    }
}
