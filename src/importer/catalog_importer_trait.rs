// ==========================================
// 商品目录导入 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::ImportOutcome;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawCsv;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 商品目录导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 从 CSV 文件导入商品目录
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 导入结果（行级错误 + 主表统计）
    /// - Err: 文件读取失败、事务内硬错误（已回滚）
    ///
    /// # 导入流程
    /// 1. 文件读取（分隔符嗅探 + 标准化）
    /// 2. 空文件 → 直接返回失败，不开事务
    /// 3. 形态判定（模板 / 主表）
    /// 4. 校验或分组（事务外，软错误）
    /// 5. 落库（单事务，硬错误回滚）
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为标准化后的行记录
    fn read(&self, path: &Path) -> ImportResult<RawCsv>;
}
