// ==========================================
// 商品目录导入 - 目录领域模型
// ==========================================
// 用途: 导入管道读写的目录实体（仅导入所需字段）
// 对齐: migrations/catalog_schema.sql
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ProductStatus - 商品状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Normal,
    War,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Normal => "normal",
            ProductStatus::War => "war",
        }
    }

    /// 严格解析（模板导入校验用）: 仅接受 normal / war / draft
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "draft" => Some(ProductStatus::Draft),
            "normal" => Some(ProductStatus::Normal),
            "war" => Some(ProductStatus::War),
            _ => None,
        }
    }

    /// 自由文本分类（主表导入用）
    ///
    /// 包含 "draft" → Draft；包含 "war" → War；
    /// 包含 "normal"/"aktif"/"active" 或其它 → Normal
    pub fn from_free_text(value: &str) -> Self {
        let lower = value.trim().to_lowercase();
        if lower.contains("draft") {
            ProductStatus::Draft
        } else if lower.contains("war") {
            ProductStatus::War
        } else {
            ProductStatus::Normal
        }
    }
}

// ==========================================
// Product - 商品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub master_sku: Option<String>,
    pub base_price: Option<f64>,
    pub status: ProductStatus,
    pub category_type_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub how_to_use: Option<String>,
}

/// 新建商品载荷
#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub master_sku: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub weight: Option<f64>,
    pub is_flash_sale: bool,
    pub status: Option<ProductStatus>,
    pub category_type_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub persona_id: Option<i64>,
    pub how_to_use: Option<String>,
}

/// 更新商品载荷
///
/// None 表示保持原值（不清空）
#[derive(Debug, Clone, Default)]
pub struct ProductUpdate {
    pub name: String,
    pub master_sku: Option<String>,
    pub base_price: Option<f64>,
    pub category_type_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub status: Option<ProductStatus>,
    pub how_to_use: Option<String>,
}

/// 变体写入载荷
#[derive(Debug, Clone)]
pub struct VariantDraft {
    pub product_id: i64,
    pub name: String,
    pub sku: Option<String>,
    pub sku_variant: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub bpom: Option<String>,
    pub ingredients: Option<String>,
    pub photo: Option<String>,
}

// ==========================================
// PivotMeta - 关联表形态探测结果
// ==========================================
// 用途: 一次运行只探测一次，传入同步器
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotColumns {
    pub columns: Vec<String>,
}

impl PivotColumns {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| c.to_lowercase()).collect(),
        }
    }

    /// 表是否存在（pragma_table_info 对缺失表返回空）
    pub fn exists(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn has(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotMeta {
    pub product_tags: PivotColumns,
    pub product_concerns: PivotColumns,
}

impl PivotMeta {
    pub fn tags_ready(&self) -> bool {
        self.product_tags.has("product_id") && self.product_tags.has("tag_id")
    }

    pub fn concerns_ready(&self) -> bool {
        self.product_concerns.has("product_id")
            && self.product_concerns.has("concern_id")
            && self.product_concerns.has("concern_option_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_free_text() {
        assert_eq!(ProductStatus::from_free_text("Draft Produk"), ProductStatus::Draft);
        assert_eq!(ProductStatus::from_free_text("WAR"), ProductStatus::War);
        assert_eq!(ProductStatus::from_free_text("aktif"), ProductStatus::Normal);
        assert_eq!(ProductStatus::from_free_text("Active"), ProductStatus::Normal);
        assert_eq!(ProductStatus::from_free_text(""), ProductStatus::Normal);
        assert_eq!(ProductStatus::from_free_text("lainnya"), ProductStatus::Normal);
    }

    #[test]
    fn test_status_strict() {
        assert_eq!(ProductStatus::parse_strict(" Normal "), Some(ProductStatus::Normal));
        assert_eq!(ProductStatus::parse_strict("aktif"), None);
    }

    #[test]
    fn test_pivot_readiness() {
        let meta = PivotMeta {
            product_tags: PivotColumns::new(vec!["product_id".into(), "tag_id".into()]),
            product_concerns: PivotColumns::new(vec!["product_id".into(), "concern_id".into()]),
        };
        assert!(meta.tags_ready());
        assert!(!meta.concerns_ready());
        assert!(!PivotColumns::default().exists());
    }
}
