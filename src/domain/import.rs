// ==========================================
// 商品目录导入 - 导入领域模型
// ==========================================
// 用途: 行级模型（校验后强类型）、分组聚合、导入结果
// 红线: 这些对象只存在于一次导入运行内，不落库
// ==========================================

use crate::domain::catalog::ProductStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// CsvSchema - 文件形态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvSchema {
    Template, // 一行 = 一个商品
    Master,   // 一行 = 一个变体，按商品分组
}

// ==========================================
// RowRef - 错误行号
// ==========================================
// 序列化为数字行号或 "-"（无具体行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowRef {
    Line(usize),
    Label(String),
}

impl RowRef {
    /// 文件级错误（无具体行）
    pub fn file() -> Self {
        RowRef::Label("-".to_string())
    }
}

// ==========================================
// ImportRowError - 行级错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: RowRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
}

impl ImportRowError {
    pub fn at(row_number: usize, name: Option<String>, message: impl Into<String>) -> Self {
        Self {
            row: RowRef::Line(row_number),
            name,
            message: message.into(),
        }
    }
}

// ==========================================
// ImportStats - 运行计数器
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub product_created: usize,
    pub product_updated: usize,
    pub variant_created: usize,
    pub media_created: usize,
    pub tag_attached: usize,
    pub concern_attached: usize,
    pub variant_attr_attached: usize,
    pub online_created: usize,
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
// stats 仅主表路径返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub errors: Vec<ImportRowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ImportStats>,
}

impl ImportOutcome {
    pub fn new(errors: Vec<ImportRowError>, stats: Option<ImportStats>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
            stats,
        }
    }
}

// ==========================================
// TemplateRow - 模板行（校验通过后）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRow {
    pub row_number: usize,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<f64>,
    pub weight: Option<f64>,
    pub is_flash_sale: bool,
    pub status: Option<ProductStatus>,
    pub category_type_id: i64,
    pub brand_id: Option<i64>,
    pub persona_id: Option<i64>,
    pub how_to_use: Option<String>,
}

// ==========================================
// MasterVariantRow - 主表变体行
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MasterVariantRow {
    pub row_number: usize,
    pub name: String,
    pub sku_master: Option<String>,
    pub sku_variant: Option<String>,
    pub stock: i64,
    pub price: Option<f64>,
    pub photo: Option<String>,
    pub bpom: Option<String>,
    pub ingredients: Option<String>,
}

// ==========================================
// MasterGroup - 单个商品的聚合
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MasterGroup {
    pub key: String,
    pub name: String,
    pub master_sku: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub sub_sub_category: Option<String>,
    pub tags: Vec<String>,
    pub concern: Option<String>,
    pub concern_options: Option<String>,
    pub photos: Vec<String>,
    pub base_price: Option<f64>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub how_to_use: Option<String>,
    pub status: Option<String>,
    pub variants: Vec<MasterVariantRow>,
}

impl MasterGroup {
    /// 商品图 + 各变体图（去重，保持顺序）
    pub fn media_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = Vec::new();
        let variant_photos = self.variants.iter().filter_map(|v| v.photo.clone());
        for url in self.photos.iter().cloned().chain(variant_photos) {
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
        urls
    }
}
