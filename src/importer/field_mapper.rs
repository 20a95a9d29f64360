// ==========================================
// 商品目录导入 - 字段映射
// ==========================================
// 职责: 标准字段 → 表头别名列表；从原始行取值
// 说明: 表头已在读取阶段标准化为小写
// ==========================================

use crate::importer::file_parser::CsvRow;

/// 一个标准字段可接受的表头别名
pub trait ColumnSpec: Copy {
    fn aliases(&self) -> &'static [&'static str];
}

// ==========================================
// 模板形态字段（一行 = 一个商品）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateField {
    Name,
    Slug,
    Description,
    BasePrice,
    Weight,
    IsFlashSale,
    Status,
    CategoryTypeId,
    BrandId,
    PersonaId,
    HowToUse,
}

impl ColumnSpec for TemplateField {
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            TemplateField::Name => &["name"],
            TemplateField::Slug => &["slug"],
            TemplateField::Description => &["description"],
            TemplateField::BasePrice => &["base_price"],
            TemplateField::Weight => &["weight"],
            TemplateField::IsFlashSale => &["is_flash_sale"],
            TemplateField::Status => &["status"],
            TemplateField::CategoryTypeId => &["category_type_id"],
            TemplateField::BrandId => &["brand_id"],
            TemplateField::PersonaId => &["persona_id"],
            TemplateField::HowToUse => &["how_to_use"],
        }
    }
}

// ==========================================
// 主表形态字段（一行 = 一个变体）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterField {
    ProductName,
    VariantName,
    SkuMaster,
    SkuVariant,
    Brand,
    Category,
    SubCategory,
    SubSubCategory,
    Tags,
    Concern,
    ConcernOptions,
    Photos,
    VariantPhoto,
    BasePrice,
    VariantPrice,
    Stock,
    Weight,
    Description,
    HowToUse,
    Status,
    Bpom,
    Ingredients,
}

impl ColumnSpec for MasterField {
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            MasterField::ProductName => &["nama produk"],
            MasterField::VariantName => &["nama varian"],
            MasterField::SkuMaster => &["sku master"],
            MasterField::SkuVariant => &["sku varian", "barcode"],
            MasterField::Brand => &["brand", "merek"],
            MasterField::Category => &["kategori"],
            MasterField::SubCategory => &["sub kategori"],
            MasterField::SubSubCategory => &["sub sub kategori"],
            MasterField::Tags => &["tags", "tag"],
            MasterField::Concern => &["concern"],
            MasterField::ConcernOptions => &["opsi concern", "sub concern"],
            MasterField::Photos => &["foto produk", "foto"],
            MasterField::VariantPhoto => &["foto varian"],
            MasterField::BasePrice => &["harga dasar", "base price"],
            MasterField::VariantPrice => &["harga", "harga varian"],
            MasterField::Stock => &["stok", "stock"],
            MasterField::Weight => &["berat", "weight"],
            MasterField::Description => &["deskripsi", "description"],
            MasterField::HowToUse => &["cara pakai", "how to use"],
            MasterField::Status => &["status"],
            MasterField::Bpom => &["bpom"],
            MasterField::Ingredients => &["ingredients", "komposisi"],
        }
    }
}

/// 取字段值: 依次尝试别名，返回第一个非空值；都没有则返回 ""
pub fn field_value<F: ColumnSpec>(row: &CsvRow, field: F) -> &str {
    field
        .aliases()
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// 取字段值（空值为 None）
pub fn field_opt<F: ColumnSpec>(row: &CsvRow, field: F) -> Option<String> {
    let value = field_value(row, field);
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
