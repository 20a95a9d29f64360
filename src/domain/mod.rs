// ==========================================
// 商品目录导入 - 领域模型层
// ==========================================
// 职责: 定义目录实体、导入行模型、导入结果
// 红线: 不含数据访问逻辑
// ==========================================

pub mod catalog;
pub mod import;

// 重导出核心类型
pub use catalog::{
    NewProduct, PivotColumns, PivotMeta, Product, ProductStatus, ProductUpdate, VariantDraft,
};
pub use import::{
    CsvSchema, ImportOutcome, ImportRowError, ImportStats, MasterGroup, MasterVariantRow,
    RowRef, TemplateRow,
};
