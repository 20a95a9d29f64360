// ==========================================
// 商品目录导入 - 导入层
// ==========================================
// 职责: CSV → 商品目录（商品/变体/品牌/类目/标签/concern/图片）
// 依赖顺序: 数据清洗 → 唯一 slug → 实体查找 → 按实体同步
//           → 商品 upsert → 主表落库 → 编排
// ==========================================

// 模块声明
pub mod catalog_importer;
pub mod catalog_importer_trait;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod lookups;
pub mod master_grouper;
pub mod master_processor;
pub mod product_upserter;
pub mod schema_detector;
pub mod session;
pub mod slug_service;
pub mod syncers;
pub mod template_importer;

// 重导出核心类型
pub use catalog_importer::CatalogImporterImpl;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, CsvRow, RawCsv};
pub use master_grouper::MasterGrouper;
pub use master_processor::MasterProcessor;
pub use product_upserter::{ProductRefs, ProductUpserter};
pub use schema_detector::detect_schema;
pub use session::ImportSession;
pub use slug_service::{ensure_unique_slug, slugify};
pub use template_importer::TemplateImporter;

// 重导出 Trait 接口
pub use catalog_importer_trait::{CatalogImporter, FileParser};
