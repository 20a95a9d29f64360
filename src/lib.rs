// ==========================================
// 商品目录导入 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 定位: 后台批量导入（CSV → 商品目录），单事务落库
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "id");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与导入模型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 导入管道
pub mod importer;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ConfigManager, ImportConfig};
pub use domain::{CsvSchema, ImportOutcome, ImportRowError, ImportStats, RowRef};
pub use importer::{CatalogImporter, CatalogImporterImpl, ImportError, ImportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
