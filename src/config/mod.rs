// ==========================================
// 商品目录导入 - 配置层
// ==========================================
// 职责: 导入参数管理（默认值 + config_kv 覆写）
// 存储: config_kv 表 (key-value + scope)
// ==========================================

pub mod config_manager;
pub mod import_config;

// 重导出核心配置类型
pub use config_manager::{config_keys, default_db_path, ConfigManager};
pub use import_config::ImportConfig;
