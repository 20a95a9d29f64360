// ==========================================
// 商品目录导入 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载导入参数，缺省回落到默认值
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::config::import_config::ImportConfig;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 配置键
pub mod config_keys {
    pub const LOCALE: &str = "import.locale";
    pub const VARIANT_ATTRIBUTE_NAME: &str = "import.variant_attribute_name";
    pub const DEFAULT_CATEGORY_NAME: &str = "import.default_category_name";
    pub const MAX_ROWS: &str = "import.max_rows";
}

/// CLI 默认数据库路径（用户数据目录下）
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("catalog-import")
        .join("catalog.db")
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    pub fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 加载导入参数
    ///
    /// 空白值视为未配置
    pub fn load_import_config(&self) -> RepositoryResult<ImportConfig> {
        let mut config = ImportConfig::default();

        if let Some(v) = self.non_blank(config_keys::LOCALE)? {
            config.locale = v;
        }
        if let Some(v) = self.non_blank(config_keys::VARIANT_ATTRIBUTE_NAME)? {
            config.variant_attribute_name = v;
        }
        if let Some(v) = self.non_blank(config_keys::DEFAULT_CATEGORY_NAME)? {
            config.default_category_name = v;
        }
        if let Some(v) = self.non_blank(config_keys::MAX_ROWS)? {
            config.max_rows = v.parse().map_err(|_| RepositoryError::FieldValueError {
                field: config_keys::MAX_ROWS.to_string(),
                message: format!("无法解析为正整数: {}", v),
            })?;
        }

        debug!(?config, "导入参数已加载");
        Ok(config)
    }

    fn non_blank(&self, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
