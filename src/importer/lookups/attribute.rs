// ==========================================
// 商品目录导入 - 属性查找
// ==========================================
// 用途: 合成变体属性（默认 "Varian"）每次运行惰性创建一次
// 竞争: 新建时唯一约束冲突视为并发创建，重新查询；再失败则为硬错误
// ==========================================

use crate::importer::data_cleaner::normalize_key;
use crate::importer::lookups::LookupCache;
use crate::importer::slug_service::ensure_unique_slug;
use crate::repository::{NamedEntityRepository, NamedTable, RepositoryError, RepositoryResult};
use rusqlite::Transaction;
use tracing::warn;

#[derive(Debug, Default)]
pub struct AttributeLookup {
    cache: LookupCache,
}

impl AttributeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&mut self, tx: &Transaction, name: &str) -> RepositoryResult<i64> {
        let key = normalize_key(name);
        if let Some(id) = self.cache.get(&key) {
            return Ok(id);
        }

        let id = match NamedEntityRepository::find_id_by_name(tx, NamedTable::Attributes, name)? {
            Some(id) => id,
            None => create_or_refetch(tx, name)?,
        };

        self.cache.insert(key, id);
        Ok(id)
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }
}

fn create_or_refetch(tx: &Transaction, name: &str) -> RepositoryResult<i64> {
    let slug = ensure_unique_slug(tx, NamedTable::Attributes.catalog_table(), name)?;
    match NamedEntityRepository::insert(tx, NamedTable::Attributes, name, &slug) {
        Ok(id) => Ok(id),
        Err(RepositoryError::UniqueConstraintViolation(msg)) => {
            warn!(name = %name, error = %msg, "属性并发创建，重新查询");
            NamedEntityRepository::find_id_by_name(tx, NamedTable::Attributes, name)?.ok_or_else(
                || RepositoryError::NotFound {
                    entity: "attributes".to_string(),
                    key: name.to_string(),
                },
            )
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_created_once_per_run() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        let mut lookup = AttributeLookup::new();

        let a = lookup.get_id(&tx, "Varian").unwrap();
        let b = lookup.get_id(&tx, "varian").unwrap();
        assert_eq!(a, b);

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM attributes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_unique_violation_refetches() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        // 另一事务抢先创建了同名属性（slug 不同）
        tx.execute("INSERT INTO attributes (name, slug) VALUES ('Varian', 'varian-x')", [])
            .unwrap();
        let existing = tx.last_insert_rowid();

        assert_eq!(create_or_refetch(&tx, "Varian").unwrap(), existing);
    }

    #[test]
    fn test_unique_violation_without_row_is_hard_error() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        // 唯一冲突后重新查询仍找不到
        tx.execute_batch(
            r#"
            CREATE TRIGGER reject_attribute BEFORE INSERT ON attributes
            BEGIN SELECT RAISE(ABORT, 'UNIQUE constraint failed: attributes.name'); END;
            "#,
        )
        .unwrap();

        let mut lookup = AttributeLookup::new();
        let result = lookup.get_id(&tx, "Varian");
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(lookup.cache.is_empty());
    }
}
