// ==========================================
// 商品目录导入 - 实体查找（get-or-create）
// ==========================================
// 流程: 规整键 → 缓存命中直接返回 → 按名称查询 → 生成唯一 slug 新建
//       → 回写缓存
// 约束: 缓存只在一次导入运行内有效，每次运行新建实例
// ==========================================

pub mod attribute;
pub mod brand;
pub mod category;
pub mod concern;
pub mod tag;

pub use attribute::AttributeLookup;
pub use brand::BrandLookup;
pub use category::CategoryLookup;
pub use concern::ConcernLookup;
pub use tag::TagLookup;

use crate::importer::data_cleaner::normalize_key;
use crate::importer::slug_service::ensure_unique_slug;
use crate::repository::{NamedEntityRepository, NamedTable, RepositoryResult};
use rusqlite::Transaction;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// LookupCache - 运行内缓存
// ==========================================
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<String, i64>,
}

impl LookupCache {
    pub fn get(&self, key: &str) -> Option<i64> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: String, id: i64) {
        self.entries.insert(key, id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空缓存
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// 名称全局唯一实体的 get-or-create（brands / tags / concerns）
///
/// 名称为空时返回 None
pub(crate) fn resolve_named(
    tx: &Transaction,
    cache: &mut LookupCache,
    table: NamedTable,
    name: &str,
) -> RepositoryResult<Option<i64>> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let key = normalize_key(name);
    if let Some(id) = cache.get(&key) {
        return Ok(Some(id));
    }

    let id = match NamedEntityRepository::find_id_by_name(tx, table, name)? {
        Some(id) => id,
        None => {
            let slug = ensure_unique_slug(tx, table.catalog_table(), name)?;
            let id = NamedEntityRepository::insert(tx, table, name, &slug)?;
            debug!(table = ?table, name = %name, slug = %slug, id = id, "新建实体");
            id
        }
    };

    cache.insert(key, id);
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    #[test]
    fn test_resolve_named_write_through() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        let mut cache = LookupCache::default();

        let first = resolve_named(&tx, &mut cache, NamedTable::Brands, "Wardah").unwrap();
        let second = resolve_named(&tx, &mut cache, NamedTable::Brands, " WARDAH ").unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(resolve_named(&tx, &mut cache, NamedTable::Brands, "").unwrap(), None);

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM brands", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        cache.reset();
        assert!(cache.is_empty());
    }
}
