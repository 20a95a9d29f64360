// ==========================================
// 商品目录导入 - 三级类目查找
// ==========================================
// 路径: 一级 → 二级 → 三级，按名称逐级定位，缺失节点挂在父节点下新建
// 一级为空时使用缺省类目名；二/三级为空时停在上一级
// ==========================================

use crate::importer::data_cleaner::normalize_key;
use crate::importer::lookups::LookupCache;
use crate::importer::slug_service::ensure_unique_slug;
use crate::repository::{CatalogTable, CategoryRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::debug;

#[derive(Debug)]
pub struct CategoryLookup {
    cache: LookupCache,
    default_name: String,
}

impl CategoryLookup {
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            cache: LookupCache::default(),
            default_name: default_name.into(),
        }
    }

    /// 类目路径 → 最深一级的 id
    pub fn get_id(
        &mut self,
        tx: &Transaction,
        parent: &str,
        sub: &str,
        sub_sub: &str,
    ) -> RepositoryResult<i64> {
        let top_name = match parent.trim() {
            "" => self.default_name.clone(),
            name => name.to_string(),
        };

        let mut id = self.resolve_node(tx, &top_name, None)?;
        for name in [sub.trim(), sub_sub.trim()] {
            if name.is_empty() {
                break;
            }
            id = self.resolve_node(tx, name, Some(id))?;
        }
        Ok(id)
    }

    fn resolve_node(&mut self, tx: &Transaction, name: &str, parent_id: Option<i64>) -> RepositoryResult<i64> {
        let key = match parent_id {
            Some(pid) => format!("{}/{}", pid, normalize_key(name)),
            None => format!("/{}", normalize_key(name)),
        };
        if let Some(id) = self.cache.get(&key) {
            return Ok(id);
        }

        let id = match CategoryRepository::find_id(tx, name, parent_id)? {
            Some(id) => id,
            None => {
                let slug = ensure_unique_slug(tx, CatalogTable::CategoryTypes, name)?;
                let id = CategoryRepository::insert(tx, name, &slug, parent_id)?;
                debug!(name = %name, parent_id = ?parent_id, id = id, "新建类目");
                id
            }
        };

        self.cache.insert(key, id);
        Ok(id)
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
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
    fn test_three_level_path() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        let mut lookup = CategoryLookup::new("Uncategorized");

        let leaf = lookup.get_id(&tx, "Skincare", "Face", "Toner").unwrap();
        let parent: Option<i64> = tx
            .query_row("SELECT parent_id FROM category_types WHERE id = ?1", [leaf], |row| row.get(0))
            .unwrap();
        let face = lookup.get_id(&tx, "skincare", "face", "").unwrap();
        assert_eq!(parent, Some(face));

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM category_types", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_same_name_under_different_parents() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        let mut lookup = CategoryLookup::new("Uncategorized");

        let a = lookup.get_id(&tx, "Skincare", "Serum", "").unwrap();
        let b = lookup.get_id(&tx, "Bodycare", "Serum", "").unwrap();
        assert_ne!(a, b);

        let slug: String = tx
            .query_row("SELECT slug FROM category_types WHERE id = ?1", [b], |row| row.get(0))
            .unwrap();
        assert_eq!(slug, "serum-2");
    }

    #[test]
    fn test_empty_top_level_uses_default() {
        let mut conn = setup();
        let tx = conn.transaction().unwrap();
        let mut lookup = CategoryLookup::new("Uncategorized");

        let id = lookup.get_id(&tx, "", "", "").unwrap();
        let name: String = tx
            .query_row("SELECT name FROM category_types WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Uncategorized");
    }
}
