// ==========================================
// 商品目录导入 - 商品标签同步
// ==========================================
// 规则: 先删后插（整体替换）；product_tags 不可用时为空操作
// ==========================================

use crate::domain::PivotMeta;
use crate::importer::lookups::TagLookup;
use crate::repository::{PivotRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::debug;

pub struct ProductTagSyncer;

impl ProductTagSyncer {
    /// 返回挂载的标签数
    pub fn sync(
        tx: &Transaction,
        meta: &PivotMeta,
        lookup: &mut TagLookup,
        product_id: i64,
        names: &[String],
    ) -> RepositoryResult<usize> {
        if !meta.tags_ready() {
            debug!(product_id = product_id, "product_tags 不可用，跳过标签同步");
            return Ok(0);
        }

        PivotRepository::delete_product_tags(tx, product_id)?;

        let tag_ids = lookup.get_ids(tx, names)?;
        for tag_id in &tag_ids {
            PivotRepository::insert_product_tag(tx, &meta.product_tags, product_id, *tag_id)?;
        }
        Ok(tag_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    fn tag_names(tx: &Transaction, product_id: i64) -> Vec<String> {
        let mut stmt = tx
            .prepare(
                "SELECT t.name FROM product_tags pt JOIN tags t ON t.id = pt.tag_id
                 WHERE pt.product_id = ?1 ORDER BY t.name",
            )
            .unwrap();
        stmt.query_map([product_id], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_replace_semantics() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO products (name, slug) VALUES ('Toner', 'toner')", [])
            .unwrap();
        let product_id = tx.last_insert_rowid();
        let meta = PivotRepository::probe(&tx).unwrap();
        let mut lookup = TagLookup::new();

        let first = vec!["Vegan".to_string(), "Halal".to_string()];
        assert_eq!(ProductTagSyncer::sync(&tx, &meta, &mut lookup, product_id, &first).unwrap(), 2);

        let second = vec!["Halal".to_string(), "Best Seller".to_string()];
        assert_eq!(ProductTagSyncer::sync(&tx, &meta, &mut lookup, product_id, &second).unwrap(), 2);
        assert_eq!(tag_names(&tx, product_id), vec!["Best Seller", "Halal"]);

        // 空列表清空全部标签
        assert_eq!(ProductTagSyncer::sync(&tx, &meta, &mut lookup, product_id, &[]).unwrap(), 0);
        assert!(tag_names(&tx, product_id).is_empty());
    }

    #[test]
    fn test_noop_without_pivot() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE tags (id INTEGER PRIMARY KEY, name TEXT, slug TEXT);")
            .unwrap();
        let tx = conn.transaction().unwrap();
        let meta = PivotRepository::probe(&tx).unwrap();
        let mut lookup = TagLookup::new();

        let names = vec!["Vegan".to_string()];
        assert_eq!(ProductTagSyncer::sync(&tx, &meta, &mut lookup, 1, &names).unwrap(), 0);
    }
}
