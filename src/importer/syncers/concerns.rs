// ==========================================
// 商品目录导入 - 商品 concern 同步
// ==========================================
// 规则: 先删后插（整体替换），每个选项一行
// 前提: product_concerns 需同时具备 concern_id 与 concern_option_id，
//       否则返回 0（不报错）
// ==========================================

use crate::domain::PivotMeta;
use crate::importer::lookups::ConcernLookup;
use crate::repository::{PivotRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::debug;

pub struct ProductConcernSyncer;

impl ProductConcernSyncer {
    /// 返回写入的关联行数
    pub fn sync(
        tx: &Transaction,
        meta: &PivotMeta,
        lookup: &mut ConcernLookup,
        product_id: i64,
        concern: &str,
        options: &str,
    ) -> RepositoryResult<usize> {
        if !meta.concerns_ready() {
            debug!(product_id = product_id, "product_concerns 不可用，跳过 concern 同步");
            return Ok(0);
        }

        PivotRepository::delete_product_concerns(tx, product_id)?;

        let concern_id = match lookup.get_id(tx, concern)? {
            Some(id) => id,
            None => return Ok(0),
        };

        let option_ids = lookup.get_option_ids(tx, concern_id, concern, options)?;
        for option_id in &option_ids {
            PivotRepository::insert_product_concern(
                tx,
                &meta.product_concerns,
                product_id,
                concern_id,
                Some(*option_id),
            )?;
        }
        Ok(option_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    fn concern_rows(tx: &Transaction, product_id: i64) -> i64 {
        tx.query_row(
            "SELECT COUNT(*) FROM product_concerns WHERE product_id = ?1",
            [product_id],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_replace_with_options() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO products (name, slug) VALUES ('Serum', 'serum')", [])
            .unwrap();
        let product_id = tx.last_insert_rowid();
        let meta = PivotRepository::probe(&tx).unwrap();
        let mut lookup = ConcernLookup::new();

        let n = ProductConcernSyncer::sync(&tx, &meta, &mut lookup, product_id, "Acne", "Jerawat;Komedo")
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(concern_rows(&tx, product_id), 2);

        let n = ProductConcernSyncer::sync(&tx, &meta, &mut lookup, product_id, "Kusam", "").unwrap();
        assert_eq!(n, 1);
        assert_eq!(concern_rows(&tx, product_id), 1);

        let n = ProductConcernSyncer::sync(&tx, &meta, &mut lookup, product_id, "", "").unwrap();
        assert_eq!(n, 0);
        assert_eq!(concern_rows(&tx, product_id), 0);
    }

    #[test]
    fn test_noop_without_option_column() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE product_concerns (product_id INTEGER, concern_id INTEGER);")
            .unwrap();
        let tx = conn.transaction().unwrap();
        let meta = PivotRepository::probe(&tx).unwrap();
        let mut lookup = ConcernLookup::new();

        assert_eq!(
            ProductConcernSyncer::sync(&tx, &meta, &mut lookup, 1, "Acne", "Jerawat").unwrap(),
            0
        );
    }
}
