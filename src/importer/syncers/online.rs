// ==========================================
// 商品目录导入 - 上架标记
// ==========================================
// 规则: 每个商品至多一行 product_onlines；先查后插，重复导入幂等
// ==========================================

use crate::repository::{ProductOnlineRepository, RepositoryResult};
use rusqlite::Transaction;

pub struct ProductOnlineEnsurer;

impl ProductOnlineEnsurer {
    /// 返回 true 表示本次实际插入
    pub fn ensure(tx: &Transaction, product_id: i64) -> RepositoryResult<bool> {
        if ProductOnlineRepository::exists(tx, product_id)? {
            return Ok(false);
        }
        ProductOnlineRepository::insert(tx, product_id, true)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    #[test]
    fn test_ensure_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO products (name, slug) VALUES ('Toner', 'toner')", [])
            .unwrap();
        let product_id = tx.last_insert_rowid();

        assert!(ProductOnlineEnsurer::ensure(&tx, product_id).unwrap());
        assert!(!ProductOnlineEnsurer::ensure(&tx, product_id).unwrap());
    }
}
