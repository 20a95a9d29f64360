// ==========================================
// 商品目录导入 - 关联表 Repository
// ==========================================
// 职责: product_tags / product_concerns / product_variant_attributes 数据访问
//       + 关联表形态探测（可选列因部署而异）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::catalog::{PivotColumns, PivotMeta};
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use rusqlite::{params, Transaction};

/// 读取表的列名（表不存在时返回空）
fn table_columns(tx: &Transaction, table: &str) -> RepositoryResult<PivotColumns> {
    let mut stmt = tx.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map(params![table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PivotColumns::new(columns))
}

/// 按实际存在的列拼装 INSERT
///
/// 时间戳列存在时写入当前时间；start_date / end_date / deleted_at 保持 NULL
fn insert_pivot_row(
    tx: &Transaction,
    table: &str,
    columns: &PivotColumns,
    base: &[(&str, Option<i64>)],
) -> RepositoryResult<()> {
    let ts = Utc::now().to_rfc3339();

    let mut names: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
    for &(name, value) in base {
        names.push(name);
        values.push(Box::new(value));
    }
    for stamp in ["created_at", "updated_at"] {
        if columns.has(stamp) {
            names.push(stamp);
            values.push(Box::new(ts.clone()));
        }
    }

    let placeholders = (1..=names.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(", "),
        placeholders
    );

    let bind: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| &**v).collect();
    tx.execute(&sql, bind.as_slice())?;
    Ok(())
}

// ==========================================
// PivotRepository
// ==========================================
pub struct PivotRepository;

impl PivotRepository {
    /// 探测关联表形态（每次运行一次）
    pub fn probe(tx: &Transaction) -> RepositoryResult<PivotMeta> {
        Ok(PivotMeta {
            product_tags: table_columns(tx, "product_tags")?,
            product_concerns: table_columns(tx, "product_concerns")?,
        })
    }

    pub fn delete_product_tags(tx: &Transaction, product_id: i64) -> RepositoryResult<usize> {
        Ok(tx.execute("DELETE FROM product_tags WHERE product_id = ?1", params![product_id])?)
    }

    pub fn insert_product_tag(
        tx: &Transaction,
        columns: &PivotColumns,
        product_id: i64,
        tag_id: i64,
    ) -> RepositoryResult<()> {
        insert_pivot_row(
            tx,
            "product_tags",
            columns,
            &[("product_id", Some(product_id)), ("tag_id", Some(tag_id))],
        )
    }

    pub fn delete_product_concerns(tx: &Transaction, product_id: i64) -> RepositoryResult<usize> {
        Ok(tx.execute("DELETE FROM product_concerns WHERE product_id = ?1", params![product_id])?)
    }

    pub fn insert_product_concern(
        tx: &Transaction,
        columns: &PivotColumns,
        product_id: i64,
        concern_id: i64,
        concern_option_id: Option<i64>,
    ) -> RepositoryResult<()> {
        insert_pivot_row(
            tx,
            "product_concerns",
            columns,
            &[
                ("product_id", Some(product_id)),
                ("concern_id", Some(concern_id)),
                ("concern_option_id", concern_option_id),
            ],
        )
    }

    /// 替换变体的属性值关联
    pub fn replace_variant_attribute(
        tx: &Transaction,
        variant_id: i64,
        attribute_value_id: i64,
    ) -> RepositoryResult<()> {
        tx.execute(
            "DELETE FROM product_variant_attributes WHERE product_variant_id = ?1",
            params![variant_id],
        )?;
        tx.execute(
            "INSERT INTO product_variant_attributes (product_variant_id, attribute_value_id) VALUES (?1, ?2)",
            params![variant_id, attribute_value_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

    #[test]
    fn test_probe_full_schema() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();

        let meta = PivotRepository::probe(&tx).unwrap();
        assert!(meta.tags_ready());
        assert!(meta.concerns_ready());
        assert!(meta.product_tags.has("deleted_at"));
    }

    #[test]
    fn test_probe_minimal_pivots() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE product_tags (product_id INTEGER, tag_id INTEGER);
             CREATE TABLE product_concerns (product_id INTEGER, concern_id INTEGER);",
        )
        .unwrap();
        let tx = conn.transaction().unwrap();

        let meta = PivotRepository::probe(&tx).unwrap();
        assert!(meta.tags_ready());
        assert!(!meta.product_tags.has("created_at"));
        assert!(!meta.concerns_ready());

        // 无时间戳列时也能写入
        PivotRepository::insert_product_tag(&tx, &meta.product_tags, 1, 2).unwrap();
        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM product_tags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_probe_missing_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        let tx = conn.transaction().unwrap();

        let meta = PivotRepository::probe(&tx).unwrap();
        assert!(!meta.product_tags.exists());
        assert!(!meta.tags_ready());
    }
}
