// ==========================================
// 商品目录导入 - 商品图片同步
// ==========================================
// 规则: 只追加（按 URL 去重），从不删除或修改已有图片
// ==========================================

use crate::repository::{MediaRepository, RepositoryResult};
use rusqlite::Transaction;

const MEDIA_TYPE_IMAGE: &str = "image";

pub struct ProductMediaSyncer;

impl ProductMediaSyncer {
    /// 返回新插入的图片数
    pub fn sync(
        tx: &Transaction,
        product_id: i64,
        alt_text: &str,
        urls: &[String],
    ) -> RepositoryResult<usize> {
        let mut candidates: Vec<String> = Vec::with_capacity(urls.len());
        for url in urls {
            let url = url.trim();
            if !url.is_empty() && !candidates.iter().any(|c| c == url) {
                candidates.push(url.to_string());
            }
        }
        if candidates.is_empty() {
            return Ok(0);
        }

        let existing = MediaRepository::existing_urls(tx, product_id, &candidates)?;

        let mut inserted = 0;
        for url in candidates.iter().filter(|u| !existing.contains(*u)) {
            MediaRepository::insert(tx, product_id, url, alt_text, MEDIA_TYPE_IMAGE)?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::domain::NewProduct;
    use crate::repository::ProductRepository;
    use rusqlite::Connection;

    #[test]
    fn test_append_only_delta() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        let product_id = ProductRepository::insert(
            &tx,
            &NewProduct {
                name: "Toner".into(),
                slug: "toner".into(),
                ..Default::default()
            },
        )
        .unwrap();

        let first = vec!["a.jpg".to_string(), "b.jpg".to_string(), "a.jpg".to_string()];
        assert_eq!(ProductMediaSyncer::sync(&tx, product_id, "Toner", &first).unwrap(), 2);

        let second = vec!["b.jpg".to_string(), "c.jpg".to_string(), "a.jpg".to_string()];
        assert_eq!(ProductMediaSyncer::sync(&tx, product_id, "Toner", &second).unwrap(), 1);

        let count: i64 = tx
            .query_row(
                "SELECT COUNT(*) FROM product_medias WHERE product_id = ?1",
                [product_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}
