// ==========================================
// 商品目录导入 - 商品/变体/媒体 Repository
// ==========================================
// 职责: products / product_variants / product_medias / product_onlines 数据访问
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 所有调用都在调用方传入的事务内执行
// ==========================================

use crate::domain::catalog::{NewProduct, Product, ProductStatus, ProductUpdate, VariantDraft};
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, Transaction};
use std::collections::HashSet;

const PRODUCT_COLUMNS: &str =
    "id, name, slug, master_sku, base_price, status, category_type_id, brand_id, how_to_use";

fn map_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    let status: String = row.get(5)?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        master_sku: row.get(3)?,
        base_price: row.get(4)?,
        status: ProductStatus::parse_strict(&status).unwrap_or(ProductStatus::Normal),
        category_type_id: row.get(6)?,
        brand_id: row.get(7)?,
        how_to_use: row.get(8)?,
    })
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

// ==========================================
// ProductRepository
// ==========================================
pub struct ProductRepository;

impl ProductRepository {
    /// 按 master_sku 精确匹配（多条时取最早一条）
    pub fn find_by_master_sku(tx: &Transaction, master_sku: &str) -> RepositoryResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE master_sku = ?1 ORDER BY id LIMIT 1",
            PRODUCT_COLUMNS
        );
        Ok(tx.query_row(&sql, params![master_sku], map_product).optional()?)
    }

    /// 按名称精确匹配（多条时取最早一条）
    pub fn find_by_name(tx: &Transaction, name: &str) -> RepositoryResult<Option<Product>> {
        let sql = format!(
            "SELECT {} FROM products WHERE name = ?1 ORDER BY id LIMIT 1",
            PRODUCT_COLUMNS
        );
        Ok(tx.query_row(&sql, params![name], map_product).optional()?)
    }

    pub fn get(tx: &Transaction, id: i64) -> RepositoryResult<Product> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        Ok(tx.query_row(&sql, params![id], map_product)?)
    }

    /// 新建商品，返回 id
    pub fn insert(tx: &Transaction, product: &NewProduct) -> RepositoryResult<i64> {
        let ts = now();
        tx.execute(
            r#"
            INSERT INTO products (
                name, slug, master_sku, description, base_price, weight,
                is_flash_sale, status, category_type_id, brand_id, persona_id,
                how_to_use, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)
            "#,
            params![
                product.name,
                product.slug,
                product.master_sku,
                product.description,
                product.base_price,
                product.weight,
                product.is_flash_sale as i32,
                product.status.unwrap_or(ProductStatus::Normal).as_str(),
                product.category_type_id,
                product.brand_id,
                product.persona_id,
                product.how_to_use,
                ts,
            ],
        )?;
        Ok(tx.last_insert_rowid())
    }

    /// 更新商品
    ///
    /// 载荷中为 None 的字段保持数据库原值
    pub fn update(tx: &Transaction, id: i64, update: &ProductUpdate) -> RepositoryResult<()> {
        tx.execute(
            r#"
            UPDATE products SET
                name = ?2,
                master_sku = COALESCE(?3, master_sku),
                base_price = COALESCE(?4, base_price),
                category_type_id = COALESCE(?5, category_type_id),
                brand_id = COALESCE(?6, brand_id),
                status = COALESCE(?7, status),
                how_to_use = COALESCE(?8, how_to_use),
                updated_at = ?9
            WHERE id = ?1
            "#,
            params![
                id,
                update.name,
                update.master_sku,
                update.base_price,
                update.category_type_id,
                update.brand_id,
                update.status.map(|s| s.as_str()),
                update.how_to_use,
                now(),
            ],
        )?;
        Ok(())
    }
}

// ==========================================
// VariantRepository
// ==========================================
pub struct VariantRepository;

impl VariantRepository {
    pub fn find_by_sku_variant(
        tx: &Transaction,
        product_id: i64,
        sku_variant: &str,
    ) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM product_variants WHERE product_id = ?1 AND sku_variant = ?2 ORDER BY id LIMIT 1",
                params![product_id, sku_variant],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn find_by_name(tx: &Transaction, product_id: i64, name: &str) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM product_variants WHERE product_id = ?1 AND name = ?2 COLLATE NOCASE ORDER BY id LIMIT 1",
                params![product_id, name],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// 按变体名查找尚未填写 sku_variant 的变体
    pub fn find_unkeyed_by_name(
        tx: &Transaction,
        product_id: i64,
        name: &str,
    ) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM product_variants WHERE product_id = ?1 AND name = ?2 COLLATE NOCASE AND (sku_variant IS NULL OR sku_variant = '') ORDER BY id LIMIT 1",
                params![product_id, name],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn insert(tx: &Transaction, draft: &VariantDraft) -> RepositoryResult<i64> {
        let ts = now();
        tx.execute(
            r#"
            INSERT INTO product_variants (
                product_id, name, sku, sku_variant, price, stock,
                bpom, ingredients, photo, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
            params![
                draft.product_id,
                draft.name,
                draft.sku,
                draft.sku_variant,
                draft.price,
                draft.stock,
                draft.bpom,
                draft.ingredients,
                draft.photo,
                ts,
            ],
        )?;
        Ok(tx.last_insert_rowid())
    }

    pub fn update(tx: &Transaction, id: i64, draft: &VariantDraft) -> RepositoryResult<()> {
        tx.execute(
            r#"
            UPDATE product_variants SET
                name = ?2,
                sku = COALESCE(?3, sku),
                sku_variant = COALESCE(?4, sku_variant),
                price = ?5,
                stock = ?6,
                bpom = COALESCE(?7, bpom),
                ingredients = COALESCE(?8, ingredients),
                photo = COALESCE(?9, photo),
                updated_at = ?10
            WHERE id = ?1
            "#,
            params![
                id,
                draft.name,
                draft.sku,
                draft.sku_variant,
                draft.price,
                draft.stock,
                draft.bpom,
                draft.ingredients,
                draft.photo,
                now(),
            ],
        )?;
        Ok(())
    }
}

// ==========================================
// MediaRepository
// ==========================================
pub struct MediaRepository;

impl MediaRepository {
    /// 查询候选 URL 中已存在于该商品下的部分
    pub fn existing_urls(
        tx: &Transaction,
        product_id: i64,
        urls: &[String],
    ) -> RepositoryResult<HashSet<String>> {
        if urls.is_empty() {
            return Ok(HashSet::new());
        }

        // 构建 IN 子句的占位符（?1 留给 product_id）
        let placeholders = (0..urls.len())
            .map(|i| format!("?{}", i + 2))
            .collect::<Vec<_>>()
            .join(",");
        let query = format!(
            "SELECT url FROM product_medias WHERE product_id = ?1 AND url IN ({})",
            placeholders
        );

        let mut bind: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(urls.len() + 1);
        bind.push(&product_id);
        for url in urls {
            bind.push(url);
        }

        let mut stmt = tx.prepare(&query)?;
        let existing = stmt
            .query_map(bind.as_slice(), |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;

        Ok(existing)
    }

    pub fn insert(
        tx: &Transaction,
        product_id: i64,
        url: &str,
        alt_text: &str,
        media_type: &str,
    ) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT INTO product_medias (product_id, url, alt_text, media_type, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![product_id, url, alt_text, media_type, now()],
        )?;
        Ok(tx.last_insert_rowid())
    }
}

// ==========================================
// ProductOnlineRepository
// ==========================================
pub struct ProductOnlineRepository;

impl ProductOnlineRepository {
    pub fn exists(tx: &Transaction, product_id: i64) -> RepositoryResult<bool> {
        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM product_onlines WHERE product_id = ?1",
            params![product_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn insert(tx: &Transaction, product_id: i64, is_active: bool) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT INTO product_onlines (product_id, is_active, created_at) VALUES (?1, ?2, ?3)",
            params![product_id, is_active as i32, now()],
        )?;
        Ok(tx.last_insert_rowid())
    }
}
