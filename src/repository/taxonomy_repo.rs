// ==========================================
// 商品目录导入 - 分类体系 Repository
// ==========================================
// 职责: brands / tags / concerns / attributes / category_types /
//       concern_options / attribute_values 数据访问
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 表名仅来自 CatalogTable 白名单，不拼接外部输入
// ==========================================

use crate::repository::error::RepositoryResult;
use rusqlite::{params, OptionalExtension, Transaction};

// ==========================================
// CatalogTable - 带 slug 的目录表
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    Products,
    Brands,
    CategoryTypes,
    Tags,
    Concerns,
    ConcernOptions,
    Attributes,
}

impl CatalogTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            CatalogTable::Products => "products",
            CatalogTable::Brands => "brands",
            CatalogTable::CategoryTypes => "category_types",
            CatalogTable::Tags => "tags",
            CatalogTable::Concerns => "concerns",
            CatalogTable::ConcernOptions => "concern_options",
            CatalogTable::Attributes => "attributes",
        }
    }

    /// 名称无法生成 slug 时使用的词干
    pub fn slug_stem(&self) -> &'static str {
        match self {
            CatalogTable::Products => "product",
            CatalogTable::Brands => "brand",
            CatalogTable::CategoryTypes => "category",
            CatalogTable::Tags => "tag",
            CatalogTable::Concerns => "concern",
            CatalogTable::ConcernOptions => "concern-option",
            CatalogTable::Attributes => "attribute",
        }
    }
}

/// 名称全局唯一的简单实体表
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedTable {
    Brands,
    Tags,
    Concerns,
    Attributes,
}

impl NamedTable {
    pub fn catalog_table(&self) -> CatalogTable {
        match self {
            NamedTable::Brands => CatalogTable::Brands,
            NamedTable::Tags => CatalogTable::Tags,
            NamedTable::Concerns => CatalogTable::Concerns,
            NamedTable::Attributes => CatalogTable::Attributes,
        }
    }
}

// ==========================================
// SlugRepository
// ==========================================
pub struct SlugRepository;

impl SlugRepository {
    pub fn exists(tx: &Transaction, table: CatalogTable, slug: &str) -> RepositoryResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = ?1)",
            table.table_name()
        );
        let exists: bool = tx.query_row(&sql, params![slug], |row| row.get(0))?;
        Ok(exists)
    }
}

// ==========================================
// NamedEntityRepository - brands / tags / concerns / attributes
// ==========================================
pub struct NamedEntityRepository;

impl NamedEntityRepository {
    /// 按名称查询（不区分大小写）
    pub fn find_id_by_name(tx: &Transaction, table: NamedTable, name: &str) -> RepositoryResult<Option<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1",
            table.catalog_table().table_name()
        );
        Ok(tx.query_row(&sql, params![name], |row| row.get(0)).optional()?)
    }

    pub fn insert(tx: &Transaction, table: NamedTable, name: &str, slug: &str) -> RepositoryResult<i64> {
        let sql = format!(
            "INSERT INTO {} (name, slug) VALUES (?1, ?2)",
            table.catalog_table().table_name()
        );
        tx.execute(&sql, params![name, slug])?;
        Ok(tx.last_insert_rowid())
    }
}

// ==========================================
// CategoryRepository - 三级类目树
// ==========================================
pub struct CategoryRepository;

impl CategoryRepository {
    /// 在指定父节点下按名称查询（parent_id 为 None 即一级类目）
    pub fn find_id(tx: &Transaction, name: &str, parent_id: Option<i64>) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM category_types WHERE name = ?1 COLLATE NOCASE AND parent_id IS ?2 ORDER BY id LIMIT 1",
                params![name, parent_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn insert(tx: &Transaction, name: &str, slug: &str, parent_id: Option<i64>) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT INTO category_types (name, slug, parent_id) VALUES (?1, ?2, ?3)",
            params![name, slug, parent_id],
        )?;
        Ok(tx.last_insert_rowid())
    }
}

// ==========================================
// ConcernOptionRepository
// ==========================================
pub struct ConcernOptionRepository;

impl ConcernOptionRepository {
    pub fn find_id(tx: &Transaction, concern_id: i64, name: &str) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM concern_options WHERE concern_id = ?1 AND name = ?2 COLLATE NOCASE ORDER BY id LIMIT 1",
                params![concern_id, name],
                |row| row.get(0),
            )
            .optional()?)
    }

    pub fn insert(tx: &Transaction, concern_id: i64, name: &str, slug: &str) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT INTO concern_options (concern_id, name, slug) VALUES (?1, ?2, ?3)",
            params![concern_id, name, slug],
        )?;
        Ok(tx.last_insert_rowid())
    }
}

// ==========================================
// AttributeValueRepository
// ==========================================
pub struct AttributeValueRepository;

impl AttributeValueRepository {
    /// 按 (attribute, variant) 查询（含软删除行）
    pub fn find_id(tx: &Transaction, attribute_id: i64, variant_id: i64) -> RepositoryResult<Option<i64>> {
        Ok(tx
            .query_row(
                "SELECT id FROM attribute_values WHERE attribute_id = ?1 AND product_variant_id = ?2",
                params![attribute_id, variant_id],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// 覆盖取值并清除软删除标记
    pub fn restore_with_value(tx: &Transaction, id: i64, value: &str) -> RepositoryResult<()> {
        tx.execute(
            "UPDATE attribute_values SET value = ?2, deleted_at = NULL WHERE id = ?1",
            params![id, value],
        )?;
        Ok(())
    }

    pub fn insert(tx: &Transaction, attribute_id: i64, variant_id: i64, value: &str) -> RepositoryResult<i64> {
        tx.execute(
            "INSERT INTO attribute_values (attribute_id, product_variant_id, value) VALUES (?1, ?2, ?3)",
            params![attribute_id, variant_id, value],
        )?;
        Ok(tx.last_insert_rowid())
    }
}
