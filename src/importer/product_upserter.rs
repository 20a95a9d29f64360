// ==========================================
// 商品目录导入 - 商品 upsert
// ==========================================
// 身份: master_sku 精确匹配优先，其次商品名精确匹配（取最早一条）
// 命中: 覆盖名称/基础价/类目/品牌/状态/使用方法；CSV 未提供的字段保持原值
// 未命中: 按商品名生成唯一 slug 新建，状态由自由文本归类
// ==========================================

use crate::domain::{MasterGroup, NewProduct, Product, ProductStatus, ProductUpdate};
use crate::importer::slug_service::ensure_unique_slug;
use crate::repository::{CatalogTable, ProductRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::debug;

/// 分组解析出的外键
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRefs {
    pub category_type_id: Option<i64>,
    pub brand_id: Option<i64>,
}

pub struct ProductUpserter;

impl ProductUpserter {
    /// 返回 (商品, 是否新建)
    pub fn upsert(
        tx: &Transaction,
        group: &MasterGroup,
        refs: ProductRefs,
    ) -> RepositoryResult<(Product, bool)> {
        let existing = match group.master_sku.as_deref() {
            Some(sku) => ProductRepository::find_by_master_sku(tx, sku)?,
            None => None,
        };
        let existing = match existing {
            Some(product) => Some(product),
            None => ProductRepository::find_by_name(tx, &group.name)?,
        };

        let status = group.status.as_deref().map(ProductStatus::from_free_text);

        if let Some(product) = existing {
            let update = ProductUpdate {
                name: group.name.clone(),
                master_sku: group.master_sku.clone(),
                base_price: group.base_price,
                category_type_id: refs.category_type_id,
                brand_id: refs.brand_id,
                status,
                how_to_use: group.how_to_use.clone(),
            };
            ProductRepository::update(tx, product.id, &update)?;
            debug!(product_id = product.id, name = %group.name, "商品已更新");
            return Ok((ProductRepository::get(tx, product.id)?, false));
        }

        let slug = ensure_unique_slug(tx, CatalogTable::Products, &group.name)?;
        let new_product = NewProduct {
            name: group.name.clone(),
            slug,
            master_sku: group.master_sku.clone(),
            description: group.description.clone(),
            base_price: group.base_price,
            weight: group.weight,
            is_flash_sale: false,
            status: Some(status.unwrap_or(ProductStatus::Normal)),
            category_type_id: refs.category_type_id,
            brand_id: refs.brand_id,
            persona_id: None,
            how_to_use: group.how_to_use.clone(),
        };
        let id = ProductRepository::insert(tx, &new_product)?;
        debug!(product_id = id, name = %group.name, slug = %new_product.slug, "商品已新建");

        Ok((ProductRepository::get(tx, id)?, true))
    }
}
