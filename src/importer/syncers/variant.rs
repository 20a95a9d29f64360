// ==========================================
// 商品目录导入 - 变体与变体属性同步
// ==========================================
// 变体身份: 同一商品下 sku_variant 优先，否则按变体名（不区分大小写）
// 带 SKU 的行未命中时，回退到同名且尚无 SKU 的变体
// 变体属性: (attribute, variant) 唯一；已存在则覆盖取值并清除软删除标记
// ==========================================

use crate::domain::VariantDraft;
use crate::repository::{
    AttributeValueRepository, PivotRepository, RepositoryResult, VariantRepository,
};
use rusqlite::Transaction;

pub struct VariantSyncer;

impl VariantSyncer {
    /// 返回 (variant_id, created)
    pub fn upsert(tx: &Transaction, draft: &VariantDraft) -> RepositoryResult<(i64, bool)> {
        let existing = match draft.sku_variant.as_deref() {
            // 先前未填 sku_variant 的同名变体在补填 SKU 后沿用
            Some(sku) => match VariantRepository::find_by_sku_variant(tx, draft.product_id, sku)? {
                Some(id) => Some(id),
                None => VariantRepository::find_unkeyed_by_name(tx, draft.product_id, &draft.name)?,
            },
            None => VariantRepository::find_by_name(tx, draft.product_id, &draft.name)?,
        };

        match existing {
            Some(id) => {
                VariantRepository::update(tx, id, draft)?;
                Ok((id, false))
            }
            None => Ok((VariantRepository::insert(tx, draft)?, true)),
        }
    }
}

pub struct VariantAttributeSyncer;

impl VariantAttributeSyncer {
    /// 写入属性值并替换变体的属性关联，返回 attribute_value id
    pub fn sync(
        tx: &Transaction,
        attribute_id: i64,
        variant_id: i64,
        value: &str,
    ) -> RepositoryResult<i64> {
        let value_id = match AttributeValueRepository::find_id(tx, attribute_id, variant_id)? {
            Some(id) => {
                AttributeValueRepository::restore_with_value(tx, id, value)?;
                id
            }
            None => AttributeValueRepository::insert(tx, attribute_id, variant_id, value)?,
        };

        PivotRepository::replace_variant_attribute(tx, variant_id, value_id)?;
        Ok(value_id)
    }
}
