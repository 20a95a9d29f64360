// ==========================================
// 商品目录导入 - 主表分组落库
// ==========================================
// 每个 MasterGroup 在运行事务内依次执行:
// 1. 解析类目（三级）与品牌
// 2. 商品 upsert
// 3. 图片追加
// 4. 标签 / concern 整体替换
// 5. 确保上架标记
// 6. 变体 upsert + 变体属性值
// 任一步骤出错即向上传播，整个事务回滚（含此前已处理的分组）
// ==========================================

use crate::domain::{MasterGroup, VariantDraft};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::product_upserter::{ProductRefs, ProductUpserter};
use crate::importer::session::ImportSession;
use crate::importer::syncers::{
    ProductConcernSyncer, ProductMediaSyncer, ProductOnlineEnsurer, ProductTagSyncer,
    VariantAttributeSyncer, VariantSyncer,
};
use crate::repository::RepositoryResult;
use rusqlite::Transaction;
use tracing::{debug, error};

pub struct MasterProcessor;

impl MasterProcessor {
    pub fn process(
        tx: &Transaction,
        session: &mut ImportSession,
        groups: &[MasterGroup],
    ) -> ImportResult<()> {
        for group in groups {
            Self::process_group(tx, session, group).map_err(|source| {
                error!(product = %group.name, error = %source, "商品处理失败，事务将回滚");
                ImportError::GroupProcessingError {
                    product: group.name.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn process_group(
        tx: &Transaction,
        session: &mut ImportSession,
        group: &MasterGroup,
    ) -> RepositoryResult<()> {
        // === 步骤 1: 类目与品牌 ===
        let category_type_id = session.categories.get_id(
            tx,
            group.category.as_deref().unwrap_or(""),
            group.sub_category.as_deref().unwrap_or(""),
            group.sub_sub_category.as_deref().unwrap_or(""),
        )?;
        let brand_id = session.brands.get_id(tx, group.brand.as_deref().unwrap_or(""))?;

        // === 步骤 2: 商品 ===
        let refs = ProductRefs {
            category_type_id: Some(category_type_id),
            brand_id,
        };
        let (product, created) = ProductUpserter::upsert(tx, group, refs)?;
        if created {
            session.stats.product_created += 1;
        } else {
            session.stats.product_updated += 1;
        }

        // === 步骤 3: 图片 ===
        session.stats.media_created +=
            ProductMediaSyncer::sync(tx, product.id, &product.name, &group.media_urls())?;

        // === 步骤 4: 标签 / concern ===
        session.stats.tag_attached += ProductTagSyncer::sync(
            tx,
            &session.pivot_meta,
            &mut session.tags,
            product.id,
            &group.tags,
        )?;
        session.stats.concern_attached += ProductConcernSyncer::sync(
            tx,
            &session.pivot_meta,
            &mut session.concerns,
            product.id,
            group.concern.as_deref().unwrap_or(""),
            group.concern_options.as_deref().unwrap_or(""),
        )?;

        // === 步骤 5: 上架标记 ===
        if ProductOnlineEnsurer::ensure(tx, product.id)? {
            session.stats.online_created += 1;
        }

        // === 步骤 6: 变体 ===
        let attribute_id = session
            .attributes
            .get_id(tx, &session.variant_attribute_name)?;
        for variant in &group.variants {
            let draft = VariantDraft {
                product_id: product.id,
                name: variant.name.clone(),
                sku: variant.sku_master.clone().or_else(|| group.master_sku.clone()),
                sku_variant: variant.sku_variant.clone(),
                price: variant.price.or(group.base_price).unwrap_or(0.0),
                stock: variant.stock,
                bpom: variant.bpom.clone(),
                ingredients: variant.ingredients.clone(),
                photo: variant.photo.clone(),
            };
            let (variant_id, variant_created) = VariantSyncer::upsert(tx, &draft)?;
            if variant_created {
                session.stats.variant_created += 1;
            }

            VariantAttributeSyncer::sync(tx, attribute_id, variant_id, &variant.name)?;
            session.stats.variant_attr_attached += 1;
        }

        debug!(
            product_id = product.id,
            created = created,
            variants = group.variants.len(),
            "商品分组处理完成"
        );
        Ok(())
    }
}
