// ==========================================
// 商品目录导入 - 运行会话
// ==========================================
// 一次 import 调用对应一个 ImportSession：
// - 各实体查找缓存（运行结束即丢弃，不跨运行复用）
// - 关联表形态（运行开始时探测一次）
// - 运行计数器
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ImportStats, PivotMeta};
use crate::importer::lookups::{
    AttributeLookup, BrandLookup, CategoryLookup, ConcernLookup, TagLookup,
};
use crate::repository::{PivotRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::debug;

pub struct ImportSession {
    pub variant_attribute_name: String,
    pub pivot_meta: PivotMeta,
    pub brands: BrandLookup,
    pub categories: CategoryLookup,
    pub concerns: ConcernLookup,
    pub tags: TagLookup,
    pub attributes: AttributeLookup,
    pub stats: ImportStats,
}

impl ImportSession {
    /// 在导入事务内开启会话（探测关联表形态）
    pub fn begin(tx: &Transaction, config: &ImportConfig) -> RepositoryResult<Self> {
        let pivot_meta = PivotRepository::probe(tx)?;
        debug!(
            tags_ready = pivot_meta.tags_ready(),
            concerns_ready = pivot_meta.concerns_ready(),
            "关联表形态探测完成"
        );

        Ok(Self {
            variant_attribute_name: config.variant_attribute_name.clone(),
            pivot_meta,
            brands: BrandLookup::new(),
            categories: CategoryLookup::new(config.default_category_name.clone()),
            concerns: ConcernLookup::new(),
            tags: TagLookup::new(),
            attributes: AttributeLookup::new(),
            stats: ImportStats::default(),
        })
    }
}
