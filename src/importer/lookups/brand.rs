// ==========================================
// 商品目录导入 - 品牌查找
// ==========================================

use crate::importer::lookups::{resolve_named, LookupCache};
use crate::repository::{NamedTable, RepositoryResult};
use rusqlite::Transaction;

#[derive(Debug, Default)]
pub struct BrandLookup {
    cache: LookupCache,
}

impl BrandLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 品牌名 → id（不存在则新建；名称为空返回 None）
    pub fn get_id(&mut self, tx: &Transaction, name: &str) -> RepositoryResult<Option<i64>> {
        resolve_named(tx, &mut self.cache, NamedTable::Brands, name)
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }
}
