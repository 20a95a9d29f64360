// ==========================================
// 商品目录导入 - 标签查找
// ==========================================

use crate::importer::lookups::{resolve_named, LookupCache};
use crate::repository::{NamedTable, RepositoryResult};
use rusqlite::Transaction;

#[derive(Debug, Default)]
pub struct TagLookup {
    cache: LookupCache,
}

impl TagLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&mut self, tx: &Transaction, name: &str) -> RepositoryResult<Option<i64>> {
        resolve_named(tx, &mut self.cache, NamedTable::Tags, name)
    }

    /// 标签名列表 → id 列表（去重，保持首次出现顺序）
    pub fn get_ids(&mut self, tx: &Transaction, names: &[String]) -> RepositoryResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            if let Some(id) = self.get_id(tx, name)? {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }
}
