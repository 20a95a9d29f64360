// ==========================================
// 商品目录导入 - Concern / Concern 选项查找
// ==========================================
// 选项列表按 | ; , 拆分；未提供选项时以 concern 名本身作为唯一选项
// ==========================================

use crate::importer::data_cleaner::{dedup_case_insensitive, normalize_key, split_list};
use crate::importer::lookups::{resolve_named, LookupCache};
use crate::importer::slug_service::ensure_unique_slug;
use crate::repository::{CatalogTable, ConcernOptionRepository, NamedTable, RepositoryResult};
use rusqlite::Transaction;

#[derive(Debug, Default)]
pub struct ConcernLookup {
    concerns: LookupCache,
    options: LookupCache,
}

impl ConcernLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_id(&mut self, tx: &Transaction, name: &str) -> RepositoryResult<Option<i64>> {
        resolve_named(tx, &mut self.concerns, NamedTable::Concerns, name)
    }

    /// 解析 concern 下的选项 id 列表
    ///
    /// options 为空时回退为 concern 名本身
    pub fn get_option_ids(
        &mut self,
        tx: &Transaction,
        concern_id: i64,
        concern_name: &str,
        options: &str,
    ) -> RepositoryResult<Vec<i64>> {
        let mut names = dedup_case_insensitive(split_list(options));
        if names.is_empty() {
            let fallback = concern_name.trim();
            if fallback.is_empty() {
                return Ok(Vec::new());
            }
            names.push(fallback.to_string());
        }

        let mut ids = Vec::with_capacity(names.len());
        for name in &names {
            let id = self.get_option_id(tx, concern_id, name)?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn get_option_id(&mut self, tx: &Transaction, concern_id: i64, name: &str) -> RepositoryResult<i64> {
        let key = format!("{}:{}", concern_id, normalize_key(name));
        if let Some(id) = self.options.get(&key) {
            return Ok(id);
        }

        let id = match ConcernOptionRepository::find_id(tx, concern_id, name)? {
            Some(id) => id,
            None => {
                let slug = ensure_unique_slug(tx, CatalogTable::ConcernOptions, name)?;
                ConcernOptionRepository::insert(tx, concern_id, name, &slug)?
            }
        };

        self.options.insert(key, id);
        Ok(id)
    }

    pub fn reset_cache(&mut self) {
        self.concerns.reset();
        self.options.reset();
    }
}
