// ==========================================
// 商品目录导入 - 唯一 slug 服务
// ==========================================
// 规则: 基础 slug 未占用则直接使用；否则依次尝试 -2、-3 ...
// 约束: 必须与随后的 INSERT 处于同一事务
// 说明: 并发事务间仍有竞争窗口，冲突时 INSERT 触发唯一约束错误（硬错误）
// ==========================================

use crate::repository::{CatalogTable, RepositoryResult, SlugRepository};
use rusqlite::Transaction;
use tracing::trace;

/// 名称 → URL 安全的 slug
///
/// ASCII 字母数字转小写，其余字符折叠为单个 `-`，去掉首尾 `-`
pub fn slugify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut last_was_separator = false;

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_separator = false;
        } else if !last_was_separator && !result.is_empty() {
            result.push('-');
            last_was_separator = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// 生成表内唯一的 slug
///
/// base 先经过 slugify；结果为空时使用表的词干（如 `product`）
pub fn ensure_unique_slug(
    tx: &Transaction,
    table: CatalogTable,
    base: &str,
) -> RepositoryResult<String> {
    let mut stem = slugify(base);
    if stem.is_empty() {
        stem = table.slug_stem().to_string();
    }

    if !SlugRepository::exists(tx, table, &stem)? {
        return Ok(stem);
    }

    let mut suffix = 2usize;
    loop {
        let candidate = format!("{}-{}", stem, suffix);
        if !SlugRepository::exists(tx, table, &candidate)? {
            trace!(table = table.table_name(), slug = %candidate, "slug 冲突，追加序号");
            return Ok(candidate);
        }
        suffix += 1;
    }
}
