// ==========================================
// 商品目录导入 - 主表形态分组
// ==========================================
// 一行 = 一个变体；按商品键聚合为 MasterGroup
// 商品键: sku master 优先，否则小写商品名（未填 sku 的行按商品名并入已有分组）
// 标量字段取组内第一个非空值；图片/标签按出现顺序累积并去重
// 格式问题（缺商品键/缺变体名/价格或库存非数字）记为行级错误并跳过该行
// ==========================================

use crate::domain::{ImportRowError, MasterGroup, MasterVariantRow};
use crate::i18n::t_in;
use crate::importer::data_cleaner::{
    dedup_case_insensitive, normalize_key, parse_decimal, parse_integer, split_list,
};
use crate::importer::field_mapper::{field_opt, field_value, MasterField};
use crate::importer::file_parser::CsvRow;
use std::collections::HashMap;
use tracing::{debug, warn};

/// 单行解析结果（分组前）
struct ParsedRow {
    product_name: Option<String>,
    base_price: Option<f64>,
    weight: Option<f64>,
    variant: MasterVariantRow,
}

pub struct MasterGrouper {
    locale: String,
}

impl MasterGrouper {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// 返回 (商品分组, 行级错误)，分组顺序与首次出现顺序一致
    ///
    /// 同一商品只有部分行填写 sku master 时，按商品名归入同一分组；
    /// 同名但 sku master 不同的行视为不同商品
    pub fn group(&self, rows: &[CsvRow]) -> (Vec<MasterGroup>, Vec<ImportRowError>) {
        let mut groups: Vec<MasterGroup> = Vec::new();
        let mut by_sku: HashMap<String, usize> = HashMap::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut errors = Vec::new();

        for row in rows {
            let row_number = row.row_number;
            let parsed = match self.parse_row(row, row_number) {
                Ok(parsed) => parsed,
                Err(message) => {
                    let name = field_opt(row, MasterField::ProductName);
                    warn!(row = row_number, message = %message, "主表行校验失败");
                    errors.push(ImportRowError::at(row_number, name, message));
                    continue;
                }
            };

            let sku = parsed.variant.sku_master.clone();
            let name_key = parsed.product_name.as_deref().map(normalize_key);

            let existing = match (&sku, &name_key) {
                (Some(sku), name_key) => by_sku.get(sku).copied().or_else(|| {
                    // 同名且尚未绑定 sku master 的分组
                    name_key
                        .as_ref()
                        .and_then(|key| by_name.get(key).copied())
                        .filter(|&slot| groups[slot].master_sku.is_none())
                }),
                (None, Some(key)) => by_name.get(key).copied(),
                (None, None) => continue,
            };

            let slot = match existing {
                Some(slot) => slot,
                None => {
                    let key = sku.clone().or_else(|| name_key.clone()).unwrap_or_default();
                    groups.push(MasterGroup {
                        key,
                        ..Default::default()
                    });
                    groups.len() - 1
                }
            };

            if let Some(sku) = sku {
                // 分组键以 sku master 为准
                if groups[slot].master_sku.is_none() {
                    groups[slot].key = sku.clone();
                }
                by_sku.entry(sku).or_insert(slot);
            }
            if let Some(key) = name_key {
                by_name.entry(key).or_insert(slot);
            }
            merge_row(&mut groups[slot], row, parsed);
        }

        for group in &mut groups {
            finalize(group);
        }

        debug!(groups = groups.len(), errors = errors.len(), "主表分组完成");
        (groups, errors)
    }

    fn parse_row(&self, row: &CsvRow, row_number: usize) -> Result<ParsedRow, String> {
        let msg = |key: &str| t_in(key, &self.locale);

        let product_name = field_opt(row, MasterField::ProductName);
        let sku_master = field_opt(row, MasterField::SkuMaster);
        if product_name.is_none() && sku_master.is_none() {
            return Err(msg("validation.master_key_required"));
        }

        let variant_name = field_value(row, MasterField::VariantName);
        if variant_name.is_empty() {
            return Err(msg("validation.variant_name_required"));
        }

        let price = parse_decimal(field_value(row, MasterField::VariantPrice))
            .map_err(|_| msg("validation.price_numeric"))?;
        let base_price = parse_decimal(field_value(row, MasterField::BasePrice))
            .map_err(|_| msg("validation.price_numeric"))?;
        let weight = parse_decimal(field_value(row, MasterField::Weight))
            .map_err(|_| msg("validation.weight_numeric"))?;
        let stock = parse_integer(field_value(row, MasterField::Stock))
            .map_err(|_| msg("validation.stock_numeric"))?
            .unwrap_or(0);

        Ok(ParsedRow {
            product_name,
            base_price,
            weight,
            variant: MasterVariantRow {
                row_number,
                name: variant_name.to_string(),
                sku_master,
                sku_variant: field_opt(row, MasterField::SkuVariant),
                stock,
                price,
                photo: field_opt(row, MasterField::VariantPhoto),
                bpom: field_opt(row, MasterField::Bpom),
                ingredients: field_opt(row, MasterField::Ingredients),
            },
        })
    }
}

/// 组内第一个非空值
fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn merge_row(group: &mut MasterGroup, row: &CsvRow, parsed: ParsedRow) {
    if group.name.is_empty() {
        if let Some(name) = parsed.product_name {
            group.name = name;
        }
    }
    fill(&mut group.master_sku, parsed.variant.sku_master.clone());
    fill(&mut group.brand, field_opt(row, MasterField::Brand));
    fill(&mut group.category, field_opt(row, MasterField::Category));
    fill(&mut group.sub_category, field_opt(row, MasterField::SubCategory));
    fill(&mut group.sub_sub_category, field_opt(row, MasterField::SubSubCategory));
    fill(&mut group.concern, field_opt(row, MasterField::Concern));
    fill(&mut group.concern_options, field_opt(row, MasterField::ConcernOptions));
    fill(&mut group.description, field_opt(row, MasterField::Description));
    fill(&mut group.how_to_use, field_opt(row, MasterField::HowToUse));
    fill(&mut group.status, field_opt(row, MasterField::Status));

    if group.base_price.is_none() {
        group.base_price = parsed.base_price;
    }
    if group.weight.is_none() {
        group.weight = parsed.weight;
    }

    let tags = split_list(field_value(row, MasterField::Tags));
    let accumulated = std::mem::take(&mut group.tags);
    group.tags = dedup_case_insensitive(accumulated.into_iter().chain(tags).collect());

    for photo in split_list(field_value(row, MasterField::Photos)) {
        if !group.photos.contains(&photo) {
            group.photos.push(photo);
        }
    }

    group.variants.push(parsed.variant);
}

fn finalize(group: &mut MasterGroup) {
    // 仅有 sku master 的分组以 SKU 作为商品名
    if group.name.is_empty() {
        group.name = group.master_sku.clone().unwrap_or_else(|| group.key.clone());
    }
    if group.base_price.is_none() {
        group.base_price = group.variants.iter().find_map(|v| v.price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> CsvRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn numbered(rows: Vec<CsvRow>) -> Vec<CsvRow> {
        rows.into_iter()
            .enumerate()
            .map(|(idx, r)| r.with_row_number(idx + 1))
            .collect()
    }

    #[test]
    fn test_groups_by_sku_master() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![
            row(&[
                ("nama produk", "Lip Tint"),
                ("nama varian", "Red"),
                ("sku master", "LT01"),
                ("harga", "25000"),
                ("tags", "Vegan|Halal"),
                ("foto produk", "a.jpg"),
            ]),
            row(&[
                ("nama produk", "Lip Tint"),
                ("nama varian", "Pink"),
                ("sku master", "LT01"),
                ("brand", "Wardah"),
                ("tags", "halal;Best Seller"),
                ("foto produk", "a.jpg|b.jpg"),
            ]),
            row(&[("nama produk", "Serum"), ("nama varian", "30ml"), ("sku master", "")]),
        ];

        let (groups, errors) = grouper.group(&rows);
        assert!(errors.is_empty());
        assert_eq!(groups.len(), 2);

        let lip = &groups[0];
        assert_eq!(lip.key, "LT01");
        assert_eq!(lip.variants.len(), 2);
        assert_eq!(lip.brand.as_deref(), Some("Wardah"));
        assert_eq!(lip.tags, vec!["Vegan", "Halal", "Best Seller"]);
        assert_eq!(lip.photos, vec!["a.jpg", "b.jpg"]);
        assert_eq!(lip.base_price, Some(25_000.0));

        assert_eq!(groups[1].key, "serum");
        assert_eq!(groups[1].master_sku, None);
    }

    #[test]
    fn test_soft_errors_skip_rows() {
        let grouper = MasterGrouper::new("id");
        let rows = numbered(vec![
            row(&[("nama produk", ""), ("nama varian", "Red"), ("sku master", "")]),
            row(&[("nama produk", "Toner"), ("nama varian", ""), ("sku master", "TN01")]),
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("harga", "murah")]),
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("stok", "1.5")]),
            row(&[("nama produk", "Toner"), ("nama varian", "200ml"), ("stok", "3")]),
        ]);

        let (groups, errors) = grouper.group(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].variants[0].stock, 3);
        assert_eq!(groups[0].variants[0].row_number, 5);

        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Nama produk atau SKU master wajib diisi",
                "Nama varian wajib diisi",
                "Harga harus berupa angka",
                "Stok harus berupa angka bulat",
            ]
        );
        assert_eq!(errors[1].name.as_deref(), Some("Toner"));
    }

    #[test]
    fn test_base_price_prefers_explicit_column() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("harga", "10")]),
            row(&[("nama produk", "TONER"), ("nama varian", "200ml"), ("harga dasar", "15")]),
        ];

        let (groups, _) = grouper.group(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Toner");
        assert_eq!(groups[0].base_price, Some(15.0));
    }

    #[test]
    fn test_sku_only_group_named_after_sku() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![row(&[("nama produk", ""), ("nama varian", "Red"), ("sku master", "X9")])];

        let (groups, errors) = grouper.group(&rows);
        assert!(errors.is_empty());
        assert_eq!(groups[0].name, "X9");
    }

    #[test]
    fn test_rows_without_sku_join_named_group() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![
            row(&[
                ("nama produk", "Lip Tint"),
                ("nama varian", "Red"),
                ("sku master", "LT01"),
                ("tags", "Vegan|Halal"),
            ]),
            row(&[("nama produk", "lip tint"), ("nama varian", "Pink"), ("sku master", "")]),
        ];

        let (groups, errors) = grouper.group(&rows);
        assert!(errors.is_empty());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "LT01");
        assert_eq!(groups[0].master_sku.as_deref(), Some("LT01"));
        assert_eq!(groups[0].variants.len(), 2);
        assert_eq!(groups[0].tags, vec!["Vegan", "Halal"]);
    }

    #[test]
    fn test_sku_row_after_unnamed_sku_row_joins_by_name() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("sku master", "")]),
            row(&[("nama produk", "Toner"), ("nama varian", "200ml"), ("sku master", "TN01")]),
            row(&[("nama produk", ""), ("nama varian", "300ml"), ("sku master", "TN01")]),
        ];

        let (groups, _) = grouper.group(&rows);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "TN01");
        assert_eq!(groups[0].name, "Toner");
        assert_eq!(groups[0].variants.len(), 3);
    }

    #[test]
    fn test_same_name_different_sku_stays_separate() {
        let grouper = MasterGrouper::new("id");
        let rows = vec![
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("sku master", "TN01")]),
            row(&[("nama produk", "Toner"), ("nama varian", "100ml"), ("sku master", "TN02")]),
        ];

        let (groups, _) = grouper.group(&rows);
        assert_eq!(groups.len(), 2);
    }
}
