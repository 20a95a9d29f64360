// ==========================================
// 商品目录导入 - 模板形态导入
// ==========================================
// 一行 = 一个商品；只新建，不更新（重复导入会生成重复商品）
// 校验失败的行记为行级错误并跳过，其余行照常导入
// ==========================================

use crate::domain::{ImportRowError, NewProduct, ProductStatus, TemplateRow};
use crate::i18n::t_in;
use crate::importer::data_cleaner::{non_empty, parse_decimal, parse_integer};
use crate::importer::field_mapper::{field_opt, field_value, TemplateField};
use crate::importer::file_parser::CsvRow;
use crate::importer::slug_service::ensure_unique_slug;
use crate::importer::syncers::ProductOnlineEnsurer;
use crate::repository::{CatalogTable, ProductRepository, RepositoryResult};
use rusqlite::Transaction;
use tracing::{debug, warn};

pub struct TemplateImporter {
    locale: String,
}

impl TemplateImporter {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// 逐行校验，返回 (通过的行, 行级错误)
    pub fn validate(&self, rows: &[CsvRow]) -> (Vec<TemplateRow>, Vec<ImportRowError>) {
        let mut valid = Vec::with_capacity(rows.len());
        let mut errors = Vec::new();

        for row in rows {
            let row_number = row.row_number;
            match self.validate_row(row, row_number) {
                Ok(parsed) => valid.push(parsed),
                Err(message) => {
                    let name = field_opt(row, TemplateField::Name);
                    warn!(row = row_number, message = %message, "模板行校验失败");
                    errors.push(ImportRowError::at(row_number, name, message));
                }
            }
        }

        (valid, errors)
    }

    fn validate_row(&self, row: &CsvRow, row_number: usize) -> Result<TemplateRow, String> {
        let msg = |key: &str| t_in(key, &self.locale);

        let name = field_value(row, TemplateField::Name);
        if name.is_empty() {
            return Err(msg("validation.name_required"));
        }

        let category_type_id = match parse_integer(field_value(row, TemplateField::CategoryTypeId)) {
            Ok(Some(id)) => id,
            _ => return Err(msg("validation.category_required")),
        };

        let base_price = parse_decimal(field_value(row, TemplateField::BasePrice))
            .map_err(|_| msg("validation.base_price_numeric"))?;
        let weight = parse_decimal(field_value(row, TemplateField::Weight))
            .map_err(|_| msg("validation.weight_numeric"))?;

        let is_flash_sale = match field_value(row, TemplateField::IsFlashSale) {
            "" | "0" => false,
            "1" => true,
            _ => return Err(msg("validation.flash_sale_flag")),
        };

        let status = match field_value(row, TemplateField::Status) {
            "" => None,
            raw => Some(ProductStatus::parse_strict(raw).ok_or_else(|| msg("validation.status_invalid"))?),
        };

        Ok(TemplateRow {
            row_number,
            name: name.to_string(),
            slug: field_opt(row, TemplateField::Slug),
            description: field_opt(row, TemplateField::Description),
            base_price,
            weight,
            is_flash_sale,
            status,
            category_type_id,
            brand_id: optional_id(row, TemplateField::BrandId, row_number),
            persona_id: optional_id(row, TemplateField::PersonaId, row_number),
            how_to_use: non_empty(field_value(row, TemplateField::HowToUse).to_string()),
        })
    }

    /// 新建商品并确保上架标记，返回新建数
    pub fn process(&self, tx: &Transaction, rows: &[TemplateRow]) -> RepositoryResult<usize> {
        let mut created = 0;
        for row in rows {
            let base = row.slug.as_deref().unwrap_or(&row.name);
            let slug = ensure_unique_slug(tx, CatalogTable::Products, base)?;

            let product = NewProduct {
                name: row.name.clone(),
                slug,
                master_sku: None,
                description: row.description.clone(),
                base_price: row.base_price,
                weight: row.weight,
                is_flash_sale: row.is_flash_sale,
                status: row.status,
                category_type_id: Some(row.category_type_id),
                brand_id: row.brand_id,
                persona_id: row.persona_id,
                how_to_use: row.how_to_use.clone(),
            };
            let product_id = ProductRepository::insert(tx, &product)?;
            ProductOnlineEnsurer::ensure(tx, product_id)?;

            debug!(row = row.row_number, product_id = product_id, slug = %product.slug, "模板商品已新建");
            created += 1;
        }
        Ok(created)
    }
}

/// 可选外键列: 非数字时忽略该值
fn optional_id(row: &CsvRow, field: TemplateField, row_number: usize) -> Option<i64> {
    match parse_integer(field_value(row, field)) {
        Ok(id) => id,
        Err(raw) => {
            warn!(row = row_number, field = ?field, value = %raw, "外键列非数字，已忽略");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use rusqlite::Connection;

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
    fn test_validate_collects_row_errors() {
        let importer = TemplateImporter::new("id");
        let rows = numbered(vec![
            row(&[("name", "Toner"), ("category_type_id", "1")]),
            row(&[("name", ""), ("category_type_id", "1")]),
            row(&[("name", "Serum"), ("category_type_id", "abc")]),
            row(&[("name", "Krim"), ("category_type_id", "1"), ("base_price", "mahal")]),
            row(&[("name", "Sabun"), ("category_type_id", "1"), ("is_flash_sale", "ya")]),
            row(&[("name", "Masker"), ("category_type_id", "1"), ("status", "aktif")]),
            row(&[("name", "Lotion"), ("category_type_id", "2"), ("status", "WAR"), ("is_flash_sale", "1")]),
        ]);

        let (valid, errors) = importer.validate(&rows);
        assert_eq!(valid.len(), 2);
        assert_eq!(errors.len(), 5);

        assert_eq!(errors[0], ImportRowError::at(2, None, "Nama produk wajib diisi"));
        assert_eq!(errors[1].name.as_deref(), Some("Serum"));
        assert_eq!(errors[2].message, "base_price harus berupa angka");
        assert_eq!(errors[3].message, "is_flash_sale harus bernilai 0 atau 1");
        assert_eq!(errors[4].message, "status harus salah satu dari: normal, war, draft");

        assert_eq!(valid[1].status, Some(ProductStatus::War));
        assert!(valid[1].is_flash_sale);
        assert_eq!(valid[1].row_number, 7);
    }

    #[test]
    fn test_validate_reports_reader_row_number() {
        let importer = TemplateImporter::new("id");
        let rows = vec![
            row(&[("name", "Toner"), ("category_type_id", "1")]).with_row_number(1),
            row(&[("name", ""), ("category_type_id", "1")]).with_row_number(5),
        ];

        let (_, errors) = importer.validate(&rows);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, crate::domain::RowRef::Line(5));
    }

    #[test]
    fn test_validate_english_messages() {
        let importer = TemplateImporter::new("en");
        let (_, errors) = importer.validate(&[row(&[("category_type_id", "1")])]);
        assert_eq!(errors.len(), 1);
        assert_ne!(errors[0].message, "Nama produk wajib diisi");
    }

    #[test]
    fn test_process_creates_products_and_online() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let tx = conn.transaction().unwrap();
        tx.execute("INSERT INTO category_types (name, slug) VALUES ('Skincare', 'skincare')", [])
            .unwrap();
        let category_id = tx.last_insert_rowid().to_string();

        let importer = TemplateImporter::new("id");
        let rows = vec![
            row(&[("name", "Lip Tint"), ("category_type_id", category_id.as_str())]),
            row(&[("name", "Lip Tint"), ("category_type_id", category_id.as_str())]),
        ];
        let (valid, errors) = importer.validate(&rows);
        assert!(errors.is_empty());

        assert_eq!(importer.process(&tx, &valid).unwrap(), 2);

        let slugs: Vec<String> = tx
            .prepare("SELECT slug FROM products ORDER BY id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(slugs, vec!["lip-tint", "lip-tint-2"]);

        let online: i64 = tx
            .query_row("SELECT COUNT(*) FROM product_onlines", [], |r| r.get(0))
            .unwrap();
        assert_eq!(online, 2);
    }
}
