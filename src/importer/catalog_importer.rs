// ==========================================
// 商品目录导入 - 导入编排实现
// ==========================================
// 流程: 读取 → 空文件检查 → 形态判定 → 校验/分组（事务外）
//       → 落库（单事务）→ 汇总
// 事务: 只包裹落库阶段；硬错误时 Transaction 析构即回滚
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{CsvSchema, ImportOutcome, ImportRowError, ImportStats, RowRef};
use crate::i18n::t_in;
use crate::importer::catalog_importer_trait::{CatalogImporter, FileParser};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{CsvParser, CsvRow};
use crate::importer::master_grouper::MasterGrouper;
use crate::importer::master_processor::MasterProcessor;
use crate::importer::schema_detector::detect_schema;
use crate::importer::session::ImportSession;
use crate::importer::template_importer::TemplateImporter;
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CatalogImporterImpl
// ==========================================
pub struct CatalogImporterImpl {
    conn: Arc<Mutex<Connection>>,
    config: ImportConfig,
    file_parser: Box<dyn FileParser>,
}

impl CatalogImporterImpl {
    pub fn new(conn: Arc<Mutex<Connection>>, config: ImportConfig) -> ImportResult<Self> {
        config.validate().map_err(ImportError::ConfigError)?;
        let file_parser = Box::new(CsvParser::new(config.max_rows));
        Ok(Self {
            conn,
            config,
            file_parser,
        })
    }

    /// 模板形态: 校验（事务外）→ 新建（事务内）
    fn import_template(&self, rows: &[CsvRow]) -> ImportResult<ImportOutcome> {
        let importer = TemplateImporter::new(self.config.locale.clone());
        let (valid, errors) = importer.validate(rows);
        info!(valid = valid.len(), rejected = errors.len(), "模板行校验完成");

        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::LockError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

        let created = importer.process(&tx, &valid)?;

        tx.commit()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;
        info!(created = created, "模板商品落库完成");

        Ok(ImportOutcome::new(errors, None))
    }

    /// 主表形态: 分组（事务外）→ 逐组落库（事务内）
    fn import_master(&self, rows: &[CsvRow]) -> ImportResult<ImportOutcome> {
        let grouper = MasterGrouper::new(self.config.locale.clone());
        let (groups, errors) = grouper.group(rows);
        info!(groups = groups.len(), rejected = errors.len(), "主表分组完成");

        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::LockError(e.to_string()))?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

        let mut session = ImportSession::begin(&tx, &self.config)?;
        MasterProcessor::process(&tx, &mut session, &groups)?;

        tx.commit()
            .map_err(|e| ImportError::DatabaseTransactionError(e.to_string()))?;

        let stats: ImportStats = session.stats;
        info!(
            product_created = stats.product_created,
            product_updated = stats.product_updated,
            variant_created = stats.variant_created,
            media_created = stats.media_created,
            tag_attached = stats.tag_attached,
            concern_attached = stats.concern_attached,
            variant_attr_attached = stats.variant_attr_attached,
            online_created = stats.online_created,
            "主表落库完成"
        );

        Ok(ImportOutcome::new(errors, Some(stats)))
    }
}

#[async_trait]
impl CatalogImporter for CatalogImporterImpl {
    #[instrument(skip(self, file_path), fields(run_id))]
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(file_path = %file_path.display(), "开始导入商品目录");

        // === 步骤 1: 读取文件 ===
        let raw = self.file_parser.read(file_path)?;

        // === 步骤 2: 空文件 ===
        if raw.rows.is_empty() {
            warn!("CSV 无数据行，终止导入");
            return Ok(ImportOutcome::new(
                vec![ImportRowError {
                    row: RowRef::file(),
                    name: None,
                    message: t_in("import.empty_file", &self.config.locale),
                }],
                None,
            ));
        }

        // === 步骤 3: 形态判定 ===
        let schema = detect_schema(&raw.headers);
        debug!(schema = ?schema, rows = raw.rows.len(), "文件形态判定完成");

        // === 步骤 4/5: 校验或分组 + 落库 ===
        let outcome = match schema {
            CsvSchema::Template => self.import_template(&raw.rows)?,
            CsvSchema::Master => self.import_master(&raw.rows)?,
        };

        info!(
            schema = ?schema,
            rows = raw.rows.len(),
            errors = outcome.errors.len(),
            success = outcome.success,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "商品目录导入完成"
        );

        Ok(outcome)
    }
}
