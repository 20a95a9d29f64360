// ==========================================
// 商品目录导入 - 命令行入口
// ==========================================
// 用法:
//   catalog-import <csv_path> [--db <db_path>] [--json-log]
//
// 输出: ImportOutcome（JSON）；success=false 或硬错误时退出码非 0
// ==========================================

use anyhow::{bail, Context};
use catalog_import::config::default_db_path;
use catalog_import::db::{init_schema, open_sqlite_connection};
use catalog_import::{logging, CatalogImporter, CatalogImporterImpl, ConfigManager};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct CliArgs {
    csv_path: PathBuf,
    db_path: PathBuf,
    json_log: bool,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut csv_path = None;
    let mut db_path = None;
    let mut json_log = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let value = args.next().context("--db 需要一个路径参数")?;
                db_path = Some(PathBuf::from(value));
            }
            "--json-log" => json_log = true,
            other if other.starts_with("--") => bail!("未知参数: {}", other),
            other => {
                if csv_path.is_some() {
                    bail!("只能指定一个 CSV 文件");
                }
                csv_path = Some(PathBuf::from(other));
            }
        }
    }

    Ok(CliArgs {
        csv_path: csv_path.context("用法: catalog-import <csv_path> [--db <db_path>] [--json-log]")?,
        db_path: db_path.unwrap_or_else(default_db_path),
        json_log,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;

    // 初始化日志系统
    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("商品目录导入 v{}", catalog_import::VERSION);
    tracing::info!("使用数据库: {}", args.db_path.display());

    if let Some(parent) = args.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建数据库目录: {}", parent.display()))?;
        }
    }

    let db_path = args.db_path.to_string_lossy().to_string();
    let conn = open_sqlite_connection(&db_path).context("无法打开数据库")?;
    init_schema(&conn).context("无法初始化表结构")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())
        .load_import_config()
        .context("无法加载导入参数")?;
    let importer = CatalogImporterImpl::new(conn, config)?;

    let outcome = importer
        .import_file(&args.csv_path)
        .await
        .with_context(|| format!("导入失败: {}", args.csv_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
