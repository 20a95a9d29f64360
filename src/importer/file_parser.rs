// ==========================================
// 商品目录导入 - CSV 读取器
// ==========================================
// 阶段 0: 文件读取与解析
// - 首行分隔符嗅探（逗号 / 分号）
// - 表头标准化（去 BOM / 去空白 / 小写）
// - 单元格标准化（null-like → ""）
// - 逐行流式读取，解析失败立即中止（不落库）
// ==========================================

use crate::importer::catalog_importer_trait::FileParser;
use crate::importer::data_cleaner::{normalize_header, normalize_value};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// 标准化后的原始行
///
/// `row_number` 为 1-based 数据行号，按表头之后的物理行计，
/// 空行与被跳过的空白行不改变后续行号
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    pub row_number: usize,
    pub values: HashMap<String, String>,
}

impl CsvRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            values: HashMap::new(),
        }
    }

    /// 按标准化表头取值
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    pub fn with_row_number(mut self, row_number: usize) -> Self {
        self.row_number = row_number;
        self
    }

    fn is_blank(&self) -> bool {
        self.values.values().all(|v| v.is_empty())
    }
}

impl FromIterator<(String, String)> for CsvRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            row_number: 0,
            values: iter.into_iter().collect(),
        }
    }
}

/// 读取结果
#[derive(Debug, Clone, Default)]
pub struct RawCsv {
    pub headers: Vec<String>,
    pub rows: Vec<CsvRow>,
    pub separator: u8,
}

/// 首行分隔符嗅探
///
/// 分号数严格多于逗号数时取 `;`，否则取 `,`
pub fn sniff_delimiter(first_line: &str) -> u8 {
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// 记录首行所在的物理行号
///
/// csv 读取器记录的起始位置包含其前被忽略的空行，这里由结束位置反推；
/// 引号内的换行计入记录跨越的行数
fn record_first_line(end_line: u64, record: &StringRecord, terminated: bool) -> u64 {
    let embedded: u64 = record.iter().map(|f| f.matches('\n').count() as u64).sum();
    let last_line = if terminated {
        end_line.saturating_sub(1)
    } else {
        end_line
    };
    last_line.saturating_sub(embedded)
}

/// 允许的扩展名（无扩展名同样接受）
const ACCEPTED_EXTENSIONS: &[&str] = &["csv", "txt", "tmp"];

// ==========================================
// CsvParser 实现
// ==========================================
pub struct CsvParser {
    max_rows: usize,
}

impl CsvParser {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl FileParser for CsvParser {
    fn read(&self, path: &Path) -> ImportResult<RawCsv> {
        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 上传临时文件可能没有扩展名或为 .tmp
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
                return Err(ImportError::UnsupportedFormat(ext));
            }
        }

        let file = File::open(path)?;
        let mut buffered = BufReader::new(file);

        // 嗅探分隔符后回到文件开头
        let mut first_line = String::new();
        buffered.read_line(&mut first_line)?;
        let separator = sniff_delimiter(&first_line);

        // 末行是否以换行结尾（用于推算最后一条记录的行号）
        let file_len = buffered.seek(SeekFrom::End(0))?;
        let trailing_newline = if file_len > 0 {
            buffered.seek(SeekFrom::End(-1))?;
            let mut last = [0u8; 1];
            buffered.read_exact(&mut last)?;
            last[0] == b'\n'
        } else {
            false
        };
        buffered.seek(SeekFrom::Start(0))?;

        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(buffered);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        let header_line = reader.position().line().saturating_sub(1);

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            let end = reader.position();
            let terminated = end.byte() < file_len || trailing_newline;
            let start_line = record_first_line(end.line(), &record, terminated);
            let row_number = start_line.saturating_sub(header_line) as usize;

            let mut row = CsvRow::new(row_number);
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    // 重名表头: 保留第一列
                    row.values
                        .entry(header.clone())
                        .or_insert_with(|| normalize_value(value));
                }
            }

            // 跳过完全空白的行
            if row.is_blank() {
                continue;
            }

            rows.push(row);
            if rows.len() > self.max_rows {
                return Err(ImportError::TooManyRows {
                    limit: self.max_rows,
                });
            }
        }

        debug!(
            rows = rows.len(),
            columns = headers.len(),
            separator = %(separator as char),
            "CSV 读取完成"
        );

        Ok(RawCsv {
            headers,
            rows,
            separator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("a,b;c"), b',');
        assert_eq!(sniff_delimiter("a;b,c,d"), b',');
        assert_eq!(sniff_delimiter("abc"), b',');
    }

    #[test]
    fn test_read_semicolon_with_bom() {
        let file = csv_file("\u{feff}Nama Produk;SKU Master\nLip Tint;LT01\n  Serum ;NULL\n");
        let parsed = CsvParser::new(100).read(file.path()).unwrap();

        assert_eq!(parsed.separator, b';');
        assert_eq!(parsed.headers, vec!["nama produk", "sku master"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].get("nama produk"), Some("Lip Tint"));
        assert_eq!(parsed.rows[1].get("nama produk"), Some("Serum"));
        assert_eq!(parsed.rows[1].get("sku master"), Some(""));
    }

    #[test]
    fn test_skip_blank_rows() {
        let file = csv_file("name,base_price\nA,100\n,\nundefined,nan\nB,200\n");
        let parsed = CsvParser::new(100).read(file.path()).unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn test_row_numbers_follow_file_lines() {
        let file = csv_file("name,base_price\nA,100\n\n,\nB,200\n");
        let parsed = CsvParser::new(100).read(file.path()).unwrap();

        let numbers: Vec<usize> = parsed.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 4]);
        assert_eq!(parsed.rows[1].get("name"), Some("B"));
    }

    #[test]
    fn test_row_numbers_without_trailing_newline() {
        let file = csv_file("name,note\nA,\"baris\nkedua\"\n\nB,x");
        let parsed = CsvParser::new(100).read(file.path()).unwrap();

        let numbers: Vec<usize> = parsed.rows.iter().map(|r| r.row_number).collect();
        assert_eq!(numbers, vec![1, 4]);
    }

    #[test]
    fn test_accepts_tmp_extension() {
        let mut file = Builder::new().suffix(".tmp").tempfile().unwrap();
        file.write_all(b"name\nA\n").unwrap();
        let parsed = CsvParser::new(10).read(file.path()).unwrap();
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn test_invalid_utf8_aborts_read() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(b"name,status\nA,normal\nB,\xff\xfe\n").unwrap();
        let result = CsvParser::new(10).read(file.path());
        assert!(matches!(result, Err(ImportError::CsvParseError(_))));
    }

    #[test]
    fn test_empty_file() {
        let file = csv_file("");
        let parsed = CsvParser::new(100).read(file.path()).unwrap();
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn test_too_many_rows() {
        let file = csv_file("name\nA\nB\nC\n");
        let result = CsvParser::new(2).read(file.path());
        assert!(matches!(result, Err(ImportError::TooManyRows { limit: 2 })));
    }

    #[test]
    fn test_file_not_found() {
        let result = CsvParser::new(10).read(Path::new("tidak_ada.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = CsvParser::new(10).read(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
