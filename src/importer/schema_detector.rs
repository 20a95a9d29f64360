// ==========================================
// 商品目录导入 - 文件形态判定
// ==========================================
// 规则: 表头同时包含 "nama produk" / "nama varian" / "sku master"
//       → 主表形态；否则 → 模板形态（仅精确键匹配）
// ==========================================

use crate::domain::CsvSchema;
use crate::importer::data_cleaner::normalize_header;

/// 主表形态的判别表头
pub const MASTER_DISCRIMINATORS: [&str; 3] = ["nama produk", "nama varian", "sku master"];

/// 按表头集合判定文件形态
pub fn detect_schema<S: AsRef<str>>(headers: &[S]) -> CsvSchema {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();

    let is_master = MASTER_DISCRIMINATORS
        .iter()
        .all(|key| normalized.iter().any(|h| h == key));

    if is_master {
        CsvSchema::Master
    } else {
        CsvSchema::Template
    }
}
