// ==========================================
// 商品目录导入 - 数据清洗
// ==========================================
// 职责: 表头/单元格标准化、列表拆分、数值解析、缓存键规整
// 红线: 纯函数，不访问数据库
// ==========================================

/// 视为“空值”的占位文本（不区分大小写）
const NULL_LIKE: [&str; 3] = ["null", "undefined", "nan"];

const BOM: char = '\u{feff}';

/// 单元格标准化
///
/// 空串 / "null" / "undefined" / "nan" → ""，其余去首尾空白
pub fn normalize_value(value: &str) -> String {
    let trimmed = value.trim();
    if NULL_LIKE.iter().any(|n| trimmed.eq_ignore_ascii_case(n)) {
        return String::new();
    }
    trimmed.to_string()
}

/// 表头标准化: 去 BOM、去空白、小写
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches(BOM).trim().to_lowercase()
}

/// 查找缓存键: 去空白、小写
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 列表单元格拆分
///
/// 优先按 `|`，其次 `;`，最后 `,`；去空白、丢弃空项
pub fn split_list(value: &str) -> Vec<String> {
    let separator = if value.contains('|') {
        '|'
    } else if value.contains(';') {
        ';'
    } else {
        ','
    };

    value
        .split(separator)
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// 列表去重（不区分大小写，保留首次出现）
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(normalize_key(item)))
        .collect()
}

/// 解析小数（空串视为缺省）
///
/// Err 携带原始文本
pub fn parse_decimal(value: &str) -> Result<Option<f64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(trimmed.to_string()),
    }
}

/// 解析整数（允许 "12.0" 这类无小数部分的写法）
pub fn parse_integer(value: &str) -> Result<Option<i64>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(Some(v));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
        _ => Err(trimmed.to_string()),
    }
}

/// 空串转 None
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
