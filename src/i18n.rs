// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持印尼语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 导入流程始终显式传入 locale，不依赖全局 locale 状态
// ==========================================

/// 默认语言（行级错误信息的契约语言）
pub const DEFAULT_LOCALE: &str = "id";

/// 按指定语言翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use catalog_import::i18n::t_in;
/// let msg = t_in("import.empty_file", "id");
/// ```
pub fn t_in(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_indonesian() {
        assert_eq!(t_in("import.empty_file", "id"), "File CSV kosong");
        assert_eq!(t_in("validation.name_required", "id"), "Nama produk wajib diisi");
    }

    #[test]
    fn test_translate_english() {
        assert_eq!(t_in("import.empty_file", "en"), "CSV file is empty");
    }

    #[test]
    fn test_default_locale_is_indonesian() {
        let msg = t_in("validation.variant_name_required", DEFAULT_LOCALE);
        assert_eq!(msg, "Nama varian wajib diisi");
    }
}
