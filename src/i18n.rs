// ==========================================
// Message localization (i18n)
// ==========================================
// Uses rust-i18n; English (default) and Brazilian Portuguese.
// The locale is passed explicitly per call instead of relying on
// the process-global locale, so concurrent imports with different
// message locales do not interfere.
// Note: rust_i18n::i18n! is initialized in lib.rs
// ==========================================

/// Default message locale
pub const DEFAULT_LOCALE: &str = "en";

/// Whether a locale has a message catalog
pub fn is_supported_locale(locale: &str) -> bool {
    rust_i18n::available_locales!()
        .iter()
        .any(|available| *available == locale)
}

/// Resolve a requested locale, falling back to the default
pub fn resolve_locale(locale: &str) -> &str {
    let trimmed = locale.trim();
    if is_supported_locale(trimmed) {
        trimmed
    } else {
        DEFAULT_LOCALE
    }
}

/// Translate a message without arguments
///
/// An unsupported locale falls back to the default catalog.
///
/// # Example
/// ```no_run
/// use translator_docs::i18n::t;
/// let msg = t("en", "import.status.failed");
/// ```
pub fn t(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = resolve_locale(locale)).to_string()
}

/// Translate a message with `%{name}` arguments
///
/// # Example
/// ```no_run
/// use translator_docs::i18n::t_with_args;
/// let msg = t_with_args("en", "import.row.required_fields_missing", &[("row", "2")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
