// ==========================================
// Translator Docs - document structural validation
// ==========================================
// Fixed ruleset applied to every built document.
// ==========================================

use crate::domain::document::Document;
use crate::i18n;

/// Check a document, returning one localized message per violation
pub fn validate_document(document: &Document, locale: &str) -> Vec<String> {
    let mut violations = Vec::new();

    if document.subject.trim().is_empty() {
        violations.push(i18n::t(locale, "document.validation.subject_required"));
    }
    if document.content.trim().is_empty() {
        violations.push(i18n::t(locale, "document.validation.content_required"));
    }
    if document.author.trim().is_empty() {
        violations.push(i18n::t(locale, "document.validation.author_required"));
    }
    if document.translator_id.is_none() {
        violations.push(i18n::t(locale, "document.validation.translator_required"));
    }

    violations
}

/// Newline-joined violation messages, or None when the document is valid
pub fn joined_violations(document: &Document, locale: &str) -> Option<String> {
    let violations = validate_document(document, locale);
    if violations.is_empty() {
        None
    } else {
        Some(violations.join("\n"))
    }
}
