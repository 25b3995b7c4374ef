// ==========================================
// Translator Docs - language detection
// ==========================================
// Responsibility: guess a locale code ("xx-xx") for a content snippet
// The import pipeline treats every failure as "no locale".
// ==========================================

pub mod openai_detector;

use async_trait::async_trait;
use thiserror::Error;

pub use openai_detector::{LanguageDetectorSettings, OpenAiLanguageDetector};

// ==========================================
// DetectorError
// ==========================================
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("language detector is not configured")]
    NotConfigured,

    #[error("language detector request failed: {0}")]
    Network(String),

    #[error("language detector returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("language detector response could not be parsed: {0}")]
    Parse(String),
}

pub type DetectorResult<T> = Result<T, DetectorError>;

// ==========================================
// LanguageDetector Trait
// ==========================================
// Used by: RowProcessor (locale fallback)
// Implementors: OpenAiLanguageDetector, DisabledLanguageDetector, test doubles
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of a snippet
    ///
    /// # Returns
    /// - Ok(String): the raw answer, not yet checked against the locale format
    /// - Err: transport or protocol failure
    async fn detect(&self, snippet: &str) -> DetectorResult<String>;
}

// ==========================================
// DisabledLanguageDetector
// ==========================================
// Used when no API key is configured: every row without a location
// keeps an empty one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLanguageDetector;

#[async_trait]
impl LanguageDetector for DisabledLanguageDetector {
    async fn detect(&self, _snippet: &str) -> DetectorResult<String> {
        Ok(String::new())
    }
}

/// Whether `code` has the exact shape `xx-xx` (lowercase ASCII letters)
pub fn is_locale_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 5
        && bytes[2] == b'-'
        && bytes[..2].iter().all(u8::is_ascii_lowercase)
        && bytes[3..].iter().all(u8::is_ascii_lowercase)
}

/// Normalize a detector answer into a locale code, or "" if it is not one
pub fn normalize_locale(answer: &str) -> String {
    let candidate = answer.trim().to_lowercase();
    if is_locale_code(&candidate) {
        candidate
    } else {
        String::new()
    }
}
