// ==========================================
// Translator Docs - per-run import settings
// ==========================================

use crate::config::config_manager::{DEFAULT_DETECT_SNIPPET_CHARS, DEFAULT_DETECT_TIMEOUT_MS};
use crate::config::ImportConfigReader;
use crate::i18n::DEFAULT_LOCALE;
use std::time::Duration;
use tracing::warn;

/// Settings snapshot taken once at the start of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSettings {
    pub detect_snippet_chars: usize,
    pub detect_timeout: Duration,
    pub message_locale: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            detect_snippet_chars: DEFAULT_DETECT_SNIPPET_CHARS,
            detect_timeout: Duration::from_millis(DEFAULT_DETECT_TIMEOUT_MS),
            message_locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ImportSettings {
    /// Read settings; an unreadable or malformed value is logged and its default kept
    pub async fn load<C: ImportConfigReader + ?Sized>(config: &C) -> Self {
        let mut settings = Self::default();

        match config.get_detect_snippet_chars().await {
            Ok(chars) => settings.detect_snippet_chars = chars,
            Err(e) => warn!(error = %e, "detect_snippet_chars unavailable, using default"),
        }
        match config.get_detect_timeout().await {
            Ok(timeout) => settings.detect_timeout = timeout,
            Err(e) => warn!(error = %e, "detect_timeout unavailable, using default"),
        }
        match config.get_message_locale().await {
            Ok(locale) => settings.message_locale = locale,
            Err(e) => warn!(error = %e, "message_locale unavailable, using default"),
        }

        settings
    }
}
