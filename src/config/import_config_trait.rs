// ==========================================
// Translator Docs - import config reader trait
// ==========================================
// Responsibility: configuration the import runner needs (read-only)
// ==========================================

use crate::config::error::ConfigResult;
use async_trait::async_trait;
use std::time::Duration;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// Implementors: ConfigManager (config_kv table), test doubles
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// Number of content characters sent to the language detector
    ///
    /// # Default
    /// - 40
    async fn get_detect_snippet_chars(&self) -> ConfigResult<usize>;

    /// Time limit for one language detection call
    ///
    /// # Default
    /// - 10 s
    async fn get_detect_timeout(&self) -> ConfigResult<Duration>;

    /// Locale of the row and batch messages ("en" or "pt-BR")
    ///
    /// # Default
    /// - en
    async fn get_message_locale(&self) -> ConfigResult<String>;
}
