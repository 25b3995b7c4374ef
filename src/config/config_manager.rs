// ==========================================
// Translator Docs - configuration manager
// ==========================================
// Responsibility: load, query and override settings
// Storage: config_kv table (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::detector::openai_detector::{
    LanguageDetectorSettings, DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
};
use crate::i18n;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Environment variable consulted when no API key is stored
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_DETECT_SNIPPET_CHARS: usize = 40;
pub const DEFAULT_DETECT_TIMEOUT_MS: u64 = 10_000;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager on its own connection
    ///
    /// # Parameters
    /// - db_path: database file path
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a ConfigManager on a shared connection
    ///
    /// The common PRAGMAs are re-applied (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    /// Read a value from config_kv (scope_id='global')
    ///
    /// # Returns
    /// - Some(String): stored value
    /// - None: key not set
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Parse a stored value; a missing key yields the default, a malformed one an error
    fn get_parsed<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                }),
        }
    }

    /// Insert or overwrite a global value
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Snapshot of all global values, ordered by key
    pub fn get_all_values(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut values = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            values.insert(key, value);
        }
        Ok(values)
    }

    // ===== Language detector =====

    /// Settings for the OpenAI detector
    ///
    /// # Returns
    /// - Ok(Some): an API key is stored, or set in OPENAI_API_KEY
    /// - Ok(None): no API key anywhere, detection stays disabled
    pub fn language_detector_settings(&self) -> ConfigResult<Option<LanguageDetectorSettings>> {
        self.detector_settings_with_env_key(std::env::var(API_KEY_ENV).ok())
    }

    pub(crate) fn detector_settings_with_env_key(
        &self,
        env_key: Option<String>,
    ) -> ConfigResult<Option<LanguageDetectorSettings>> {
        let api_key = self
            .get_config_value(config_keys::DETECTOR_API_KEY)?
            .filter(|k| !k.trim().is_empty())
            .or_else(|| env_key.filter(|k| !k.trim().is_empty()));

        let api_key = match api_key {
            Some(key) => key.trim().to_string(),
            None => return Ok(None),
        };

        Ok(Some(LanguageDetectorSettings {
            api_url: self.get_config_or_default(config_keys::DETECTOR_API_URL, DEFAULT_API_URL)?,
            api_key,
            model: self.get_config_or_default(config_keys::DETECTOR_MODEL, DEFAULT_MODEL)?,
            max_tokens: self.get_parsed(config_keys::DETECTOR_MAX_TOKENS, DEFAULT_MAX_TOKENS)?,
        }))
    }
}

// ==========================================
// ImportConfigReader implementation
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_detect_snippet_chars(&self) -> ConfigResult<usize> {
        let chars = self.get_parsed(config_keys::DETECT_SNIPPET_CHARS, DEFAULT_DETECT_SNIPPET_CHARS)?;
        if chars == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::DETECT_SNIPPET_CHARS.to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(chars)
    }

    async fn get_detect_timeout(&self) -> ConfigResult<Duration> {
        let ms = self.get_parsed(config_keys::DETECT_TIMEOUT_MS, DEFAULT_DETECT_TIMEOUT_MS)?;
        if ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::DETECT_TIMEOUT_MS.to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(Duration::from_millis(ms))
    }

    async fn get_message_locale(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(config_keys::MESSAGE_LOCALE, i18n::DEFAULT_LOCALE)?;
        let locale = value.trim();
        if !i18n::is_supported_locale(locale) {
            return Err(ConfigError::InvalidValue {
                key: config_keys::MESSAGE_LOCALE.to_string(),
                value: value.clone(),
                message: "no message catalog for this locale".to_string(),
            });
        }
        Ok(locale.to_string())
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // Import
    pub const DETECT_SNIPPET_CHARS: &str = "import.detect_snippet_chars";
    pub const DETECT_TIMEOUT_MS: &str = "import.detect_timeout_ms";
    pub const MESSAGE_LOCALE: &str = "import.message_locale";

    // Language detector
    pub const DETECTOR_API_URL: &str = "language_detector.api_url";
    pub const DETECTOR_API_KEY: &str = "language_detector.api_key";
    pub const DETECTOR_MODEL: &str = "language_detector.model";
    pub const DETECTOR_MAX_TOKENS: &str = "language_detector.max_tokens";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn setup_config() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults() {
        let config = setup_config();

        assert_eq!(config.get_detect_snippet_chars().await.unwrap(), 40);
        assert_eq!(config.get_detect_timeout().await.unwrap(), Duration::from_secs(10));
        assert_eq!(config.get_message_locale().await.unwrap(), "en");
    }

    #[tokio::test]
    async fn test_overrides() {
        let config = setup_config();
        config.set_config_value(config_keys::DETECT_SNIPPET_CHARS, "12").unwrap();
        config.set_config_value(config_keys::DETECT_TIMEOUT_MS, "250").unwrap();
        config.set_config_value(config_keys::MESSAGE_LOCALE, "pt-BR").unwrap();

        assert_eq!(config.get_detect_snippet_chars().await.unwrap(), 12);
        assert_eq!(config.get_detect_timeout().await.unwrap(), Duration::from_millis(250));
        assert_eq!(config.get_message_locale().await.unwrap(), "pt-BR");

        config.set_config_value(config_keys::DETECT_SNIPPET_CHARS, "20").unwrap();
        assert_eq!(config.get_detect_snippet_chars().await.unwrap(), 20);
        assert_eq!(config.get_all_values().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_values_are_errors() {
        let config = setup_config();
        config.set_config_value(config_keys::DETECT_TIMEOUT_MS, "soon").unwrap();
        config.set_config_value(config_keys::DETECT_SNIPPET_CHARS, "0").unwrap();
        config.set_config_value(config_keys::MESSAGE_LOCALE, "klingon").unwrap();

        assert!(matches!(
            config.get_detect_timeout().await,
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.get_detect_snippet_chars().await,
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            config.get_message_locale().await,
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_detector_settings_need_an_api_key() {
        let config = setup_config();
        assert!(config.detector_settings_with_env_key(None).unwrap().is_none());
        assert!(config
            .detector_settings_with_env_key(Some("  ".to_string()))
            .unwrap()
            .is_none());

        let from_env = config
            .detector_settings_with_env_key(Some("sk-env".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(from_env.api_key, "sk-env");
        assert_eq!(from_env.api_url, DEFAULT_API_URL);
        assert_eq!(from_env.model, "gpt-4");
        assert_eq!(from_env.max_tokens, 5);
    }

    #[test]
    fn test_stored_detector_settings_win_over_env() {
        let config = setup_config();
        config.set_config_value(config_keys::DETECTOR_API_KEY, "sk-stored").unwrap();
        config.set_config_value(config_keys::DETECTOR_MODEL, "gpt-4o-mini").unwrap();
        config.set_config_value(config_keys::DETECTOR_MAX_TOKENS, "8").unwrap();

        let settings = config
            .detector_settings_with_env_key(Some("sk-env".to_string()))
            .unwrap()
            .unwrap();
        assert_eq!(settings.api_key, "sk-stored");
        assert_eq!(settings.model, "gpt-4o-mini");
        assert_eq!(settings.max_tokens, 8);
    }
}
