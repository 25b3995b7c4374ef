// ==========================================
// Translator Docs - configuration error type
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config storage failed: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("config lock acquisition failed: {0}")]
    LockError(String),

    #[error("invalid config value for {key}: {value:?} ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
