// ==========================================
// Translator Docs - import error type
// ==========================================
// Tool: thiserror derive
// Batch-fatal conditions only; row-local problems become RowErrors
// ==========================================

use crate::domain::import_batch::RowError;
use crate::domain::types::RowErrorKind;
use crate::i18n;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Input errors (batch-fatal) =====
    #[error("input file is empty")]
    EmptyFile,

    #[error("header line is empty or invalid: {0}")]
    HeaderInvalid(String),

    #[error("input file has no data rows")]
    NoDataRows,

    #[error("failed to read input: {0}")]
    ReadFailure(String),

    // ===== Storage errors =====
    #[error("failed to persist import batch: {0}")]
    Persistence(#[from] RepositoryError),
}

impl ImportError {
    /// Kind recorded on the batch for input errors
    pub fn row_error_kind(&self) -> Option<RowErrorKind> {
        match self {
            ImportError::EmptyFile => Some(RowErrorKind::EmptyFile),
            ImportError::HeaderInvalid(_) => Some(RowErrorKind::InvalidHeader),
            ImportError::NoDataRows => Some(RowErrorKind::NoDataRows),
            ImportError::ReadFailure(_) => Some(RowErrorKind::ReadFailure),
            ImportError::Persistence(_) => None,
        }
    }

    /// Localized batch-level RowError for input errors
    pub fn to_batch_error(&self, locale: &str) -> Option<RowError> {
        let kind = self.row_error_kind()?;
        let message = match self {
            ImportError::EmptyFile => i18n::t(locale, "import.error.empty_file"),
            ImportError::HeaderInvalid(_) => i18n::t(locale, "import.error.invalid_header"),
            ImportError::NoDataRows => i18n::t(locale, "import.error.no_data_rows"),
            ImportError::ReadFailure(reason) => {
                i18n::t_with_args(locale, "import.error.read_failure", &[("reason", reason.as_str())])
            }
            ImportError::Persistence(_) => return None,
        };
        Some(RowError::for_batch(kind, message))
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ReadFailure(err.to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::ReadFailure(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;
