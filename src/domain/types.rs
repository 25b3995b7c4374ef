// ==========================================
// Translator Docs - domain type definitions
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Import status
// ==========================================
// Terminal values are set exactly once, when the run finalizes.
// Stored format: SCREAMING_SNAKE_CASE (matches the database)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStatus {
    InProgress,            // rows still being processed
    CompletedSuccessfully, // every row accepted
    CompletedWithErrors,   // at least one row-local error
    Failed,                // batch-fatal error, nothing processed
}

impl ImportStatus {
    /// Whether the status is one of the terminal outcomes
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ImportStatus::InProgress)
    }

    /// Outcome of a run that processed all its rows
    pub fn for_processed_rows(has_errors: bool) -> Self {
        if has_errors {
            ImportStatus::CompletedWithErrors
        } else {
            ImportStatus::CompletedSuccessfully
        }
    }

    /// i18n key of the human-readable status message
    pub fn message_key(&self) -> &'static str {
        match self {
            ImportStatus::InProgress => "import.status.in_progress",
            ImportStatus::CompletedSuccessfully => "import.status.completed_successfully",
            ImportStatus::CompletedWithErrors => "import.status.completed_with_errors",
            ImportStatus::Failed => "import.status.failed",
        }
    }

    /// Database representation
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ImportStatus::InProgress => "IN_PROGRESS",
            ImportStatus::CompletedSuccessfully => "COMPLETED_SUCCESSFULLY",
            ImportStatus::CompletedWithErrors => "COMPLETED_WITH_ERRORS",
            ImportStatus::Failed => "FAILED",
        }
    }

    /// Parse the database representation
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "IN_PROGRESS" => Some(ImportStatus::InProgress),
            "COMPLETED_SUCCESSFULLY" => Some(ImportStatus::CompletedSuccessfully),
            "COMPLETED_WITH_ERRORS" => Some(ImportStatus::CompletedWithErrors),
            "FAILED" => Some(ImportStatus::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Row error kind
// ==========================================
// Machine-readable classification next to the message text.
// The first four kinds are batch-fatal, the rest are row-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowErrorKind {
    EmptyFile,
    InvalidHeader,
    ReadFailure,
    NoDataRows,
    MissingRequiredFields,
    TranslatorNotFound,
    TranslatorLookupFailed,
    ValidationFailed,
}

impl RowErrorKind {
    /// Whether this kind aborts the whole batch
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            RowErrorKind::EmptyFile
                | RowErrorKind::InvalidHeader
                | RowErrorKind::ReadFailure
                | RowErrorKind::NoDataRows
        )
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RowErrorKind::EmptyFile => "EMPTY_FILE",
            RowErrorKind::InvalidHeader => "INVALID_HEADER",
            RowErrorKind::ReadFailure => "READ_FAILURE",
            RowErrorKind::NoDataRows => "NO_DATA_ROWS",
            RowErrorKind::MissingRequiredFields => "MISSING_REQUIRED_FIELDS",
            RowErrorKind::TranslatorNotFound => "TRANSLATOR_NOT_FOUND",
            RowErrorKind::TranslatorLookupFailed => "TRANSLATOR_LOOKUP_FAILED",
            RowErrorKind::ValidationFailed => "VALIDATION_FAILED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EMPTY_FILE" => Some(RowErrorKind::EmptyFile),
            "INVALID_HEADER" => Some(RowErrorKind::InvalidHeader),
            "READ_FAILURE" => Some(RowErrorKind::ReadFailure),
            "NO_DATA_ROWS" => Some(RowErrorKind::NoDataRows),
            "MISSING_REQUIRED_FIELDS" => Some(RowErrorKind::MissingRequiredFields),
            "TRANSLATOR_NOT_FOUND" => Some(RowErrorKind::TranslatorNotFound),
            "TRANSLATOR_LOOKUP_FAILED" => Some(RowErrorKind::TranslatorLookupFailed),
            "VALIDATION_FAILED" => Some(RowErrorKind::ValidationFailed),
            _ => None,
        }
    }
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}
