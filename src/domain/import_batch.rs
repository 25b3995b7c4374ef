// ==========================================
// Translator Docs - import batch aggregate
// ==========================================
// One ImportBatch per run over one input file.
// Owns its documents and row errors until it is handed to the
// repository, which stores the whole aggregate in one transaction.
// ==========================================

use crate::domain::document::Document;
use crate::domain::types::{ImportStatus, RowErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// RowError - itemized import failure
// ==========================================
// Aligned with the `import_error` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub id: Option<i64>,
    pub import_id: Option<i64>,     // owning batch (back-link by id)
    pub row_number: Option<usize>,  // 1-based, header is row 1; None for batch-level errors
    pub kind: RowErrorKind,
    pub message: String,            // human-readable, embeds the row number
}

impl RowError {
    /// Error tied to one data row
    pub fn for_row(row_number: usize, kind: RowErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: None,
            import_id: None,
            row_number: Some(row_number),
            kind,
            message: message.into(),
        }
    }

    /// Error describing a batch-level failure
    pub fn for_batch(kind: RowErrorKind, message: impl Into<String>) -> Self {
        Self {
            id: None,
            import_id: None,
            row_number: None,
            kind,
            message: message.into(),
        }
    }
}

// ==========================================
// ImportBatch - import record
// ==========================================
// Aligned with the `document_imports` table.
// Invariants:
// - created_at is fixed at construction
// - documents/errors are append-only
// - status leaves InProgress exactly once
// - the terminal status agrees with the errors (see finalize)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub(crate) id: Option<i64>,
    pub(crate) run_id: String,
    pub(crate) file_name: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) status: ImportStatus,
    pub(crate) message: String,
    pub(crate) documents: Vec<Document>,
    pub(crate) errors: Vec<RowError>,
}

impl ImportBatch {
    /// Start a new in-progress batch
    ///
    /// # Parameters
    /// - file_name: source file name
    /// - message: localized "in progress" message
    pub fn new(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            run_id: Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            created_at: Utc::now(),
            status: ImportStatus::InProgress,
            message: message.into(),
            documents: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> ImportStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    /// Error messages in row order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }

    /// Append an accepted document (ignored once finalized)
    pub fn add_document(&mut self, document: Document) {
        if self.is_finalized() {
            tracing::warn!(run_id = %self.run_id, "document appended to a finalized batch, ignored");
            return;
        }
        self.documents.push(document);
    }

    /// Append a row error (ignored once finalized)
    pub fn add_error(&mut self, error: RowError) {
        if self.is_finalized() {
            tracing::warn!(run_id = %self.run_id, "error appended to a finalized batch, ignored");
            return;
        }
        self.errors.push(error);
    }

    /// Discard everything accumulated so far (all-or-nothing failure paths)
    pub fn discard_rows(&mut self) {
        if self.is_finalized() {
            return;
        }
        self.documents.clear();
        self.errors.clear();
    }

    /// Set the terminal status and message
    ///
    /// Only the first call takes effect. A completed status must agree with
    /// the recorded errors: CompletedSuccessfully needs none, CompletedWithErrors
    /// needs at least one and neither may carry a batch-fatal error.
    ///
    /// # Returns
    /// - true: the batch is now finalized
    /// - false: already finalized, not a terminal status, or the status
    ///   contradicts the errors (the batch stays unchanged)
    pub fn finalize(&mut self, status: ImportStatus, message: impl Into<String>) -> bool {
        if self.is_finalized() || !status.is_terminal() {
            return false;
        }

        let has_fatal_error = self.errors.iter().any(|e| e.kind.is_batch_fatal());
        let consistent = match status {
            ImportStatus::CompletedSuccessfully => self.errors.is_empty(),
            ImportStatus::CompletedWithErrors => !self.errors.is_empty() && !has_fatal_error,
            _ => true,
        };
        if !consistent {
            tracing::warn!(
                run_id = %self.run_id,
                status = %status,
                errors = self.errors.len(),
                "status contradicts recorded errors, finalize rejected"
            );
            return false;
        }

        self.status = status;
        self.message = message.into();
        true
    }
}

// ==========================================
// ImportSummary - listing row
// ==========================================
// Import record without its documents and errors, only their counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub id: Option<i64>,
    pub run_id: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub status: ImportStatus,
    pub message: String,
    pub document_count: usize,
    pub error_count: usize,
}

impl From<&ImportBatch> for ImportSummary {
    fn from(batch: &ImportBatch) -> Self {
        Self {
            id: batch.id,
            run_id: batch.run_id.clone(),
            file_name: batch.file_name.clone(),
            created_at: batch.created_at,
            status: batch.status,
            message: batch.message.clone(),
            document_count: batch.documents.len(),
            error_count: batch.errors.len(),
        }
    }
}
