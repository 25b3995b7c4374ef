// ==========================================
// Translator Docs - domain layer
// ==========================================
// Responsibility: entities and types
// No data access, no pipeline logic
// ==========================================

pub mod document;
pub mod import_batch;
pub mod types;

// Core type re-exports
pub use document::{Document, NewTranslator, Translator};
pub use import_batch::{ImportBatch, ImportSummary, RowError};
pub use types::{ImportStatus, RowErrorKind};
