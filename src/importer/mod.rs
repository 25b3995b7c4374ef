// ==========================================
// Translator Docs - import layer
// ==========================================
// Responsibility: delimited document files -> persisted ImportBatch
// Flow: header check -> blank-row filter -> row processing -> save
// ==========================================

pub mod document_validator;
pub mod error;
pub mod import_runner;
pub mod importer_trait;
pub mod record_filter;
pub mod row_processor;
pub mod schema_validator;
pub mod settings;

pub use error::{ImportError, ImportResult};
pub use import_runner::ImportRunner;
pub use importer_trait::DocumentImporter;
pub use record_filter::{DocumentRow, RecordFilter};
pub use row_processor::{RowOutcome, RowProcessor};
pub use settings::ImportSettings;
