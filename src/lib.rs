// ==========================================
// Translator Docs - core library
// ==========================================
// Stack: Rust + SQLite + tokio
// Scope: batch import of translator documents from
//        `;`-delimited files into persisted import records
// ==========================================

// Localized import messages (English by default)
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Import layer - file to batch pipeline
pub mod importer;

// External language detection
pub mod detector;

// Configuration layer
pub mod config;

// Database infrastructure (connection setup / PRAGMA / schema)
pub mod db;

// Logging
pub mod logging;

// Message localization
pub mod i18n;

// API layer
pub mod api;

// Application wiring
pub mod app;

// Command line arguments
pub mod cli;

// ==========================================
// Core re-exports
// ==========================================

pub use domain::{
    Document, ImportBatch, ImportStatus, ImportSummary, RowError, RowErrorKind, Translator,
};

pub use importer::{DocumentImporter, ImportError, ImportResult, ImportRunner};

pub use detector::{DisabledLanguageDetector, LanguageDetector, OpenAiLanguageDetector};

pub use repository::{
    ImportBatchRepository, Page, PageRequest, SqliteImportBatchRepository, TranslatorRepository,
    TranslatorResolver,
};

pub use api::{ApiError, ApiResult, ImportApi};

// ==========================================
// Constants
// ==========================================

// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Application name
pub const APP_NAME: &str = "Translator Docs";
