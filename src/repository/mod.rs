// ==========================================
// Translator Docs - repository layer
// ==========================================
// Responsibility: data access behind traits, hides SQLite details
// Constraint: every query is parameterized
// ==========================================

pub mod error;
pub mod import_batch_repo;
pub mod import_batch_repo_impl;
pub mod translator_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use import_batch_repo::{ImportBatchRepository, Page, PageRequest};
pub use import_batch_repo_impl::SqliteImportBatchRepository;
pub use translator_repo::{TranslatorRepository, TranslatorResolver};
