// ==========================================
// Translator Docs - API layer
// ==========================================
// Responsibility: thin application surface over the import pipeline
// and the import records
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
