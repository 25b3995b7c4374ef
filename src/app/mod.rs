// ==========================================
// Translator Docs - application layer
// ==========================================
// Responsibility: wire repositories, config and detector for one database
// ==========================================

pub mod state;

pub use state::{get_default_db_path, AppState, SqliteImportApi};
