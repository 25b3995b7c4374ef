// ==========================================
// Translator Docs - application state
// ==========================================
// Responsibility: shared resources and API instances
// ==========================================

use crate::api::ImportApi;
use crate::config::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::detector::{DisabledLanguageDetector, LanguageDetector, OpenAiLanguageDetector};
use crate::importer::ImportRunner;
use crate::repository::{SqliteImportBatchRepository, TranslatorRepository};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "TRANSLATOR_DOCS_DB_PATH";

pub type SqliteImportApi = ImportApi<SqliteImportBatchRepository, ConfigManager>;

/// Application state
pub struct AppState {
    /// Database path
    pub db_path: String,

    /// Import API
    pub import_api: Arc<SqliteImportApi>,

    /// Translator repository (seeding and lookups)
    pub translator_repo: Arc<TranslatorRepository>,

    /// Configuration manager
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// Create the state, choosing the language detector from configuration
    ///
    /// # Returns
    /// - Ok(AppState)
    /// - Err(String): initialization error
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// Create the state with an explicit language detector
    pub fn with_detector(db_path: String, detector: Arc<dyn LanguageDetector>) -> Result<Self, String> {
        Self::build(db_path, Some(detector))
    }

    fn build(db_path: String, detector: Option<Arc<dyn LanguageDetector>>) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "initializing AppState");

        // Shared connection
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("cannot create schema: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ===== Repositories =====
        let import_repo = Arc::new(
            SqliteImportBatchRepository::from_connection(conn.clone())
                .map_err(|e| format!("cannot create SqliteImportBatchRepository: {}", e))?,
        );
        let translator_repo = Arc::new(TranslatorRepository::from_connection(conn.clone()));

        // ===== Config =====
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("cannot create ConfigManager: {}", e))?,
        );

        let detector = match detector {
            Some(detector) => detector,
            None => build_detector(&config_manager),
        };

        // ===== Import pipeline =====
        let runner = Arc::new(ImportRunner::new(
            import_repo.clone(),
            config_manager.clone(),
            translator_repo.clone(),
            detector,
        ));
        let import_api = Arc::new(ImportApi::new(runner, import_repo));

        tracing::info!("AppState initialized");

        Ok(Self {
            db_path,
            import_api,
            translator_repo,
            config_manager,
        })
    }
}

/// OpenAI detector when an API key is available, the disabled one otherwise
fn build_detector(config: &ConfigManager) -> Arc<dyn LanguageDetector> {
    match config.language_detector_settings() {
        Ok(Some(settings)) => match OpenAiLanguageDetector::new(settings) {
            Ok(detector) => {
                tracing::info!("language detection enabled");
                Arc::new(detector)
            }
            Err(e) => {
                tracing::warn!(error = %e, "language detector unavailable, detection disabled");
                Arc::new(DisabledLanguageDetector)
            }
        },
        Ok(None) => {
            tracing::info!("no language detector API key, detection disabled");
            Arc::new(DisabledLanguageDetector)
        }
        Err(e) => {
            tracing::warn!(error = %e, "language detector settings unreadable, detection disabled");
            Arc::new(DisabledLanguageDetector)
        }
    }
}

/// Default database path
///
/// TRANSLATOR_DOCS_DB_PATH wins; otherwise the user data directory,
/// falling back to the working directory.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./translator_docs.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("translator-docs");
        // best-effort: a missing directory surfaces when the database is opened
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("translator_docs.db");
        }
    }

    path.to_string_lossy().to_string()
}
