// ==========================================
// Translator Docs - SQLite connection setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA setup
// - one busy_timeout for all connections, so concurrent imports
//   sharing the file do not fail with sporadic SQLITE_BUSY
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema version created by `ensure_schema`
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Apply the common PRAGMAs to a connection
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the common setup applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables if missing (idempotent)
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS translator (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            source_language TEXT NOT NULL,
            target_language TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_translator_name ON translator(name);

        CREATE TABLE IF NOT EXISTS document_imports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            run_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            status TEXT NOT NULL,
            message TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_file_name ON document_imports(file_name);

        CREATE TABLE IF NOT EXISTS document (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject TEXT NOT NULL,
            content TEXT NOT NULL,
            location TEXT NOT NULL DEFAULT '',
            author TEXT NOT NULL,
            translator_id INTEGER NOT NULL REFERENCES translator(id),
            document_import_id INTEGER REFERENCES document_imports(id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_document_subject ON document(subject);
        CREATE INDEX IF NOT EXISTS idx_document_location ON document(location);
        CREATE INDEX IF NOT EXISTS idx_document_author ON document(author);
        CREATE INDEX IF NOT EXISTS idx_document_import ON document(document_import_id);

        CREATE TABLE IF NOT EXISTS import_error (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            document_import_id INTEGER NOT NULL REFERENCES document_imports(id) ON DELETE CASCADE,
            row_number INTEGER,
            kind TEXT NOT NULL,
            message TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_import_error_import ON import_error(document_import_id);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}
