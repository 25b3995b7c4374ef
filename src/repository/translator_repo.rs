// ==========================================
// Translator Docs - translator repository
// ==========================================
// Responsibility: translator table access
// The import pipeline only resolves translators (read-only);
// insert exists for seeding and the CLI.
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::document::{NewTranslator, Translator};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// TranslatorResolver Trait
// ==========================================
// Used by: RowProcessor
// Implementors: TranslatorRepository (SQLite), test doubles
#[async_trait]
pub trait TranslatorResolver: Send + Sync {
    /// Find a translator by exact email match
    ///
    /// # Returns
    /// - Ok(Some(Translator)): found
    /// - Ok(None): no translator with this email
    /// - Err: storage failure
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Translator>>;
}

// ==========================================
// TranslatorRepository
// ==========================================
pub struct TranslatorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TranslatorRepository {
    /// Create a repository on its own connection
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a repository on a shared connection
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a translator and return it with its id
    pub fn insert(&self, translator: &NewTranslator) -> RepositoryResult<Translator> {
        let email = translator.email.trim();
        if email.is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "email".to_string(),
                message: "must not be blank".to_string(),
            });
        }

        let created_at = Utc::now();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO translator (name, email, source_language, target_language, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                translator.name.trim(),
                email,
                translator.source_language.trim(),
                translator.target_language.trim(),
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Translator {
            id: conn.last_insert_rowid(),
            name: translator.name.trim().to_string(),
            email: email.to_string(),
            source_language: translator.source_language.trim().to_string(),
            target_language: translator.target_language.trim().to_string(),
            created_at,
        })
    }

    /// Query by primary key
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Translator>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, name, email, source_language, target_language, created_at
                FROM translator
                WHERE id = ?1
                "#,
                params![id],
                map_translator_row,
            )
            .optional()?;
        Ok(result)
    }

    /// Query by exact email
    pub fn find_by_email_sync(&self, email: &str) -> RepositoryResult<Option<Translator>> {
        let conn = self.get_conn()?;
        let result = conn
            .query_row(
                r#"
                SELECT id, name, email, source_language, target_language, created_at
                FROM translator
                WHERE email = ?1
                "#,
                params![email],
                map_translator_row,
            )
            .optional()?;
        Ok(result)
    }
}

#[async_trait]
impl TranslatorResolver for TranslatorRepository {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Translator>> {
        self.find_by_email_sync(email)
    }
}

fn map_translator_row(row: &Row<'_>) -> rusqlite::Result<Translator> {
    let created_at_raw: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Translator {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        source_language: row.get(3)?,
        target_language: row.get(4)?,
        created_at,
    })
}
