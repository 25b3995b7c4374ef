// ==========================================
// Translator Docs - import batch repository (SQLite)
// ==========================================
// Responsibility: document_imports / document / import_error access
// No business rules, data CRUD only
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::document::Document;
use crate::domain::import_batch::{ImportBatch, ImportSummary, RowError};
use crate::domain::types::{ImportStatus, RowErrorKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::import_batch_repo::{ImportBatchRepository, Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex};

// Raw document_imports row, converted outside the rusqlite closure
struct ImportRow {
    id: i64,
    run_id: String,
    file_name: String,
    created_at: String,
    status: String,
    message: String,
}

impl ImportRow {
    fn parse_created_at(&self) -> RepositoryResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })
    }

    fn parse_status(&self) -> RepositoryResult<ImportStatus> {
        ImportStatus::from_db_str(&self.status).ok_or_else(|| RepositoryError::FieldValueError {
            field: "status".to_string(),
            message: format!("unknown import status: {}", self.status),
        })
    }

    fn into_batch(self, documents: Vec<Document>, errors: Vec<RowError>) -> RepositoryResult<ImportBatch> {
        let created_at = self.parse_created_at()?;
        let status = self.parse_status()?;

        Ok(ImportBatch {
            id: Some(self.id),
            run_id: self.run_id,
            file_name: self.file_name,
            created_at,
            status,
            message: self.message,
            documents,
            errors,
        })
    }

    fn into_summary(self, document_count: i64, error_count: i64) -> RepositoryResult<ImportSummary> {
        let created_at = self.parse_created_at()?;
        let status = self.parse_status()?;

        Ok(ImportSummary {
            id: Some(self.id),
            run_id: self.run_id,
            file_name: self.file_name,
            created_at,
            status,
            message: self.message,
            document_count: document_count.max(0) as usize,
            error_count: error_count.max(0) as usize,
        })
    }
}

// ==========================================
// SqliteImportBatchRepository
// ==========================================
pub struct SqliteImportBatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteImportBatchRepository {
    /// Create a repository on its own connection
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create a repository on a shared connection
    ///
    /// The common PRAGMAs are re-applied (idempotent) so deletes cascade.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert the aggregate inside an open transaction
    fn save_tx(tx: &Transaction, mut batch: ImportBatch) -> RepositoryResult<ImportBatch> {
        tx.execute(
            r#"
            INSERT INTO document_imports (run_id, file_name, created_at, status, message)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                batch.run_id,
                batch.file_name,
                batch.created_at.to_rfc3339(),
                batch.status.to_db_str(),
                batch.message,
            ],
        )?;
        let import_id = tx.last_insert_rowid();

        {
            let mut doc_stmt = tx.prepare(
                r#"
                INSERT INTO document (
                    subject, content, location, author, translator_id, document_import_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for document in batch.documents.iter_mut() {
                let translator_id =
                    document
                        .translator_id
                        .ok_or_else(|| RepositoryError::FieldValueError {
                            field: "translator_id".to_string(),
                            message: "document without translator".to_string(),
                        })?;
                doc_stmt.execute(params![
                    document.subject,
                    document.content,
                    document.location,
                    document.author,
                    translator_id,
                    import_id,
                ])?;
                document.id = Some(tx.last_insert_rowid());
                document.import_id = Some(import_id);
            }

            let mut err_stmt = tx.prepare(
                r#"
                INSERT INTO import_error (document_import_id, row_number, kind, message)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for error in batch.errors.iter_mut() {
                err_stmt.execute(params![
                    import_id,
                    error.row_number.map(|n| n as i64),
                    error.kind.to_db_str(),
                    error.message,
                ])?;
                error.id = Some(tx.last_insert_rowid());
                error.import_id = Some(import_id);
            }
        }

        batch.id = Some(import_id);
        Ok(batch)
    }

    fn load_documents(conn: &Connection, import_id: i64) -> RepositoryResult<Vec<Document>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, subject, content, location, author, translator_id, document_import_id
            FROM document
            WHERE document_import_id = ?1
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![import_id], |row| {
            Ok(Document {
                id: Some(row.get(0)?),
                subject: row.get(1)?,
                content: row.get(2)?,
                location: row.get(3)?,
                author: row.get(4)?,
                translator_id: row.get(5)?,
                import_id: row.get(6)?,
            })
        })?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    fn load_errors(conn: &Connection, import_id: i64) -> RepositoryResult<Vec<RowError>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, document_import_id, row_number, kind, message
            FROM import_error
            WHERE document_import_id = ?1
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map(params![import_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut errors = Vec::new();
        for row in rows {
            let (id, owner_id, row_number, kind, message) = row?;
            let kind = RowErrorKind::from_db_str(&kind).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "kind".to_string(),
                    message: format!("unknown import error kind: {}", kind),
                }
            })?;
            errors.push(RowError {
                id: Some(id),
                import_id: Some(owner_id),
                row_number: row_number.map(|n| n as usize),
                kind,
                message,
            });
        }
        Ok(errors)
    }

    fn load_batch(conn: &Connection, header: ImportRow) -> RepositoryResult<ImportBatch> {
        let documents = Self::load_documents(conn, header.id)?;
        let errors = Self::load_errors(conn, header.id)?;
        header.into_batch(documents, errors)
    }

    fn query_page(
        conn: &Connection,
        filter: Option<&str>,
        page: PageRequest,
    ) -> RepositoryResult<Page<ImportSummary>> {
        // instr() instead of LIKE, so '%' and '_' in the search text match literally
        let total: i64 = match filter {
            Some(text) => conn.query_row(
                "SELECT COUNT(*) FROM document_imports WHERE instr(lower(file_name), lower(?1)) > 0",
                params![text],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM document_imports", [], |row| row.get(0))?,
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT i.id, i.run_id, i.file_name, i.created_at, i.status, i.message,
                   (SELECT COUNT(*) FROM document d WHERE d.document_import_id = i.id),
                   (SELECT COUNT(*) FROM import_error e WHERE e.document_import_id = i.id)
            FROM document_imports i
            WHERE ?1 IS NULL OR instr(lower(i.file_name), lower(?1)) > 0
            ORDER BY i.created_at DESC, i.id DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )?;
        let rows = stmt.query_map(params![filter, i64::from(page.size), page.offset()], |row| {
            Ok((
                ImportRow {
                    id: row.get(0)?,
                    run_id: row.get(1)?,
                    file_name: row.get(2)?,
                    created_at: row.get(3)?,
                    status: row.get(4)?,
                    message: row.get(5)?,
                },
                row.get::<_, i64>(6)?,
                row.get::<_, i64>(7)?,
            ))
        })?;

        let mut items = Vec::new();
        for row in rows {
            let (header, document_count, error_count) = row?;
            items.push(header.into_summary(document_count, error_count)?);
        }

        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total,
        })
    }
}

#[async_trait]
impl ImportBatchRepository for SqliteImportBatchRepository {
    async fn save(&self, batch: ImportBatch) -> RepositoryResult<ImportBatch> {
        if batch.id.is_some() {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "import batch {} is already persisted",
                batch.run_id
            )));
        }
        if !batch.status.is_terminal() {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "import batch {} is not finalized",
                batch.run_id
            )));
        }

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let saved = Self::save_tx(&tx, batch)?;

        tx.commit()?;
        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ImportBatch>> {
        let conn = self.get_conn()?;
        let header = conn
            .query_row(
                r#"
                SELECT id, run_id, file_name, created_at, status, message
                FROM document_imports
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(ImportRow {
                        id: row.get(0)?,
                        run_id: row.get(1)?,
                        file_name: row.get(2)?,
                        created_at: row.get(3)?,
                        status: row.get(4)?,
                        message: row.get(5)?,
                    })
                },
            )
            .optional()?;

        match header {
            Some(header) => Ok(Some(Self::load_batch(&conn, header)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, page: PageRequest) -> RepositoryResult<Page<ImportSummary>> {
        let conn = self.get_conn()?;
        Self::query_page(&conn, None, page)
    }

    async fn search_by_file_name(
        &self,
        text: &str,
        page: PageRequest,
    ) -> RepositoryResult<Page<ImportSummary>> {
        let conn = self.get_conn()?;
        Self::query_page(&conn, Some(text), page)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute("DELETE FROM document WHERE document_import_id = ?1", params![id])?;
        tx.execute("DELETE FROM import_error WHERE document_import_id = ?1", params![id])?;
        let affected = tx.execute("DELETE FROM document_imports WHERE id = ?1", params![id])?;

        tx.commit()?;
        Ok(affected > 0)
    }
}
