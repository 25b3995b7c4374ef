// ==========================================
// Translator Docs - import API
// ==========================================
// Responsibility: upload documents, browse and delete import records
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfigReader;
use crate::domain::import_batch::{ImportBatch, ImportSummary};
use crate::importer::{DocumentImporter, ImportResult, ImportRunner};
use crate::repository::import_batch_repo::{ImportBatchRepository, Page, PageRequest};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

// ==========================================
// ImportApi
// ==========================================
pub struct ImportApi<R, C>
where
    R: ImportBatchRepository + 'static,
    C: ImportConfigReader + 'static,
{
    runner: Arc<ImportRunner<R, C>>,
    import_repo: Arc<R>,
}

impl<R, C> ImportApi<R, C>
where
    R: ImportBatchRepository + 'static,
    C: ImportConfigReader + 'static,
{
    pub fn new(runner: Arc<ImportRunner<R, C>>, import_repo: Arc<R>) -> Self {
        Self {
            runner,
            import_repo,
        }
    }

    fn check_file_name(file_name: &str) -> ApiResult<()> {
        if file_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("file name must not be blank".to_string()));
        }
        Ok(())
    }

    /// Start a background import and return its handle immediately
    pub fn submit_documents(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<JoinHandle<ImportResult<ImportBatch>>> {
        Self::check_file_name(file_name)?;
        info!(file_name = %file_name, size = bytes.len(), "import submitted");
        Ok(self.runner.spawn(file_name.trim(), bytes))
    }

    /// Run an import in the background and wait for its batch
    pub async fn upload_documents(&self, file_name: &str, bytes: Vec<u8>) -> ApiResult<ImportBatch> {
        let handle = self.submit_documents(file_name, bytes)?;
        let batch = handle
            .await
            .map_err(|e| ApiError::InternalError(format!("import task failed: {}", e)))??;
        Ok(batch)
    }

    /// Import a file from disk
    pub async fn import_file(&self, path: &Path) -> ApiResult<ImportBatch> {
        Ok(self.runner.import_from_csv(path).await?)
    }

    /// Import several files from disk concurrently
    pub async fn import_files(&self, paths: Vec<PathBuf>) -> Vec<ApiResult<ImportBatch>> {
        self.runner
            .batch_import(paths)
            .await
            .into_iter()
            .map(|result| result.map_err(ApiError::from))
            .collect()
    }

    /// List import records, newest first
    ///
    /// # Parameters
    /// - page: zero-based page
    /// - size: page size, clamped to 1..=100
    pub async fn list_imports(&self, page: u32, size: u32) -> ApiResult<Page<ImportSummary>> {
        Ok(self.import_repo.find_all(PageRequest::new(page, size)).await?)
    }

    /// List import records whose file name contains `text` (case-insensitive)
    pub async fn search_imports(
        &self,
        text: &str,
        page: u32,
        size: u32,
    ) -> ApiResult<Page<ImportSummary>> {
        let text = text.trim();
        if text.is_empty() {
            return self.list_imports(page, size).await;
        }
        Ok(self
            .import_repo
            .search_by_file_name(text, PageRequest::new(page, size))
            .await?)
    }

    /// Full import record with its documents and errors
    pub async fn get_import(&self, id: i64) -> ApiResult<ImportBatch> {
        self.import_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("import record (id={})", id)))
    }

    /// Delete an import record with its documents and errors
    pub async fn delete_import(&self, id: i64) -> ApiResult<()> {
        if self.import_repo.delete_by_id(id).await? {
            info!(import_id = id, "import record deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("import record (id={})", id)))
        }
    }
}
