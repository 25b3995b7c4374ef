// ==========================================
// Translator Docs - document importer trait
// ==========================================
// Responsibility: import interface (no implementation)
// ==========================================

use crate::domain::import_batch::ImportBatch;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// DocumentImporter Trait
// ==========================================
// Implementors: ImportRunner
#[async_trait]
pub trait DocumentImporter: Send + Sync {
    /// Import an in-memory file
    ///
    /// # Parameters
    /// - file_name: name recorded on the batch
    /// - bytes: raw file content
    ///
    /// # Returns
    /// - Ok(ImportBatch): the persisted batch, whatever its status
    /// - Err: the batch could not be persisted
    async fn import_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ImportBatch>;

    /// Import a file from disk
    ///
    /// # Returns
    /// - Ok(ImportBatch): the persisted batch; a file that cannot be opened
    ///   is recorded as a Failed batch with a read-failure error
    /// - Err(Persistence): the batch could not be persisted
    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportBatch>;

    /// Import several files concurrently
    ///
    /// Each file is independent; one failure does not affect the others.
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<ImportResult<ImportBatch>>;
}
