// ==========================================
// Translator Docs - import batch repository trait
// ==========================================
// Responsibility: persistence interface for import records
// No business rules, data CRUD only
// ==========================================

use crate::domain::import_batch::{ImportBatch, ImportSummary};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default page size for listings
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u32 = 100;

// ==========================================
// PageRequest - zero-based page + page size
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Build a request, clamping the size into 1..=MAX_PAGE_SIZE
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

// ==========================================
// Page - one slice of a listing
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.size == 0 {
            return 0;
        }
        let size = i64::from(self.size);
        (self.total + size - 1) / size
    }
}

// ==========================================
// ImportBatchRepository Trait
// ==========================================
// Implementors: SqliteImportBatchRepository
#[async_trait]
pub trait ImportBatchRepository: Send + Sync {
    /// Store a finalized batch with all its documents and errors
    ///
    /// One transaction for the whole aggregate.
    ///
    /// # Returns
    /// - Ok(ImportBatch): the same batch with storage-assigned ids
    /// - Err: storage failure (nothing stored), or the batch is not finalized
    ///   or already persisted
    async fn save(&self, batch: ImportBatch) -> RepositoryResult<ImportBatch>;

    /// Load a batch with its documents and errors
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ImportBatch>>;

    /// List batch summaries (child counts only), newest first
    async fn find_all(&self, page: PageRequest) -> RepositoryResult<Page<ImportSummary>>;

    /// List summaries of batches whose file name contains `text`
    /// (case-insensitive), newest first
    async fn search_by_file_name(
        &self,
        text: &str,
        page: PageRequest,
    ) -> RepositoryResult<Page<ImportSummary>>;

    /// Delete a batch with its documents and errors
    ///
    /// # Returns
    /// - Ok(true): deleted
    /// - Ok(false): no batch with this id
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size, 1);
        assert_eq!(PageRequest::new(0, 500).size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 20).offset(), 60);
    }

    #[test]
    fn test_total_pages() {
        let page: Page<()> = Page {
            items: Vec::new(),
            page: 0,
            size: 10,
            total: 21,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
