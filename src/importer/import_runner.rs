// ==========================================
// Translator Docs - import runner
// ==========================================
// Responsibility: the whole file-to-batch lifecycle of one run
// States: Empty -> HeaderCheck -> RowFiltering -> RowProcessing -> Finalized
// The batch is persisted exactly once, whatever the outcome.
// ==========================================

use crate::config::ImportConfigReader;
use crate::detector::LanguageDetector;
use crate::domain::import_batch::ImportBatch;
use crate::domain::types::ImportStatus;
use crate::i18n;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::DocumentImporter;
use crate::importer::record_filter::{DocumentRow, RecordFilter};
use crate::importer::row_processor::{RowOutcome, RowProcessor};
use crate::importer::schema_validator::{split_header_line, validate_header};
use crate::importer::settings::ImportSettings;
use crate::repository::import_batch_repo::ImportBatchRepository;
use crate::repository::translator_repo::TranslatorResolver;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn, Span};

// ==========================================
// ImportRunner
// ==========================================
pub struct ImportRunner<R, C>
where
    R: ImportBatchRepository,
    C: ImportConfigReader,
{
    // Data access
    import_repo: Arc<R>,

    // Config reader
    config: Arc<C>,

    // Row collaborators
    resolver: Arc<dyn TranslatorResolver>,
    detector: Arc<dyn LanguageDetector>,
}

impl<R, C> ImportRunner<R, C>
where
    R: ImportBatchRepository,
    C: ImportConfigReader,
{
    /// Create a runner
    ///
    /// # Parameters
    /// - import_repo: batch persistence
    /// - config: import settings source (read once per run)
    /// - resolver: translator lookup by email
    /// - detector: locale fallback for rows without a location
    pub fn new(
        import_repo: Arc<R>,
        config: Arc<C>,
        resolver: Arc<dyn TranslatorResolver>,
        detector: Arc<dyn LanguageDetector>,
    ) -> Self {
        Self {
            import_repo,
            config,
            resolver,
            detector,
        }
    }

    /// Run one import to completion and persist the batch
    ///
    /// # Returns
    /// - Ok(ImportBatch): persisted batch; input problems are recorded on it
    ///   with status Failed rather than returned as errors
    /// - Err(Persistence): the batch could not be saved
    #[instrument(skip_all, fields(file_name = %file_name, size = bytes.len(), run_id))]
    pub async fn run(&self, file_name: &str, bytes: &[u8]) -> ImportResult<ImportBatch> {
        let settings = ImportSettings::load(self.config.as_ref()).await;
        let locale = settings.message_locale.clone();

        let mut batch = Self::start_batch(file_name, &locale);
        info!("import started");

        let processor = RowProcessor::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.detector),
            settings,
        );

        match Self::process_input(&mut batch, bytes, &processor).await {
            Ok(()) => {
                let status = ImportStatus::for_processed_rows(!batch.errors().is_empty());
                batch.finalize(status, i18n::t(&locale, status.message_key()));
            }
            Err(err) => Self::finalize_failed(&mut batch, &err, &locale),
        }

        self.persist(batch).await
    }

    /// Record a run whose input could not be obtained at all
    ///
    /// The batch is stored as Failed with the error as its only entry.
    #[instrument(skip_all, fields(file_name = %file_name, run_id))]
    pub async fn record_failure(&self, file_name: &str, err: ImportError) -> ImportResult<ImportBatch> {
        let locale = ImportSettings::load(self.config.as_ref()).await.message_locale;

        let mut batch = Self::start_batch(file_name, &locale);
        Self::finalize_failed(&mut batch, &err, &locale);

        self.persist(batch).await
    }

    fn start_batch(file_name: &str, locale: &str) -> ImportBatch {
        let batch = ImportBatch::new(file_name, i18n::t(locale, ImportStatus::InProgress.message_key()));
        Span::current().record("run_id", batch.run_id());
        batch
    }

    /// Drop accumulated rows, record the batch-fatal error, finalize as Failed
    fn finalize_failed(batch: &mut ImportBatch, err: &ImportError, locale: &str) {
        warn!(error = %err, "import aborted");
        batch.discard_rows();
        if let Some(batch_error) = err.to_batch_error(locale) {
            batch.add_error(batch_error);
        }
        batch.finalize(
            ImportStatus::Failed,
            i18n::t(locale, ImportStatus::Failed.message_key()),
        );
    }

    /// The single save of a run
    async fn persist(&self, batch: ImportBatch) -> ImportResult<ImportBatch> {
        let saved = self.import_repo.save(batch).await.map_err(|e| {
            error!(error = %e, "failed to persist import batch");
            ImportError::Persistence(e)
        })?;

        info!(
            import_id = saved.id().unwrap_or_default(),
            status = %saved.status(),
            documents = saved.documents().len(),
            errors = saved.errors().len(),
            "import finished"
        );
        Ok(saved)
    }

    /// Header check, row filtering, then row processing
    ///
    /// Every record is read and filtered before the first row is processed.
    async fn process_input(
        batch: &mut ImportBatch,
        bytes: &[u8],
        processor: &RowProcessor,
    ) -> ImportResult<()> {
        // === HeaderCheck ===
        let (header, body) = split_header_line(bytes)?;
        validate_header(header)?;
        debug!("header accepted");

        // === RowFiltering ===
        let rows: Vec<DocumentRow> = RecordFilter::new(body).collect::<ImportResult<_>>()?;
        if rows.is_empty() {
            return Err(ImportError::NoDataRows);
        }
        debug!(rows = rows.len(), "rows filtered");

        // === RowProcessing ===
        for row in &rows {
            match processor.process(row).await {
                RowOutcome::Accepted(document) => batch.add_document(document),
                RowOutcome::Rejected(row_error) => {
                    debug!(row_number = row.row_number, kind = %row_error.kind, "row rejected");
                    batch.add_error(row_error);
                }
            }
        }
        Ok(())
    }
}

impl<R, C> ImportRunner<R, C>
where
    R: ImportBatchRepository + 'static,
    C: ImportConfigReader + 'static,
{
    /// Hand a run to a tokio worker and return immediately
    pub fn spawn(
        self: &Arc<Self>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> JoinHandle<ImportResult<ImportBatch>> {
        let runner = Arc::clone(self);
        let file_name = file_name.into();
        tokio::spawn(async move { runner.run(&file_name, &bytes).await })
    }
}

#[async_trait]
impl<R, C> DocumentImporter for ImportRunner<R, C>
where
    R: ImportBatchRepository,
    C: ImportConfigReader,
{
    async fn import_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ImportBatch> {
        self.run(file_name, &bytes).await
    }

    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportBatch> {
        let path = file_path.as_ref().to_path_buf();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match tokio::fs::read(&path).await {
            Ok(bytes) => self.run(&file_name, &bytes).await,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open import file");
                self.record_failure(&file_name, ImportError::from(e)).await
            }
        }
    }

    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<ImportResult<ImportBatch>> {
        let imports = file_paths.iter().map(|path| self.import_from_csv(path));
        futures::future::join_all(imports).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigResult;
    use crate::detector::DetectorResult;
    use crate::domain::document::Translator;
    use crate::domain::import_batch::ImportSummary;
    use crate::domain::types::RowErrorKind;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use crate::repository::import_batch_repo::{Page, PageRequest};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    const HEADER: &str = "subject;content;location;author;translator_email\n";

    /// Keeps saved batches in memory
    #[derive(Default)]
    struct MemoryRepo {
        saved: Mutex<Vec<ImportBatch>>,
        fail_saves: bool,
    }

    #[async_trait]
    impl ImportBatchRepository for MemoryRepo {
        async fn save(&self, mut batch: ImportBatch) -> RepositoryResult<ImportBatch> {
            if self.fail_saves {
                return Err(RepositoryError::DatabaseQueryError("disk full".to_string()));
            }
            let mut saved = self.saved.lock().unwrap();
            batch.id = Some(saved.len() as i64 + 1);
            saved.push(batch.clone());
            Ok(batch)
        }

        async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ImportBatch>> {
            let saved = self.saved.lock().unwrap();
            Ok(saved.iter().find(|b| b.id() == Some(id)).cloned())
        }

        async fn find_all(&self, page: PageRequest) -> RepositoryResult<Page<ImportSummary>> {
            let saved = self.saved.lock().unwrap();
            Ok(Page {
                items: saved.iter().map(ImportSummary::from).collect(),
                page: page.page,
                size: page.size,
                total: saved.len() as i64,
            })
        }

        async fn search_by_file_name(
            &self,
            _text: &str,
            page: PageRequest,
        ) -> RepositoryResult<Page<ImportSummary>> {
            self.find_all(page).await
        }

        async fn delete_by_id(&self, _id: i64) -> RepositoryResult<bool> {
            Ok(false)
        }
    }

    struct FixedConfig {
        locale: &'static str,
    }

    #[async_trait]
    impl ImportConfigReader for FixedConfig {
        async fn get_detect_snippet_chars(&self) -> ConfigResult<usize> {
            Ok(40)
        }

        async fn get_detect_timeout(&self) -> ConfigResult<Duration> {
            Ok(Duration::from_millis(100))
        }

        async fn get_message_locale(&self) -> ConfigResult<String> {
            Ok(self.locale.to_string())
        }
    }

    /// Resolves every email to translator 1 and counts lookups
    #[derive(Default)]
    struct CountingResolver {
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl TranslatorResolver for CountingResolver {
        async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Translator>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Translator {
                id: 1,
                name: "Ana".to_string(),
                email: email.to_string(),
                source_language: "en-us".to_string(),
                target_language: "pt-br".to_string(),
                created_at: Utc::now(),
            }))
        }
    }

    /// Answers "fr-fr" and counts calls
    #[derive(Default)]
    struct FrenchDetector {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageDetector for FrenchDetector {
        async fn detect(&self, _snippet: &str) -> DetectorResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("fr-fr".to_string())
        }
    }

    struct Fixture {
        repo: Arc<MemoryRepo>,
        resolver: Arc<CountingResolver>,
        detector: Arc<FrenchDetector>,
        runner: Arc<ImportRunner<MemoryRepo, FixedConfig>>,
    }

    fn fixture_with(repo: MemoryRepo, locale: &'static str) -> Fixture {
        let repo = Arc::new(repo);
        let resolver = Arc::new(CountingResolver::default());
        let detector = Arc::new(FrenchDetector::default());
        let runner = Arc::new(ImportRunner::new(
            Arc::clone(&repo),
            Arc::new(FixedConfig { locale }),
            resolver.clone(),
            detector.clone(),
        ));
        Fixture {
            repo,
            resolver,
            detector,
            runner,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(MemoryRepo::default(), "en")
    }

    #[tokio::test]
    async fn test_valid_rows_complete_successfully() {
        let f = fixture();
        let input = format!("{}S1;C1;en-us;A1;a@x.com\nS2;C2;;A2;b@x.com\n", HEADER);

        let batch = f.runner.run("docs.csv", input.as_bytes()).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::CompletedSuccessfully);
        assert_eq!(batch.message(), "completed successfully");
        assert_eq!(batch.documents().len(), 2);
        assert!(batch.errors().is_empty());
        assert_eq!(f.repo.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_fails_and_is_persisted() {
        let f = fixture();
        let batch = f.runner.run("empty.csv", b"").await.unwrap();

        assert_eq!(batch.status(), ImportStatus::Failed);
        assert_eq!(batch.message(), "import error");
        assert_eq!(batch.errors().len(), 1);
        assert_eq!(batch.errors()[0].kind, RowErrorKind::EmptyFile);
        assert_eq!(f.repo.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_header_reads_no_rows() {
        let f = fixture();
        let input = "content;subject;location;author;translator_email\nS1;C1;;A1;a@x.com\n";

        let batch = f.runner.run("docs.csv", input.as_bytes()).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::Failed);
        assert_eq!(batch.errors()[0].kind, RowErrorKind::InvalidHeader);
        assert_eq!(batch.errors()[0].message, "The CSV header is empty or invalid.");
        assert_eq!(f.resolver.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_read_failure_discards_accumulated_rows() {
        let f = fixture();
        let input = format!("{}S1;C1;;A1;a@x.com\nS2;C2;;A2;b@x.com\nS3;C3\n", HEADER);

        let batch = f.runner.run("docs.csv", input.as_bytes()).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::Failed);
        assert!(batch.documents().is_empty());
        assert_eq!(batch.errors().len(), 1);
        assert_eq!(batch.errors()[0].kind, RowErrorKind::ReadFailure);
        assert!(batch.errors()[0].message.starts_with("Error reading the CSV file: "));

        // rows before the bad record were never processed
        assert_eq!(f.resolver.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(f.detector.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unreadable_path_is_recorded_as_failed() {
        let f = fixture();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.csv");

        let batch = f.runner.import_from_csv(&missing).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::Failed);
        assert_eq!(batch.message(), "import error");
        assert_eq!(batch.file_name(), "missing.csv");
        assert_eq!(batch.errors().len(), 1);
        assert_eq!(batch.errors()[0].kind, RowErrorKind::ReadFailure);
        assert!(batch.errors()[0].message.starts_with("Error reading the CSV file: "));
        assert_eq!(f.repo.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_record_failure_uses_configured_locale() {
        let f = fixture_with(MemoryRepo::default(), "pt-BR");

        let batch = f
            .runner
            .record_failure("docs.csv", ImportError::ReadFailure("permission denied".to_string()))
            .await
            .unwrap();

        assert_eq!(batch.message(), "Erro durante a importação");
        assert_eq!(
            batch.error_messages(),
            vec!["Erro ao ler o arquivo CSV: permission denied"]
        );
    }

    #[tokio::test]
    async fn test_header_only_has_no_data_rows() {
        let f = fixture();
        let batch = f.runner.run("docs.csv", HEADER.as_bytes()).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::Failed);
        assert_eq!(batch.errors()[0].kind, RowErrorKind::NoDataRows);
    }

    #[tokio::test]
    async fn test_messages_follow_configured_locale() {
        let f = fixture_with(MemoryRepo::default(), "pt-BR");
        let input = format!("{}S1;C1;en-us;;a@x.com\n", HEADER);

        let batch = f.runner.run("docs.csv", input.as_bytes()).await.unwrap();

        assert_eq!(batch.status(), ImportStatus::CompletedWithErrors);
        assert_eq!(batch.errors()[0].message, "Linha 2: Campos obrigatórios estão faltando.");
    }

    #[tokio::test]
    async fn test_persistence_failure_propagates() {
        let f = fixture_with(
            MemoryRepo {
                fail_saves: true,
                ..MemoryRepo::default()
            },
            "en",
        );
        let input = format!("{}S1;C1;en-us;A1;a@x.com\n", HEADER);

        let err = f.runner.run("docs.csv", input.as_bytes()).await.unwrap_err();
        assert!(matches!(err, ImportError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_spawn_returns_handle_with_batch() {
        let f = fixture();
        let input = format!("{}S1;Bonjour;;A1;a@x.com\n", HEADER);

        let handle = f.runner.spawn("docs.csv", input.into_bytes());
        let batch = handle.await.unwrap().unwrap();

        assert_eq!(batch.documents()[0].location, "fr-fr");
        assert_eq!(f.detector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.repo.saved.lock().unwrap().len(), 1);
    }
}
