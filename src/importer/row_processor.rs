// ==========================================
// Translator Docs - per-row processing
// ==========================================
// Flow per row:
// required fields -> locale fallback -> translator resolution
// -> document construction -> structural validation
// Every outcome is local to the row.
// ==========================================

use crate::detector::{normalize_locale, LanguageDetector};
use crate::domain::document::Document;
use crate::domain::import_batch::RowError;
use crate::domain::types::RowErrorKind;
use crate::i18n;
use crate::importer::document_validator::joined_violations;
use crate::importer::record_filter::DocumentRow;
use crate::importer::settings::ImportSettings;
use crate::repository::translator_repo::TranslatorResolver;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Result of processing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(Document),
    Rejected(RowError),
}

/// First `max_chars` characters of `content` (never splits a character)
pub fn content_snippet(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

// ==========================================
// RowProcessor
// ==========================================
pub struct RowProcessor {
    resolver: Arc<dyn TranslatorResolver>,
    detector: Arc<dyn LanguageDetector>,
    settings: ImportSettings,
}

impl RowProcessor {
    pub fn new(
        resolver: Arc<dyn TranslatorResolver>,
        detector: Arc<dyn LanguageDetector>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            resolver,
            detector,
            settings,
        }
    }

    fn locale(&self) -> &str {
        &self.settings.message_locale
    }

    fn row_message(&self, key: &str, row: &DocumentRow) -> String {
        let row_number = row.row_number.to_string();
        i18n::t_with_args(
            self.locale(),
            key,
            &[("row", row_number.as_str()), ("email", row.translator_email.as_str())],
        )
    }

    /// Process one row
    pub async fn process(&self, row: &DocumentRow) -> RowOutcome {
        // 1. Required fields
        if !row.has_required_fields() {
            debug!(row_number = row.row_number, "required fields missing");
            return RowOutcome::Rejected(RowError::for_row(
                row.row_number,
                RowErrorKind::MissingRequiredFields,
                self.row_message("import.row.required_fields_missing", row),
            ));
        }

        // 2. Locale fallback
        let location = if row.location.is_empty() {
            self.detect_location(row).await
        } else {
            row.location.clone()
        };

        // 3. Translator
        let translator = match self.resolver.find_by_email(&row.translator_email).await {
            Ok(Some(translator)) => translator,
            Ok(None) => {
                debug!(row_number = row.row_number, email = %row.translator_email, "translator not found");
                return RowOutcome::Rejected(RowError::for_row(
                    row.row_number,
                    RowErrorKind::TranslatorNotFound,
                    self.row_message("import.row.translator_not_found", row),
                ));
            }
            Err(e) => {
                error!(row_number = row.row_number, email = %row.translator_email, error = %e, "translator lookup failed");
                return RowOutcome::Rejected(RowError::for_row(
                    row.row_number,
                    RowErrorKind::TranslatorLookupFailed,
                    self.row_message("import.row.translator_lookup_failed", row),
                ));
            }
        };

        // 4. Build and validate
        let document = Document::draft(
            row.subject.clone(),
            row.content.clone(),
            location,
            row.author.clone(),
            Some(translator.id),
        );

        match joined_violations(&document, self.locale()) {
            None => RowOutcome::Accepted(document),
            Some(violations) => {
                let row_number = row.row_number.to_string();
                RowOutcome::Rejected(RowError::for_row(
                    row.row_number,
                    RowErrorKind::ValidationFailed,
                    i18n::t_with_args(
                        self.locale(),
                        "import.row.validation_failed",
                        &[("row", row_number.as_str()), ("violations", violations.as_str())],
                    ),
                ))
            }
        }
    }

    /// Ask the detector for a locale; any failure or odd answer yields ""
    async fn detect_location(&self, row: &DocumentRow) -> String {
        let snippet = content_snippet(&row.content, self.settings.detect_snippet_chars);

        match tokio::time::timeout(self.settings.detect_timeout, self.detector.detect(snippet)).await {
            Ok(Ok(answer)) => {
                let locale = normalize_locale(&answer);
                if locale.is_empty() {
                    debug!(row_number = row.row_number, answer = %answer, "detector answer is not a locale code");
                }
                locale
            }
            Ok(Err(e)) => {
                warn!(row_number = row.row_number, error = %e, "language detection failed");
                String::new()
            }
            Err(_) => {
                warn!(
                    row_number = row.row_number,
                    timeout_ms = self.settings.detect_timeout.as_millis() as u64,
                    "language detection timed out"
                );
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{DetectorError, DetectorResult};
    use crate::domain::document::Translator;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    struct OneTranslator;

    #[async_trait]
    impl TranslatorResolver for OneTranslator {
        async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Translator>> {
            match email {
                "ana@example.com" => Ok(Some(Translator {
                    id: 7,
                    name: "Ana".to_string(),
                    email: email.to_string(),
                    source_language: "en-us".to_string(),
                    target_language: "pt-br".to_string(),
                    created_at: Utc::now(),
                })),
                "broken@example.com" => Err(RepositoryError::LockError("poisoned".to_string())),
                _ => Ok(None),
            }
        }
    }

    /// Replays a fixed answer and records the snippets it was asked about
    struct FixedDetector {
        answer: DetectorResult<String>,
        snippets: Mutex<Vec<String>>,
    }

    impl FixedDetector {
        fn answering(answer: DetectorResult<String>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                snippets: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageDetector for FixedDetector {
        async fn detect(&self, snippet: &str) -> DetectorResult<String> {
            self.snippets.lock().unwrap().push(snippet.to_string());
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(_) => Err(DetectorError::Network("connection refused".to_string())),
            }
        }
    }

    struct SlowDetector;

    #[async_trait]
    impl LanguageDetector for SlowDetector {
        async fn detect(&self, _snippet: &str) -> DetectorResult<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("fr-fr".to_string())
        }
    }

    fn processor(detector: Arc<dyn LanguageDetector>) -> RowProcessor {
        let settings = ImportSettings {
            detect_timeout: Duration::from_millis(50),
            ..ImportSettings::default()
        };
        RowProcessor::new(Arc::new(OneTranslator), detector, settings)
    }

    fn row(location: &str, author: &str, email: &str) -> DocumentRow {
        DocumentRow {
            row_number: 4,
            subject: "Greeting".to_string(),
            content: "Bonjour à tous, ceci est un document de test assez long".to_string(),
            location: location.to_string(),
            author: author.to_string(),
            translator_email: email.to_string(),
        }
    }

    async fn detected_location(detector: Arc<dyn LanguageDetector>) -> String {
        match processor(detector).process(&row("", "Marie", "ana@example.com")).await {
            RowOutcome::Accepted(doc) => doc.location,
            RowOutcome::Rejected(err) => panic!("unexpected rejection: {}", err.message),
        }
    }

    #[test]
    fn test_content_snippet_counts_chars() {
        assert_eq!(content_snippet("ãéíõú-abc", 5), "ãéíõú");
        assert_eq!(content_snippet("short", 40), "short");
        assert_eq!(content_snippet("", 40), "");
    }

    #[tokio::test]
    async fn test_accepts_row_with_given_location() {
        let detector = FixedDetector::answering(Ok("de-de".to_string()));
        let outcome = processor(detector.clone())
            .process(&row("en-us", "Marie", "ana@example.com"))
            .await;

        match outcome {
            RowOutcome::Accepted(doc) => {
                assert_eq!(doc.location, "en-us");
                assert_eq!(doc.translator_id, Some(7));
                assert_eq!(doc.author, "Marie");
            }
            RowOutcome::Rejected(err) => panic!("unexpected rejection: {}", err.message),
        }
        assert!(detector.snippets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_author_rejected() {
        let outcome = processor(Arc::new(crate::detector::DisabledLanguageDetector))
            .process(&row("en-us", "", "ana@example.com"))
            .await;

        assert_eq!(
            outcome,
            RowOutcome::Rejected(RowError::for_row(
                4,
                RowErrorKind::MissingRequiredFields,
                "Row 4: required fields missing"
            ))
        );
    }

    #[tokio::test]
    async fn test_detector_receives_forty_char_snippet() {
        let detector = FixedDetector::answering(Ok("fr-fr".to_string()));
        assert_eq!(detected_location(detector.clone()).await, "fr-fr");

        let snippets = detector.snippets.lock().unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].chars().count(), 40);
        assert!(snippets[0].starts_with("Bonjour à tous"));
    }

    #[tokio::test]
    async fn test_odd_detector_answers_fall_back_to_empty() {
        assert_eq!(detected_location(FixedDetector::answering(Ok("French".to_string()))).await, "");
        assert_eq!(detected_location(FixedDetector::answering(Ok(" FR-FR ".to_string()))).await, "fr-fr");
        assert_eq!(
            detected_location(FixedDetector::answering(Err(DetectorError::NotConfigured))).await,
            ""
        );
    }

    #[tokio::test]
    async fn test_detector_timeout_falls_back_to_empty() {
        assert_eq!(detected_location(Arc::new(SlowDetector)).await, "");
    }

    #[tokio::test]
    async fn test_unknown_translator_rejected() {
        let outcome = processor(Arc::new(crate::detector::DisabledLanguageDetector))
            .process(&row("en-us", "Marie", "nobody@example.com"))
            .await;

        match outcome {
            RowOutcome::Rejected(err) => {
                assert_eq!(err.kind, RowErrorKind::TranslatorNotFound);
                assert_eq!(err.message, "Row 4: translator not found for email: nobody@example.com");
            }
            RowOutcome::Accepted(_) => panic!("row should be rejected"),
        }
    }

    #[tokio::test]
    async fn test_lookup_failure_is_row_local() {
        let outcome = processor(Arc::new(crate::detector::DisabledLanguageDetector))
            .process(&row("en-us", "Marie", "broken@example.com"))
            .await;

        match outcome {
            RowOutcome::Rejected(err) => {
                assert_eq!(err.kind, RowErrorKind::TranslatorLookupFailed);
                assert_eq!(err.message, "Row 4: translator lookup failed for email: broken@example.com");
            }
            RowOutcome::Accepted(_) => panic!("row should be rejected"),
        }
    }
}
