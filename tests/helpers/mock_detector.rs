// ==========================================
// Mock language detectors - for integration tests
// ==========================================

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use translator_docs::detector::{DetectorError, DetectorResult, LanguageDetector};

/// Answers every snippet with the same text and records the snippets
pub struct FixedAnswerDetector {
    answer: String,
    pub snippets: Mutex<Vec<String>>,
}

impl FixedAnswerDetector {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            snippets: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.snippets.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageDetector for FixedAnswerDetector {
    async fn detect(&self, snippet: &str) -> DetectorResult<String> {
        self.snippets.lock().unwrap().push(snippet.to_string());
        Ok(self.answer.clone())
    }
}

/// Always fails like an unreachable service
pub struct FailingDetector;

#[async_trait]
impl LanguageDetector for FailingDetector {
    async fn detect(&self, _snippet: &str) -> DetectorResult<String> {
        Err(DetectorError::Api {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

/// Never answers within any reasonable timeout
pub struct HangingDetector;

#[async_trait]
impl LanguageDetector for HangingDetector {
    async fn detect(&self, _snippet: &str) -> DetectorResult<String> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("fr-fr".to_string())
    }
}
