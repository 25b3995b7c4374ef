// ==========================================
// Translator Docs - OpenAI language detector
// ==========================================
// POST {api_url} (chat completions), answer = choices[0].message.content
// ==========================================

use crate::detector::{DetectorError, DetectorResult, LanguageDetector};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 5;

/// Upper bound for one HTTP round trip; the import runner applies its own timeout on top
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are a professional and objective language translator.";
const USER_PROMPT_PREFIX: &str = "Detect the language of the following content and return me only your language code and country code in format xx-xx: ";

// ==========================================
// LanguageDetectorSettings
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDetectorSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

impl LanguageDetectorSettings {
    /// Settings with the default endpoint and model
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

// ===== Wire format =====

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatAnswer,
}

#[derive(Debug, Deserialize)]
struct ChatAnswer {
    content: Option<String>,
}

// ==========================================
// OpenAiLanguageDetector
// ==========================================
pub struct OpenAiLanguageDetector {
    http_client: Client,
    settings: LanguageDetectorSettings,
}

impl OpenAiLanguageDetector {
    pub fn new(settings: LanguageDetectorSettings) -> DetectorResult<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(DetectorError::NotConfigured);
        }

        let http_client = Client::builder()
            .user_agent(concat!("translator-docs/", env!("CARGO_PKG_VERSION")))
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| DetectorError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn build_request<'a>(&'a self, snippet: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("{}{}", USER_PROMPT_PREFIX, snippet),
                },
            ],
            max_tokens: self.settings.max_tokens,
        }
    }
}

/// Pull `choices[0].message.content` out of a response body
fn extract_answer(body: &str) -> DetectorResult<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| DetectorError::Parse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| DetectorError::Parse("response has no choices[0].message.content".to_string()))
}

#[async_trait]
impl LanguageDetector for OpenAiLanguageDetector {
    async fn detect(&self, snippet: &str) -> DetectorResult<String> {
        let request = self.build_request(snippet);

        let response = self
            .http_client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| DetectorError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DetectorError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(DetectorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let answer = extract_answer(&body)?;
        debug!(answer = %answer, "language detector answered");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_not_configured() {
        let result = OpenAiLanguageDetector::new(LanguageDetectorSettings::with_api_key("  "));
        assert!(matches!(result, Err(DetectorError::NotConfigured)));
    }

    #[test]
    fn test_request_shape() {
        let detector =
            OpenAiLanguageDetector::new(LanguageDetectorSettings::with_api_key("sk-test")).unwrap();
        let request = detector.build_request("Bonjour");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 5);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(json["messages"][1]["role"], "user");
        assert!(json["messages"][1]["content"]
            .as_str()
            .unwrap()
            .ends_with("format xx-xx: Bonjour"));
    }

    #[test]
    fn test_extract_answer() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"fr-fr"}}]}"#;
        assert_eq!(extract_answer(body).unwrap(), "fr-fr");
    }

    #[test]
    fn test_extract_answer_missing_content() {
        assert!(matches!(
            extract_answer(r#"{"choices":[]}"#),
            Err(DetectorError::Parse(_))
        ));
        assert!(matches!(
            extract_answer("not json"),
            Err(DetectorError::Parse(_))
        ));
    }
}
