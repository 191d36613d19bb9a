//! Google Gemini gateway integration.
//!
//! Implements the `PromptGateway` trait against the Generative Language
//! API (`models/{model}:generateContent`). One attempt per call — failures
//! are reported to the caller, which owns the degrade/fallback decision.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PromptGateway;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    http: Client,
    api_key: SecretString,
    model: String,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(
        api_key: SecretString,
        model: Option<String>,
        max_output_tokens: Option<u32>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .user_agent("kisan-mitra/0.1.0")
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_output_tokens: max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        })
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }

    /// Join all text parts of the first candidate into one string.
    fn extract_text(body: &GenerateResponse) -> String {
        body.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PromptGateway for GeminiClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(user.to_string()),
                }],
            }],
            system_instruction: Some(Content {
                parts: vec![Part {
                    text: Some(system.to_string()),
                }],
            }),
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        };

        debug!(model = %self.model, "Requesting Gemini completion");

        let resp = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {status}: {error_text}");
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        Ok(Self::extract_text(&body))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::new(SecretString::new("test-key".into()), None, None).unwrap()
    }

    #[test]
    fn test_client_construction_defaults() {
        let client = test_client();
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert_eq!(client.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
    }

    #[test]
    fn test_client_custom_model() {
        let client = GeminiClient::new(
            SecretString::new("test-key".into()),
            Some("gemini-1.5-pro".to_string()),
            Some(2048),
        )
        .unwrap();
        assert_eq!(client.model_name(), "gemini-1.5-pro");
        assert!(client.endpoint().contains("gemini-1.5-pro:generateContent"));
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Delhi Market: ₹1500/quintal\n"},
                {"text":"Mumbai Market: ₹1450/quintal"}
            ]}}]}"#,
        )
        .unwrap();
        let text = GeminiClient::extract_text(&body);
        assert!(text.contains("Delhi Market"));
        assert!(text.contains("Mumbai Market"));
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(GeminiClient::extract_text(&body), "");
    }

    #[test]
    fn test_extract_text_missing_fields() {
        // Schema violations (missing content/parts/text) degrade to empty
        // text, which the flow layer treats as an empty result.
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates":[{}]}"#).unwrap();
        assert_eq!(GeminiClient::extract_text(&body), "");

        let body: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(GeminiClient::extract_text(&body), "");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello".into()),
                }],
            }],
            system_instruction: None,
            generation_config: GenerationConfig {
                max_output_tokens: 512,
            },
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("generationConfig"));
        assert!(json.contains("maxOutputTokens"));
        assert!(!json.contains("systemInstruction")); // skipped when None
    }
}
