//! # Gemini
//!
//! [`DefinitionProvider`] backed by the Gemini `generateContent` endpoint.
//!
//! The prompt is fixed: it asks for a definition in 50 words or less and
//! instructs the model to answer exactly `"Slang not found!"` when the term
//! is not a real word. The resolver inspects the raw reply text; nothing here
//! interprets it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    resolver::{DefinitionProvider, ProviderError},
};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    client: Client,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiReply {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiReplyContent,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    text: String,
}

impl GeminiProvider {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.gemini_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }

    fn prompt(term: &str) -> String {
        format!(
            "What does '{term}' mean in Gen Z slang? Respond in 50 words or less. \
             If you are confident that '{term}' is not a valid word, respond with exactly: \
             \"Slang not found!\""
        )
    }
}

#[async_trait]
impl DefinitionProvider for GeminiProvider {
    async fn define(&self, term: &str) -> Result<String, ProviderError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Self::prompt(term),
                }],
            }],
        };

        let url = format!(
            "{GEMINI_BASE_URL}/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GeminiReply =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        extract_reply(reply)
    }
}

fn extract_reply(reply: GeminiReply) -> Result<String, ProviderError> {
    let candidate = reply
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("no candidates in reply".to_string()))?;

    let part = candidate
        .content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("no parts in candidate".to_string()))?;

    Ok(part.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_term_and_sentinel_instruction() {
        let prompt = GeminiProvider::prompt("rizz");

        assert!(prompt.contains("'rizz'"));
        assert!(prompt.contains("50 words or less"));
        assert!(prompt.contains("\"Slang not found!\""));
    }

    #[test]
    fn reply_text_is_extracted_from_first_candidate() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [{ "text": "Confidence and charisma." }],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": { "totalTokenCount": 42 }
        }"#;

        let reply: GeminiReply = serde_json::from_str(json).unwrap();

        assert_eq!(extract_reply(reply).unwrap(), "Confidence and charisma.");
    }

    #[test]
    fn reply_without_candidates_is_malformed() {
        let reply: GeminiReply = serde_json::from_str(r#"{ "candidates": [] }"#).unwrap();

        assert!(matches!(
            extract_reply(reply),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn reply_without_parts_is_malformed() {
        let json = r#"{ "candidates": [{ "content": { "parts": [] } }] }"#;
        let reply: GeminiReply = serde_json::from_str(json).unwrap();

        assert!(matches!(
            extract_reply(reply),
            Err(ProviderError::Malformed(_))
        ));
    }
}
