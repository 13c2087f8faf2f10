use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;

use super::AiClient;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Thin client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: GeminiConfig) -> Self {
        Self { http, config }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl AiClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{API_BASE}/{}:generateContent", self.config.model);
        let body = GenerateRequest {
            system_instruction: self
                .config
                .system_instruction
                .as_deref()
                .map(|text| Content {
                    parts: vec![Part { text }],
                }),
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let res = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("gemini returned {status}: {detail}");
        }

        let parsed: GenerateResponse = res.json().await.context("gemini response malformed")?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .context("gemini returned no candidates")?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();
        Ok(text.trim().to_string())
    }
}
