use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TranslatorConfig;

use super::TranslateClient;

/// Azure Translator v3 `translate` endpoint, fixed to English as the target
/// language.
pub struct AzureTranslator {
    http: reqwest::Client,
    config: TranslatorConfig,
}

impl AzureTranslator {
    pub fn new(http: reqwest::Client, config: TranslatorConfig) -> Self {
        Self { http, config }
    }
}

#[derive(Serialize)]
struct TranslateInput<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResult {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

#[async_trait]
impl TranslateClient for AzureTranslator {
    async fn translate_to_english(&self, text: &str) -> anyhow::Result<String> {
        let url = format!("{}/translate", self.config.endpoint.trim_end_matches('/'));
        let res = self
            .http
            .post(&url)
            .query(&[("api-version", "3.0"), ("to", "en")])
            .header("Ocp-Apim-Subscription-Key", &self.config.key)
            .header("Ocp-Apim-Subscription-Region", &self.config.region)
            .json(&[TranslateInput { text }])
            .send()
            .await
            .context("translator request failed")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("translator returned {status}: {detail}");
        }

        let results: Vec<TranslateResult> =
            res.json().await.context("translator response malformed")?;
        results
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .map(|t| t.text)
            .context("translator returned no translations")
    }
}
