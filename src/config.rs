use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    pub channel_secret: String,
    pub channel_access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslatorConfig {
    pub key: String,
    pub endpoint: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// Upper bound on each external call so a hung upstream cannot pin a
    /// per-user lock indefinitely.
    pub adapter_timeout: Duration,
    pub line: LineConfig,
    pub gemini: GeminiConfig,
    pub translator: TranslatorConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let line = LineConfig {
            channel_secret: std::env::var("LINE_CHANNEL_SECRET")?,
            channel_access_token: std::env::var("LINE_CHANNEL_ACCESS_TOKEN")?,
        };
        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".into()),
            system_instruction: std::env::var("GEMINI_SYSTEM_INSTRUCTION").ok(),
        };
        let translator = TranslatorConfig {
            key: std::env::var("AZURE_TRANSLATOR_KEY")?,
            endpoint: std::env::var("AZURE_TRANSLATOR_ENDPOINT")?,
            region: std::env::var("AZURE_TRANSLATOR_REGION")?,
        };
        Ok(Self {
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".into())
                .into(),
            adapter_timeout: Duration::from_secs(
                std::env::var("ADAPTER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(10),
            ),
            line,
            gemini,
            translator,
        })
    }

    #[cfg(test)]
    pub fn for_tests(data_dir: &std::path::Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            adapter_timeout: Duration::from_secs(5),
            line: LineConfig {
                channel_secret: "test-channel-secret".into(),
                channel_access_token: "test-access-token".into(),
            },
            gemini: GeminiConfig {
                api_key: "test".into(),
                model: "test-model".into(),
                system_instruction: None,
            },
            translator: TranslatorConfig {
                key: "test".into(),
                endpoint: "https://translator.test".into(),
                region: "test".into(),
            },
        }
    }
}
