use std::sync::Arc;

use crate::adapters::{AiClient, AzureTranslator, GeminiClient, ReplyClient, TranslateClient};
use crate::config::AppConfig;
use crate::history::HistoryStore;
use crate::line::LineClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<HistoryStore>,
    pub line: Arc<dyn ReplyClient>,
    pub ai: Arc<dyn AiClient>,
    pub translator: Arc<dyn TranslateClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let store = Arc::new(HistoryStore::open(&config.data_dir)?);

        let http = reqwest::Client::builder()
            .timeout(config.adapter_timeout)
            .build()?;

        let line = Arc::new(LineClient::new(
            http.clone(),
            config.line.channel_access_token.clone(),
        )) as Arc<dyn ReplyClient>;
        let ai =
            Arc::new(GeminiClient::new(http.clone(), config.gemini.clone())) as Arc<dyn AiClient>;
        let translator = Arc::new(AzureTranslator::new(http, config.translator.clone()))
            as Arc<dyn TranslateClient>;

        Ok(Self {
            config,
            store,
            line,
            ai,
            translator,
        })
    }

    #[cfg(test)]
    pub fn for_tests(
        data_dir: &std::path::Path,
        line: Arc<dyn ReplyClient>,
        ai: Arc<dyn AiClient>,
        translator: Arc<dyn TranslateClient>,
    ) -> Self {
        let config = Arc::new(AppConfig::for_tests(data_dir));
        let store = Arc::new(HistoryStore::open(data_dir).expect("open test store"));
        Self {
            config,
            store,
            line,
            ai,
            translator,
        }
    }
}
