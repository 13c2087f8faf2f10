//! Seams to the external services the dispatcher talks to. Each boundary is
//! a narrow trait with one real client behind it; failures are values the
//! caller pattern-matches on, never panics.

mod gemini;
mod translator;

use async_trait::async_trait;

use crate::bot::ReplyMessage;

pub use gemini::GeminiClient;
pub use translator::AzureTranslator;

#[async_trait]
pub trait AiClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait TranslateClient: Send + Sync {
    async fn translate_to_english(&self, text: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait ReplyClient: Send + Sync {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> anyhow::Result<()>;
}
