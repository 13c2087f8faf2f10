//! Stub adapter implementations shared by the unit tests.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::{AiClient, ReplyClient, TranslateClient};
use crate::bot::ReplyMessage;
use crate::state::AppState;

/// Reply channel that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingReplyClient {
    sent: Mutex<Vec<(String, Vec<ReplyMessage>)>>,
}

impl RecordingReplyClient {
    pub fn sent(&self) -> Vec<(String, Vec<ReplyMessage>)> {
        self.sent.lock().expect("reply log lock").clone()
    }
}

#[async_trait]
impl ReplyClient for RecordingReplyClient {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> anyhow::Result<()> {
        self.sent
            .lock()
            .expect("reply log lock")
            .push((reply_token.to_string(), messages.to_vec()));
        Ok(())
    }
}

struct StubAi(Result<String, String>);

#[async_trait]
impl AiClient for StubAi {
    async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        match &self.0 {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }
}

struct StubTranslator(Result<String, String>);

#[async_trait]
impl TranslateClient for StubTranslator {
    async fn translate_to_english(&self, _text: &str) -> anyhow::Result<String> {
        match &self.0 {
            Ok(text) => Ok(text.clone()),
            Err(msg) => Err(anyhow::anyhow!("{msg}")),
        }
    }
}

pub fn failing_ai(message: &str) -> Arc<dyn AiClient> {
    Arc::new(StubAi(Err(message.to_string())))
}

/// State over a tempdir-backed store with well-behaved stub adapters.
pub fn test_state(data_dir: &Path) -> (AppState, Arc<RecordingReplyClient>) {
    test_state_with(data_dir, Arc::new(StubAi(Ok("stub generation".into()))))
}

pub fn test_state_with(
    data_dir: &Path,
    ai: Arc<dyn AiClient>,
) -> (AppState, Arc<RecordingReplyClient>) {
    let line = Arc::new(RecordingReplyClient::default());
    let state = AppState::for_tests(
        data_dir,
        line.clone(),
        ai,
        Arc::new(StubTranslator(Ok("stub translation".into()))),
    );
    (state, line)
}
