use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;

use crate::adapters::ReplyClient;
use crate::bot::ReplyMessage;

const REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

/// Reply channel of the LINE Messaging API, authenticated with the channel
/// access token.
pub struct LineClient {
    http: reqwest::Client,
    access_token: String,
}

impl LineClient {
    pub fn new(http: reqwest::Client, access_token: String) -> Self {
        Self { http, access_token }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [ReplyMessage],
}

#[async_trait]
impl ReplyClient for LineClient {
    async fn reply(&self, reply_token: &str, messages: &[ReplyMessage]) -> anyhow::Result<()> {
        let res = self
            .http
            .post(REPLY_ENDPOINT)
            .bearer_auth(&self.access_token)
            .json(&ReplyRequest {
                reply_token,
                messages,
            })
            .send()
            .await
            .context("reply request failed")?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            anyhow::bail!("reply rejected with {status}: {detail}");
        }
        Ok(())
    }
}
