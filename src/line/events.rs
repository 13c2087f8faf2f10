use serde::Deserialize;
use serde_json::Value;

/// Parsed webhook body. Events are kept as raw JSON so the history store
/// receives the exact snapshot the platform delivered.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequest {
    #[serde(default)]
    pub events: Vec<Value>,
}

/// Typed view of a text-message event, alongside its raw snapshot.
#[derive(Debug, Clone)]
pub struct MessageEvent {
    pub reply_token: String,
    pub timestamp: i64,
    pub user_id: String,
    pub text: String,
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    #[serde(rename = "type")]
    kind: String,
    reply_token: String,
    timestamp: i64,
    source: WireSource,
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSource {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl MessageEvent {
    /// Returns `None` for anything that is not a text message from an
    /// identified user; those events are skipped by the ingress.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        let wire: WireEvent = serde_json::from_value(raw.clone()).ok()?;
        if wire.kind != "message" || wire.message.kind != "text" {
            return None;
        }
        Some(Self {
            reply_token: wire.reply_token,
            timestamp: wire.timestamp,
            user_id: wire.source.user_id,
            text: wire.message.text?,
            raw: raw.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_text_event(user_id: &str, timestamp: i64, text: &str) -> Value {
    serde_json::json!({
        "type": "message",
        "replyToken": "reply-token-1",
        "timestamp": timestamp,
        "source": {"type": "user", "userId": user_id},
        "message": {"id": "1", "type": "text", "text": text},
    })
}
