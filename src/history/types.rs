use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logged interaction: the inbound event plus the reply sent for it.
/// `event` and `reply_message` are opaque snapshots; their structure is not
/// validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: i64,
    pub event: Value,
    pub reply_message: Value,
    #[serde(default)]
    pub deleted: bool,
}

/// External read view of an entry. Soft-deleted entries never reach this
/// type, and the `deleted` flag itself is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntryView {
    pub timestamp: i64,
    pub event: Value,
    pub reply_message: Value,
}

impl From<HistoryEntry> for HistoryEntryView {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            timestamp: entry.timestamp,
            event: entry.event,
            reply_message: entry.reply_message,
        }
    }
}

/// Durable per-user record. `history` is append-only and never physically
/// shrinks; `api_key_hash` is empty until a credential is issued and is
/// overwritten wholesale on each issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub api_key_hash: String,
    pub history: Vec<HistoryEntry>,
}

impl UserRecord {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            api_key_hash: String::new(),
            history: Vec::new(),
        }
    }
}
