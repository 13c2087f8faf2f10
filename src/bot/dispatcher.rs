use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::auth;
use crate::history::HistoryEntry;
use crate::line::MessageEvent;
use crate::state::AppState;

use super::commands::Command;
use super::replies::ReplyMessage;

/// Processes one inbound text-message event end to end: ensure the sender's
/// record, classify, call at most one external adapter, attempt one reply,
/// append exactly one history entry. Adapter and reply-channel failures are
/// contained here; only a store failure propagates.
pub async fn handle_event(state: &AppState, event: &MessageEvent) -> anyhow::Result<()> {
    state.store.ensure(&event.user_id).await?;

    let reply = match Command::classify(&event.text) {
        Command::KeyGen => return issue_api_key(state, event).await,
        Command::Sticker => ReplyMessage::sticker(),
        Command::Image => ReplyMessage::image(),
        Command::Video => ReplyMessage::video(),
        Command::Location => ReplyMessage::location(),
        Command::Gemini(prompt) => ReplyMessage::text(generate(state, prompt).await),
        Command::Translate(text) => ReplyMessage::text(translate(state, text).await),
        Command::Help => ReplyMessage::help(),
    };

    send_reply(state, &event.reply_token, &reply).await;
    state
        .store
        .append(&event.user_id, snapshot(event, &reply))
        .await?;
    Ok(())
}

/// Credential issuance. Order matters: the raw token goes out first and is
/// never persisted; the stored snapshot and the record both carry only the
/// digest. Hash overwrite and history append share one lock acquisition.
async fn issue_api_key(state: &AppState, event: &MessageEvent) -> anyhow::Result<()> {
    let key = auth::generate_api_key();
    let key_hash = auth::digest(&key);

    send_reply(state, &event.reply_token, &ReplyMessage::text(key)).await;

    let redacted = ReplyMessage::text(key_hash.clone());
    state
        .store
        .issue_credential(&event.user_id, &key_hash, snapshot(event, &redacted))
        .await?;
    debug!(user_id = %event.user_id, "api key issued");
    Ok(())
}

async fn generate(state: &AppState, prompt: &str) -> String {
    match timeout(state.config.adapter_timeout, state.ai.generate(prompt)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, "gemini call failed");
            format!("An exception occurred: {e}")
        }
        Err(_) => {
            warn!("gemini call timed out");
            "An exception occurred: the request timed out".to_string()
        }
    }
}

async fn translate(state: &AppState, text: &str) -> String {
    match timeout(
        state.config.adapter_timeout,
        state.translator.translate_to_english(text),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, "translation call failed");
            format!("An error has occurred: {e}")
        }
        Err(_) => {
            warn!("translation call timed out");
            "An error has occurred: the request timed out".to_string()
        }
    }
}

/// One reply attempt. Delivery failure must not lose the history entry, so
/// it is logged and swallowed here.
async fn send_reply(state: &AppState, reply_token: &str, reply: &ReplyMessage) {
    let delivery = state.line.reply(reply_token, std::slice::from_ref(reply));
    match timeout(state.config.adapter_timeout, delivery).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "reply delivery failed"),
        Err(_) => error!("reply delivery timed out"),
    }
}

fn snapshot(event: &MessageEvent, reply: &ReplyMessage) -> HistoryEntry {
    HistoryEntry {
        timestamp: event.timestamp,
        event: event.raw.clone(),
        reply_message: serde_json::to_value(reply).unwrap_or(Value::Null),
        deleted: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::replies::{STICKER_ID_MAX, STICKER_ID_MIN};
    use crate::line::sample_text_event;
    use crate::testing::{failing_ai, test_state, test_state_with};

    fn event(user_id: &str, timestamp: i64, text: &str) -> MessageEvent {
        MessageEvent::from_raw(&sample_text_event(user_id, timestamp, text))
            .expect("sample event parses")
    }

    #[tokio::test]
    async fn first_message_creates_a_record_with_no_credential() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, _line) = test_state(dir.path());

        handle_event(&state, &event("U-new", 1, "anything at all"))
            .await
            .expect("handle");

        assert_eq!(state.store.api_key_hash("U-new").await.expect("hash"), "");
        assert_eq!(state.store.list_active("U-new").await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn sticker_in_any_casing_replies_in_range_and_appends_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "STICKER"))
            .await
            .expect("handle");

        let sent = line.sent();
        assert_eq!(sent.len(), 1);
        let ReplyMessage::Sticker { sticker_id, .. } = &sent[0].1[0] else {
            panic!("expected a sticker reply, got {:?}", sent[0].1);
        };
        let id: u32 = sticker_id.parse().expect("numeric id");
        assert!((STICKER_ID_MIN..=STICKER_ID_MAX).contains(&id));

        let history = state.store.list_active("U1").await.expect("list");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reply_message["type"], "sticker");
    }

    #[tokio::test]
    async fn gemini_success_forwards_the_adapter_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "Gemini:Hello"))
            .await
            .expect("handle");

        let sent = line.sent();
        assert_eq!(sent[0].1[0], ReplyMessage::text("stub generation"));
    }

    #[tokio::test]
    async fn gemini_failure_degrades_to_an_error_text_and_still_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state_with(dir.path(), failing_ai("boom"));

        handle_event(&state, &event("U1", 10, "gemini:Hello"))
            .await
            .expect("handle must not propagate adapter errors");

        let sent = line.sent();
        let ReplyMessage::Text { text } = &sent[0].1[0] else {
            panic!("expected a text reply");
        };
        assert!(!text.is_empty());
        assert!(text.starts_with("An exception occurred:"), "got: {text}");
        assert!(text.contains("boom"));

        assert_eq!(state.store.list_active("U1").await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn translate_replies_with_the_translation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "translate:哈囉"))
            .await
            .expect("handle");

        let sent = line.sent();
        assert_eq!(sent[0].1[0], ReplyMessage::text("stub translation"));
    }

    #[tokio::test]
    async fn unknown_text_gets_the_help_reply() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "what can you do?"))
            .await
            .expect("handle");

        assert_eq!(line.sent()[0].1[0], ReplyMessage::help());
    }

    #[tokio::test]
    async fn keygen_sends_the_raw_token_but_persists_only_the_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "api-keygen"))
            .await
            .expect("handle");

        let sent = line.sent();
        assert_eq!(sent.len(), 1);
        let ReplyMessage::Text { text: raw_token } = &sent[0].1[0] else {
            panic!("expected the raw token as a text reply");
        };
        assert_eq!(raw_token.len(), 43);

        let stored_hash = state.store.api_key_hash("U1").await.expect("hash");
        assert_eq!(stored_hash, auth::digest(raw_token));

        let history = state.store.list_active("U1").await.expect("list");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].reply_message["text"], stored_hash.as_str());

        assert!(auth::authorize(&state.store, "U1", Some(raw_token))
            .await
            .expect("authorize"));
    }

    #[tokio::test]
    async fn keygen_twice_revokes_the_first_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (state, line) = test_state(dir.path());

        handle_event(&state, &event("U1", 10, "api-keygen"))
            .await
            .expect("first keygen");
        handle_event(&state, &event("U1", 11, "API-KEYGEN"))
            .await
            .expect("second keygen");

        let sent = line.sent();
        let ReplyMessage::Text { text: token_a } = &sent[0].1[0] else {
            panic!("expected text");
        };
        let ReplyMessage::Text { text: token_b } = &sent[1].1[0] else {
            panic!("expected text");
        };

        assert!(!auth::authorize(&state.store, "U1", Some(token_a))
            .await
            .expect("authorize"));
        assert!(auth::authorize(&state.store, "U1", Some(token_b))
            .await
            .expect("authorize"));
        assert_eq!(state.store.list_active("U1").await.expect("list").len(), 2);
    }
}
