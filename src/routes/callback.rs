use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use tracing::{debug, error, instrument, warn};

use crate::bot;
use crate::line::{signature, MessageEvent, WebhookRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(hello))
        .route("/callback", post(callback))
}

async fn hello() -> &'static str {
    "Hello World!"
}

/// Webhook ingress: authenticate the delivery, then feed each parsed event,
/// in order, to the dispatcher. Rejections have no side effects.
#[instrument(skip(state, headers, body))]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, StatusCode> {
    let signature_header = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;

    if !signature::verify(&state.config.line.channel_secret, &body, signature_header) {
        warn!("webhook signature mismatch");
        return Err(StatusCode::BAD_REQUEST);
    }

    debug!(body = %String::from_utf8_lossy(&body), "webhook body");

    let payload: WebhookRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "malformed webhook body");
        StatusCode::BAD_REQUEST
    })?;

    for raw in &payload.events {
        let Some(event) = MessageEvent::from_raw(raw) else {
            continue;
        };
        bot::handle_event(&state, &event).await.map_err(|e| {
            error!(error = %e, user_id = %event.user_id, "event processing failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    }

    Ok("OK")
}
