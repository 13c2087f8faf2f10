mod client;
mod events;
pub mod signature;

pub use client::LineClient;
pub use events::{MessageEvent, WebhookRequest};

#[cfg(test)]
pub(crate) use events::sample_text_event;
