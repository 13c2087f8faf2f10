mod store;
mod types;

pub use store::{HistoryStore, StoreError};
pub use types::{HistoryEntry, HistoryEntryView, UserRecord};
