pub mod callback;
mod error;
pub mod history;

pub use error::ApiError;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(callback::router())
        .merge(history::router())
}
