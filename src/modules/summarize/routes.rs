use axum::{routing::post, Router};

use crate::modules::{preflight, summarize::controller};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/summarize", post(controller::summarize).options(preflight))
}
