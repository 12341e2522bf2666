use axum::{routing::get, Router};

use crate::modules::{health::controller, preflight};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/health", get(controller::health).options(preflight))
}
