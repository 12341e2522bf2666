use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::modules::transcribe::routes::MAX_AUDIO_BODY_BYTES;
use crate::modules::{preflight, translate::controller};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/translate", post(controller::translate).options(preflight))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES))
}
