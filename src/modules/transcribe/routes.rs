use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::modules::{preflight, transcribe::controller};
use crate::AppState;

/// Whisper caps uploads at 25 MB; base64 adds a third on top.
pub const MAX_AUDIO_BODY_BYTES: usize = 40 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/transcribe", post(controller::transcribe).options(preflight))
        .route("/api/transcribe/upload", post(controller::upload).options(preflight))
        .layer(DefaultBodyLimit::max(MAX_AUDIO_BODY_BYTES))
}
