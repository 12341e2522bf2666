use axum::{extract::State, Json};

use crate::modules::health::schema::HealthResponse;
use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        transcription: state.settings.stt.api_key.is_some(),
        summarization: state.settings.llm.api_key.is_some(),
    })
}
