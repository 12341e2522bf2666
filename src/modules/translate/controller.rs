use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::ApiError;
use crate::modules::summarize::controller::summarize_text;
use crate::modules::transcribe::controller::{decode_payload, forward};
use crate::modules::transcribe::schema::TranscribeRequest;
use crate::modules::translate::schema::TranslateResponse;
use crate::AppState;

/// Audio in, transcript plus summary out. Silence skips the model call.
/// Both keys are checked before Whisper is billed.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(payload) = payload?;

    let audio = decode_payload(&payload)?;

    let stt = state.stt_client()?;
    let llm = state.llm_client()?;
    let text = forward(&stt, audio).await?;

    if text.trim().is_empty() {
        tracing::info!("empty transcript, skipping summarization");
        return Ok(Json(TranslateResponse {
            text,
            summary: String::new(),
            keywords: Vec::new(),
        }));
    }

    let summary = summarize_text(&llm, &text).await?;

    Ok(Json(TranslateResponse {
        text,
        summary: summary.summary,
        keywords: summary.keywords,
    }))
}
