use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::modules::summarize::schema::{SummarizeRequest, SummarizeResponse};
use crate::services::llm::LlmClient;
use crate::services::reply::ParsedSummary;
use crate::AppState;

pub async fn summarize(
    State(state): State<AppState>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let llm = state.llm_client()?;
    let result = summarize_text(&llm, &payload.text).await?;

    Ok(Json(SummarizeResponse {
        summary: result.summary,
        keywords: result.keywords,
        original_text: payload.text,
    }))
}

/// Caller guarantees `text` is not blank.
pub async fn summarize_text(llm: &LlmClient, text: &str) -> Result<ParsedSummary, ApiError> {
    let text = text.trim();
    tracing::info!(text_chars = text.chars().count(), "processing text for summarization");

    let result = llm.summarize(text).await?;

    tracing::info!(
        keywords = result.keywords.len(),
        structured = result.structured,
        "summarization complete"
    );

    Ok(result)
}
