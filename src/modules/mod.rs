use axum::http::StatusCode;

pub mod health;
pub mod summarize;
pub mod transcribe;
pub mod translate;

/// Bare `OPTIONS` gets an empty 200; CORS headers come from the layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
