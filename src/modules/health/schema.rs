use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Whether an API key is present; the upstream itself is not probed.
    pub transcription: bool,
    pub summarization: bool,
}
