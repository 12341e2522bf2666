use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    /// Base64 audio, optionally as a `data:` URL.
    #[serde(default)]
    #[validate(length(min = 1, message = "No audio data provided"))]
    pub audio: String,
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}
