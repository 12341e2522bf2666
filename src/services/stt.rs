use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::settings::SttSettings;
use crate::services::audio::AudioContainer;

/// Recognition is pinned to Thai.
pub const LANGUAGE: &str = "th";

#[derive(Error, Debug)]
pub enum SttError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("OpenAI API error: {status} - {body}")]
    ApiError { status: StatusCode, body: String },
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
    #[error("Transcription request timed out")]
    Timeout,
}

impl SttError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SttError::Timeout
        } else {
            SttError::RequestError(err)
        }
    }
}

#[derive(Debug, Deserialize)]
struct WhisperResponse {
    #[serde(default)]
    text: String,
}

pub struct SttResponse {
    pub text: String,
    pub model: String,
}

#[derive(Clone)]
pub struct SttClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SttClient {
    /// Fails before any network activity when no API key is configured.
    pub fn new(client: Client, settings: &SttSettings) -> Result<Self, SttError> {
        let api_key = settings.api_key.clone().ok_or(SttError::MissingApiKey)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
        })
    }

    pub async fn transcribe(
        &self,
        audio_data: Vec<u8>,
        mime_type: Option<&str>,
    ) -> Result<SttResponse, SttError> {
        let container = AudioContainer::from_mime(mime_type);
        let content_type = match mime_type {
            Some(mime) if is_valid_mime(mime) => mime,
            Some(mime) => {
                tracing::warn!(mime_type = %mime, fallback = container.mime_type(), "unparsable mimeType hint");
                container.mime_type()
            }
            None => container.mime_type(),
        };

        let file_part = Part::bytes(audio_data)
            .file_name(container.file_name())
            .mime_str(content_type)?;

        let form = Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("language", LANGUAGE);

        tracing::debug!(model = %self.model, extension = container.extension(), "sending audio to Whisper");

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(SttError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "OpenAI API error");
            return Err(SttError::ApiError { status, body });
        }

        let whisper_response: WhisperResponse =
            response.json().await.map_err(SttError::from_transport)?;

        Ok(SttResponse {
            text: whisper_response.text,
            model: self.model.clone(),
        })
    }
}

// Hints like "mp3" only choose the container; the part needs a real MIME type.
fn is_valid_mime(mime: &str) -> bool {
    Part::text("").mime_str(mime).is_ok()
}
