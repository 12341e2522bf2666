use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use validator::Validate;

use crate::error::ApiError;
use crate::modules::transcribe::schema::{TranscribeRequest, TranscribeResponse};
use crate::services::audio::{decode_base64_chunked, split_data_url, AudioContainer, DECODE_CHUNK_SIZE};
use crate::services::stt::SttClient;
use crate::AppState;

pub async fn transcribe(
    State(state): State<AppState>,
    payload: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let Json(payload) = payload?;
    let audio = decode_payload(&payload)?;

    let stt = state.stt_client()?;
    let text = forward(&stt, audio).await?;

    Ok(Json(TranscribeResponse { text }))
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut audio_data: Option<Vec<u8>> = None;
    let mut mime_type: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" || name == "audio" {
            // Browsers label unknown files octet-stream; the extension is a better hint.
            mime_type = field
                .content_type()
                .filter(|m| *m != "application/octet-stream")
                .map(str::to_string)
                .or_else(|| {
                    field
                        .file_name()
                        .and_then(AudioContainer::from_file_name)
                        .map(|c| c.mime_type().to_string())
                });
            audio_data = Some(field.bytes().await?.to_vec());
        }
    }

    let audio_data = audio_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| ApiError::Validation("No audio data provided".to_string()))?;

    let stt = state.stt_client()?;
    let text = forward(
        &stt,
        DecodedAudio {
            data: audio_data,
            mime_type,
        },
    )
    .await?;

    Ok(Json(TranscribeResponse { text }))
}

pub struct DecodedAudio {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Validates and decodes a base64 request without touching the network.
pub fn decode_payload(payload: &TranscribeRequest) -> Result<DecodedAudio, ApiError> {
    payload.validate()?;

    let (data_url_mime, encoded) = split_data_url(&payload.audio);
    let mime_type = payload
        .mime_type
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .or(data_url_mime)
        .map(str::to_string);

    let data = decode_base64_chunked(encoded, DECODE_CHUNK_SIZE)?;

    Ok(DecodedAudio { data, mime_type })
}

pub async fn forward(stt: &SttClient, audio: DecodedAudio) -> Result<String, ApiError> {
    tracing::info!(
        mime_type = audio.mime_type.as_deref().unwrap_or("unknown"),
        audio_bytes = audio.data.len(),
        "processing audio"
    );

    let result = stt.transcribe(audio.data, audio.mime_type.as_deref()).await?;

    let preview: String = result.text.chars().take(100).collect();
    tracing::info!(model = %result.model, preview = %preview, "transcription successful");

    Ok(result.text)
}
