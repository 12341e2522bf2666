use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::settings::LlmSettings;
use crate::services::reply::{self, ParsedSummary};

/// Shorten using only words already in the source, then pull 3-5 keywords
/// that appear verbatim. The reply must be a JSON object.
const SUMMARY_SYSTEM_PROMPT: &str = r#"คุณเป็นผู้ช่วยย่อข้อความภาษาไทย ให้ทำงานดังนี้:
1. ย่อข้อความให้สั้นลง โดยใช้เฉพาะคำที่มีอยู่ในข้อความต้นฉบับเท่านั้น ห้ามสร้างคำใหม่ ห้ามแปลความหมาย ห้ามเปลี่ยนคำ
2. ตัดเฉพาะคำฟุ่มเฟือยหรือคำซ้ำออก แต่ต้องคงคำหลักและความหมายเดิมไว้ทั้งหมด
3. ดึงคำสำคัญ (Keywords) ที่ปรากฏอยู่ในข้อความต้นฉบับออกมา 3-5 คำ (ห้ามสร้างคำใหม่)

ตอบในรูปแบบ JSON เท่านั้น:
{
  "summary": "ข้อความที่ย่อแล้ว โดยใช้คำจากต้นฉบับเท่านั้น",
  "keywords": ["คำสำคัญ1", "คำสำคัญ2", "คำสำคัญ3"]
}"#;

const SUMMARY_USER_INSTRUCTION: &str = "ย่อข้อความนี้ให้สั้นลง โดยใช้เฉพาะคำที่มีในข้อความต้นฉบับเท่านั้น ห้ามแปลหรือสร้างคำใหม่ แล้วดึงคำสำคัญที่มีในข้อความออกมา:";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Typhoon API error: {status}")]
    ApiError { status: StatusCode, body: String },
    #[error("TYPHOON_API_KEY is not configured")]
    MissingApiKey,
    #[error("No content in Typhoon response")]
    EmptyCompletion,
    #[error("Summarization request timed out")]
    Timeout,
}

impl LlmError {
    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::RequestError(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmClient {
    /// Fails before any network activity when no API key is configured.
    pub fn new(client: Client, settings: &LlmSettings) -> Result<Self, LlmError> {
        let api_key = settings.api_key.clone().ok_or(LlmError::MissingApiKey)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub async fn complete(&self, system_prompt: &str, prompt: String) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(LlmError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Typhoon API error");
            return Err(LlmError::ApiError { status, body });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(LlmError::from_transport)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyCompletion)
    }

    pub async fn summarize(&self, text: &str) -> Result<ParsedSummary, LlmError> {
        let prompt = format!("{SUMMARY_USER_INSTRUCTION}\n\n{text}");
        let content = self.complete(SUMMARY_SYSTEM_PROMPT, prompt).await?;
        tracing::debug!(reply_len = content.len(), "Typhoon reply received");

        Ok(reply::parse_summary(&content))
    }
}
