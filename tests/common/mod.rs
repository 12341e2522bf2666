#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};
use signbridge::{app, config::settings::Settings, AppState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const OPENAI_KEY: &str = "test-openai-key";
pub const TYPHOON_KEY: &str = "test-typhoon-key";

/// What the fake upstream answers with.
#[derive(Clone)]
pub enum Reply {
    Transcript(String),
    Chat(String),
    ChatWithoutContent,
    Status(StatusCode, String),
    Hang,
}

#[derive(Debug, Default, Clone)]
pub struct Seen {
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
    pub file_name: Option<String>,
    pub file_content_type: Option<String>,
    pub file_bytes: Vec<u8>,
    pub chat: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Seen>>,
}

pub struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Seen>>,
}

impl MockUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Seen {
        self.seen.lock().unwrap().clone()
    }
}

pub async fn spawn_upstream(reply: Reply) -> MockUpstream {
    let state = MockState {
        reply,
        hits: Arc::new(AtomicUsize::new(0)),
        seen: Arc::new(Mutex::new(Seen::default())),
    };

    let app = Router::new()
        .route("/audio/transcriptions", post(transcriptions))
        .route("/chat/completions", post(chat_completions))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        base_url: format!("http://{addr}"),
        hits: state.hits,
        seen: state.seen,
    }
}

async fn transcriptions(
    State(mock): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);

    let mut seen = Seen {
        authorization: authorization(&headers),
        ..Seen::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            seen.file_name = field.file_name().map(str::to_string);
            seen.file_content_type = field.content_type().map(str::to_string);
            seen.file_bytes = field.bytes().await.unwrap().to_vec();
        } else {
            let value = field.text().await.unwrap();
            seen.form.insert(name, value);
        }
    }

    *mock.seen.lock().unwrap() = seen;
    respond(&mock.reply).await
}

async fn chat_completions(
    State(mock): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.hits.fetch_add(1, Ordering::SeqCst);

    *mock.seen.lock().unwrap() = Seen {
        authorization: authorization(&headers),
        chat: Some(body),
        ..Seen::default()
    };

    respond(&mock.reply).await
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn respond(reply: &Reply) -> Response {
    match reply {
        Reply::Transcript(text) => Json(json!({ "text": text })).into_response(),
        Reply::Chat(content) => Json(json!({
            "id": "chatcmpl-test",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content }
            }]
        }))
        .into_response(),
        Reply::ChatWithoutContent => Json(json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": null } }]
        }))
        .into_response(),
        Reply::Status(status, body) => (*status, body.clone()).into_response(),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
    }
}

/// Settings wired to the given mocks. A service without a mock has no key.
pub fn settings_for(stt: Option<&MockUpstream>, llm: Option<&MockUpstream>) -> Settings {
    let mut settings = Settings::default();
    settings.upstream_timeout = Duration::from_secs(5);

    if let Some(mock) = stt {
        settings.stt.api_key = Some(OPENAI_KEY.to_string());
        settings.stt.base_url = mock.base_url.clone();
    }
    if let Some(mock) = llm {
        settings.llm.api_key = Some(TYPHOON_KEY.to_string());
        settings.llm.base_url = mock.base_url.clone();
    }

    settings
}

pub fn setup_test_server(settings: Settings) -> TestServer {
    let state = AppState::new(settings).unwrap();
    TestServer::new(app(state)).unwrap()
}
