use axum::http::{header::HeaderName, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod modules;
pub mod services;

use config::settings::Settings;
use services::llm::{LlmClient, LlmError};
use services::stt::{SttClient, SttError};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self, reqwest::Error> {
        let http = config::http::build_client(&settings)?;
        Ok(Self {
            settings: Arc::new(settings),
            http,
        })
    }

    pub fn stt_client(&self) -> Result<SttClient, SttError> {
        SttClient::new(self.http.clone(), &self.settings.stt)
    }

    pub fn llm_client(&self) -> Result<LlmClient, LlmError> {
        LlmClient::new(self.http.clone(), &self.settings.llm)
    }
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("authorization"),
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static("content-type"),
        ])
}

/// Full application: every module plus CORS and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(modules::health::routes::routes())
        .merge(modules::transcribe::routes::routes())
        .merge(modules::summarize::routes::routes())
        .merge(modules::translate::routes::routes())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
