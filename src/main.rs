use anyhow::Context;
use signbridge::{app, config::settings::Settings, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signbridge=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env();
    let addr = settings.bind_addr();

    if settings.stt.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set, transcription requests will fail");
    }
    if settings.llm.api_key.is_none() {
        tracing::warn!("TYPHOON_API_KEY is not set, summarization requests will fail");
    }

    let state = AppState::new(settings).context("failed to build HTTP client")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("signbridge listening on http://{}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
