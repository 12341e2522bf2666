//! Run with: cargo run --bin smoke -- path/to/recording.webm [http://127.0.0.1:8080]

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use signbridge::services::audio::AudioContainer;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: smoke <audio-file> [server-url]");
    };
    let server = args.next().unwrap_or_else(|| "http://127.0.0.1:8080".to_string());

    let audio = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;
    let mime_type = AudioContainer::from_file_name(&path)
        .unwrap_or(AudioContainer::Webm)
        .mime_type();

    println!("\n🧪 Smoke test against {server}\n");
    println!("File: {path} ({} bytes, {mime_type})\n", audio.len());

    let start = Instant::now();

    let response = Client::new()
        .post(format!("{server}/api/translate"))
        .json(&json!({
            "audio": STANDARD.encode(&audio),
            "mimeType": mime_type,
        }))
        .send()
        .await
        .context("request failed, is the server running?")?;

    let elapsed = start.elapsed().as_millis();
    let status = response.status();
    let body: Value = response.json().await.context("response was not JSON")?;

    if !status.is_success() {
        println!("❌ {status}: {}", body["error"]);
        return Ok(());
    }

    println!("⏱️  Response time: {elapsed}ms\n");
    println!("📝 Transcript:\n{}\n", body["text"].as_str().unwrap_or_default());
    println!("✂️  Summary:\n{}\n", body["summary"].as_str().unwrap_or_default());
    println!("🔑 Keywords: {}", body["keywords"]);

    Ok(())
}
