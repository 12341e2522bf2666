use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_STT_MODEL: &str = "whisper-1";
pub const DEFAULT_TYPHOON_BASE_URL: &str = "https://api.opentyphoon.ai/v1";
pub const DEFAULT_LLM_MODEL: &str = "typhoon-v2.1-12b-instruct";

#[derive(Debug, Clone)]
pub struct SttSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_STT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_TYPHOON_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 2048,
            temperature: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub stt: SttSettings,
    pub llm: LlmSettings,
    /// Applies to the whole upstream exchange, body included.
    pub upstream_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            stt: SttSettings::default(),
            llm: LlmSettings::default(),
            upstream_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Call `dotenvy::dotenv()`
    /// first if a `.env` file should be honoured.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let stt = SttSettings {
            api_key: secret("OPENAI_API_KEY"),
            base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.stt.base_url),
            model: env::var("STT_MODEL").unwrap_or(defaults.stt.model),
        };

        let llm = LlmSettings {
            api_key: secret("TYPHOON_API_KEY"),
            base_url: env::var("TYPHOON_BASE_URL").unwrap_or(defaults.llm.base_url),
            model: env::var("LLM_MODEL").unwrap_or(defaults.llm.model),
            max_tokens: parsed("LLM_MAX_TOKENS").unwrap_or(defaults.llm.max_tokens),
            temperature: parsed("LLM_TEMPERATURE").unwrap_or(defaults.llm.temperature),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            stt,
            llm,
            upstream_timeout: timeout_secs("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout),
            connect_timeout: defaults.connect_timeout,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Empty keys count as unset.
fn secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

// A zero timeout would fail every upstream call, so it is treated as unset.
fn timeout_secs(name: &str) -> Option<Duration> {
    match parsed::<u64>(name)? {
        0 => {
            tracing::warn!(variable = name, "ignoring zero timeout");
            None
        }
        secs => Some(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_hosted_services() {
        let settings = Settings::default();
        assert_eq!(settings.stt.model, "whisper-1");
        assert_eq!(settings.llm.model, "typhoon-v2.1-12b-instruct");
        assert_eq!(settings.llm.max_tokens, 2048);
        assert!(settings.stt.api_key.is_none());
        assert!(settings.llm.api_key.is_none());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn zero_timeout_falls_back_to_default() {
        env::set_var("SIGNBRIDGE_TEST_TIMEOUT_ZERO", "0");
        assert_eq!(timeout_secs("SIGNBRIDGE_TEST_TIMEOUT_ZERO"), None);

        env::set_var("SIGNBRIDGE_TEST_TIMEOUT_SET", " 15 ");
        assert_eq!(timeout_secs("SIGNBRIDGE_TEST_TIMEOUT_SET"), Some(Duration::from_secs(15)));

        assert_eq!(timeout_secs("SIGNBRIDGE_TEST_TIMEOUT_UNSET"), None);
    }
}
