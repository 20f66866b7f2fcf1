//! Application configuration. Bind address, completion endpoint, upload limits.

use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_AI_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_AI_MODEL: &str = "anthropic/claude-3.5-sonnet";
pub const DEFAULT_AI_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_AI_TEMPERATURE: f32 = 0.1;
/// Upper bound for one multipart submission (image plus form fields).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Interface the UI binds to. Read from SOLAR_ASSIST_HOST.
    #[serde(default)]
    pub host: Option<String>,

    /// UI port. Read from SOLAR_ASSIST_PORT.
    #[serde(default)]
    pub port: Option<u16>,

    /// Max request body size in bytes. Read from SOLAR_ASSIST_MAX_UPLOAD_BYTES.
    #[serde(default)]
    pub max_upload_bytes: Option<usize>,

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Fallback API key used when the form field is left empty.
    /// Read from SOLAR_ASSIST_AI_API_KEY or OPENROUTER_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Chat completions endpoint. Read from SOLAR_ASSIST_AI_API_URL.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Vision model name. Read from SOLAR_ASSIST_AI_MODEL.
    #[serde(default)]
    pub ai_model: Option<String>,

    #[serde(default)]
    pub ai_max_tokens: Option<u32>,

    #[serde(default)]
    pub ai_temperature: Option<f32>,

    /// Serve canned answers instead of calling the endpoint. Read from SOLAR_ASSIST_MOCK_AI.
    #[serde(default)]
    pub mock_ai: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("SOLAR_ASSIST").try_parsing(true));
        if let Ok(path) = std::env::var("SOLAR_ASSIST_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg = Self::build(c)?;
        // OPENROUTER_API_KEY is read directly (no prefix) so an existing provider .env works as-is
        if cfg.ai_api_key.is_none() {
            if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
                cfg.ai_api_key = Some(key);
            }
        }
        Ok(cfg)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn host_or_default(&self) -> String {
        self.host.clone().unwrap_or_else(|| DEFAULT_HOST.to_string())
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host_or_default(), self.port_or_default())
    }

    pub fn max_upload_bytes_or_default(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // AI Configuration Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the fallback API key if one is configured and non-blank.
    pub fn ai_api_key(&self) -> Option<String> {
        self.ai_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_API_URL.to_string())
    }

    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| DEFAULT_AI_MODEL.to_string())
    }

    pub fn ai_max_tokens_or_default(&self) -> u32 {
        self.ai_max_tokens.unwrap_or(DEFAULT_AI_MAX_TOKENS)
    }

    pub fn ai_temperature_or_default(&self) -> f32 {
        self.ai_temperature.unwrap_or(DEFAULT_AI_TEMPERATURE)
    }

    pub fn is_mock_ai(&self) -> bool {
        self.mock_ai.unwrap_or(false)
    }
}
