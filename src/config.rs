use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from wellness.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_bind: std::net::SocketAddr,
    /// Allow any origin on the API; the dashboard UI is served from elsewhere
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_bind: std::net::SocketAddr::from(([127, 0, 0, 1], 8790)),
            cors_allow_any: true,
        }
    }
}

/// Generation provider, retry schedule and per-call timeout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    /// Total attempts per request, including the first call
    pub max_attempts: u32,
    /// First backoff delay; doubles after each failed attempt
    pub base_delay_ms: u64,
    /// Upper bound on a single generation call
    pub call_timeout_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
            call_timeout_ms: 30_000,
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gemini_api_key: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            log_level: "wellness_core=info,tower_http=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
                .filter(|k| !k.trim().is_empty()),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "wellness_core=info,tower_http=info".to_string()),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses WELLNESS_CONFIG environment variable or defaults to "wellness.toml"
    pub fn load() -> anyhow::Result<Self> {
        let config_path =
            std::env::var("WELLNESS_CONFIG").unwrap_or_else(|_| "wellness.toml".to_string());
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit TOML path, then apply env overrides
    pub fn load_from(config_path: &str) -> anyhow::Result<Self> {
        if let Ok(env_path) = std::env::var("WELLNESS_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(config_path) {
            toml::from_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        if config.runtime.gemini_api_key.is_none() {
            tracing::warn!(
                "GEMINI_API_KEY is not set; generation endpoints will answer 503"
            );
        }

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("WELLNESS_HTTP_BIND") {
            match v.parse::<std::net::SocketAddr>() {
                Ok(bind) => self.server.http_bind = bind,
                Err(_) => tracing::warn!("Ignoring unparseable WELLNESS_HTTP_BIND '{}'", v),
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.generation.model = model;
        }
        if let Ok(base) = std::env::var("GEMINI_BASE_URL") {
            self.generation.base_url = base;
        }
        if let Some(attempts) = std::env::var("WELLNESS_GEN_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.generation.max_attempts = attempts;
        }
        if let Some(delay) = std::env::var("WELLNESS_GEN_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.base_delay_ms = delay;
        }
        if let Some(timeout) = std::env::var("WELLNESS_GEN_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.generation.call_timeout_ms = timeout;
        }
    }

    /// Validate and clamp the configuration
    pub fn validate(&mut self) -> anyhow::Result<()> {
        if self.generation.max_attempts == 0 {
            self.generation.max_attempts = 1;
        } else if self.generation.max_attempts > 5 {
            tracing::warn!(
                "max_attempts {} exceeds max 5, clamping to 5",
                self.generation.max_attempts
            );
            self.generation.max_attempts = 5;
        }
        if self.generation.call_timeout_ms == 0 {
            anyhow::bail!("generation.call_timeout_ms must be > 0");
        }
        if self.generation.provider != "gemini" {
            anyhow::bail!(
                "Unsupported generation provider '{}'",
                self.generation.provider
            );
        }
        Ok(())
    }
}
