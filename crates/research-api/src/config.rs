//! Configuration for the research service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the generative backend credential
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the backend base URL
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the generation model
pub const ENV_MODEL: &str = "OPENAI_MODEL";
/// Environment variable overriding the bind host
pub const ENV_HOST: &str = "RESEARCH_HOST";
/// Environment variable overriding the bind port
pub const ENV_PORT: &str = "RESEARCH_PORT";
/// Environment variable selecting the latency mode (`report_only` or `enforce`)
pub const ENV_LATENCY_MODE: &str = "RESEARCH_LATENCY_MODE";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Generative backend configuration
    pub llm: LlmConfig,
    /// Simulated latency configuration
    pub latency: LatencyConfig,
}

impl ResearchConfig {
    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Load a TOML file, then overlay environment variables
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid config file '{}': {}", path.display(), e))
        })?;
        config.with_env_overrides()
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            self.llm.base_url = url;
        }
        if let Ok(model) = std::env::var(ENV_MODEL) {
            self.llm.model = model;
        }
        if let Ok(host) = std::env::var(ENV_HOST) {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, port)))?;
        }
        if let Ok(mode) = std::env::var(ENV_LATENCY_MODE) {
            self.latency.mode = LatencyMode::parse(&mode)?;
        }
        Ok(self)
    }

    /// Whether a backend credential is present
    pub fn generative_enabled(&self) -> bool {
        self.llm.has_credential()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Generative backend (OpenAI-compatible) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Bearer credential; absent means fallback-only operation
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Output cap for the main answer
    pub answer_max_tokens: u32,
    /// Sampling temperature for the main answer
    pub answer_temperature: f32,
    /// Output cap for the supporting fragments
    pub fragment_max_tokens: u32,
    /// Sampling temperature for the supporting fragments
    pub fragment_temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 60,
            max_retries: 1,
            answer_max_tokens: 2000,
            answer_temperature: 0.7,  // fuller, more varied prose
            fragment_max_tokens: 800,
            fragment_temperature: 0.5,
        }
    }
}

impl LlmConfig {
    /// True when a non-blank credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Simulated latency configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Whether the simulated latency is only reported or actually waited out
    pub mode: LatencyMode,
}

/// How the tier latency affects the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencyMode {
    /// Record the latency in metadata, respond immediately
    #[default]
    ReportOnly,
    /// Sleep for the simulated latency before responding
    Enforce,
}

impl LatencyMode {
    /// Parse from an environment value
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "report_only" | "report" => Ok(Self::ReportOnly),
            "enforce" => Ok(Self::Enforce),
            other => Err(Error::Config(format!("Unknown latency mode: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResearchConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.latency.mode, LatencyMode::ReportOnly);
        assert!(!config.generative_enabled());
    }

    #[test]
    fn test_blank_key_is_not_a_credential() {
        let mut config = ResearchConfig::default();
        config.llm.api_key = Some("   ".to_string());
        assert!(!config.generative_enabled());

        config.llm.api_key = Some("sk-test".to_string());
        assert!(config.generative_enabled());
    }

    #[test]
    fn test_partial_toml() {
        let config: ResearchConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [llm]
            model = "gpt-4o"
            fragment_temperature = 0.2

            [latency]
            mode = "enforce"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.answer_max_tokens, 2000);
        assert!((config.llm.fragment_temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.latency.mode, LatencyMode::Enforce);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut config = ResearchConfig::default();
        config.llm.api_key = Some("sk-secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn test_latency_mode_parse() {
        assert_eq!(LatencyMode::parse("enforce").unwrap(), LatencyMode::Enforce);
        assert_eq!(LatencyMode::parse("Report_Only").unwrap(), LatencyMode::ReportOnly);
        assert!(LatencyMode::parse("sometimes").is_err());
    }
}
