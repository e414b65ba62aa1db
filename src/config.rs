use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::summarization::client::{ChatCompletionClient, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application-level constants
pub const APP_NAME: &str = "Smart EMR";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_DATABASE_PATH: &str = "instance/emr.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "smart_emr_lib=info,smart_emr=info,tower_http=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the external completion service.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: Option<u64>,
}

impl LlmConfig {
    pub fn build_client(&self) -> ChatCompletionClient {
        let client = ChatCompletionClient::new(&self.base_url, &self.api_key, &self.model);
        match self.timeout_secs {
            Some(secs) => client.with_timeout(secs),
            None => client,
        }
    }
}

// The key never reaches the logs
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Runtime configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    /// `None` when no API key is set; AI endpoints then report the service
    /// as unavailable.
    pub llm: Option<LlmConfig>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_path = get("EMR_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let bind_raw = get("EMR_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                key: "EMR_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let timeout_secs = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: "LLM_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let llm = get("PERPLEXITY_API_KEY")
            .or_else(|| get("LLM_API_KEY"))
            .map(|api_key| LlmConfig {
                api_key: api_key.trim().to_string(),
                base_url: get("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                timeout_secs,
            });

        Ok(Self {
            database_path,
            bind_addr,
            cors_allowed_origins,
            llm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.llm.is_none());
    }

    #[test]
    fn api_key_enables_llm_with_defaults() {
        let config = config_from(&[("PERPLEXITY_API_KEY", "pplx-123")]).unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.api_key, "pplx-123");
        assert_eq!(llm.base_url, DEFAULT_BASE_URL);
        assert_eq!(llm.model, DEFAULT_MODEL);
        assert_eq!(llm.timeout_secs, None);
    }

    #[test]
    fn generic_key_and_overrides() {
        let config = config_from(&[
            ("LLM_API_KEY", "sk-abc"),
            ("LLM_BASE_URL", "https://api.openai.com/v1"),
            ("LLM_MODEL", "gpt-4o-mini"),
            ("LLM_TIMEOUT_SECS", "45"),
        ])
        .unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.timeout_secs, Some(45));
        assert_eq!(llm.build_client().base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn blank_api_key_means_unconfigured() {
        let config = config_from(&[("PERPLEXITY_API_KEY", "   ")]).unwrap();
        assert!(config.llm.is_none());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:5173, https://emr.example.org ,",
        )])
        .unwrap();
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:5173", "https://emr.example.org"]
        );
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = config_from(&[("EMR_BIND_ADDR", "not-an-address")]).unwrap_err();
        assert!(err.to_string().contains("EMR_BIND_ADDR"));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        assert!(config_from(&[("LLM_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = config_from(&[("PERPLEXITY_API_KEY", "pplx-secret")]).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("pplx-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
