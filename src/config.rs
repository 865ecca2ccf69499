use std::net::SocketAddr;
use std::path::PathBuf;

use crate::llm::openai::{OpenAiConfig, DEFAULT_BASE_URL};

pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` means every request fails with "Missing API Key".
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub bind_addr: SocketAddr,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub json_logs: bool,
}

impl Config {
    /// Read settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => Self::default().bind_addr,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                key: "MAX_UPLOAD_BYTES",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key: get("API_KEY").or_else(|| get("OPENROUTER_API_KEY")),
            base_url: get("BASE_URL")
                .or_else(|| get("OPENROUTER_API_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bind_addr,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes,
            json_logs: get("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
            ..Self::default()
        })
    }

    /// Upstream settings, if an API key is configured.
    pub fn upstream(&self) -> Option<OpenAiConfig> {
        self.api_key.as_ref().map(|api_key| OpenAiConfig {
            api_key: api_key.clone(),
            base_url: self.base_url.clone(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            json_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.upstream().is_none());
        assert_eq!(config.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.model, "mistralai/mistral-7b-instruct");
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_primary_keys_win_over_fallbacks() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "primary"),
            ("OPENROUTER_API_KEY", "fallback"),
            ("OPENROUTER_API_URL", "http://localhost:9999/v1"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("primary"));
        assert_eq!(config.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_fallback_key_and_empty_values() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "  "),
            ("OPENROUTER_API_KEY", "fallback"),
            ("MODEL", ""),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("fallback"));
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(config.json_logs);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = Config::from_lookup(lookup(&[("MAX_UPLOAD_BYTES", "lots")])).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));

        let err = Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).unwrap_err();
        assert!(err.to_string().contains("BIND_ADDR"));
    }
}
