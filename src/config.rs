use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_LOG_PATH: &str = "./requests.log";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SAMPLE_DELAY_MS: u64 = 2000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    OpenAi,
    Sample,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    // not validated, a missing key goes out as an empty bearer token
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub system_prompt_enabled: bool,
    pub backend: Backend,
    pub sample_delay: Duration,
    pub upstream_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub log_path: PathBuf,
}

impl RelayConfig {

    pub fn from_env() -> Result<Self, ConfigError> {

        Self::from_lookup(|key| std::env::var(key).ok())

    }

    // any key lookup works, tests pass a map instead of the real env
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {

        // treat blank values the same as unset ones
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OPENAI_API_KEY");

        let base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = get("RELAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let system_prompt_enabled = match get("RELAY_SYSTEM_PROMPT") {
            Some(value) => parse_bool("RELAY_SYSTEM_PROMPT", &value)?,
            None => true,
        };

        let backend = match get("RELAY_BACKEND").map(|v| v.to_lowercase()) {
            None => Backend::OpenAi,
            Some(v) if v == "openai" => Backend::OpenAi,
            Some(v) if v == "sample" => Backend::Sample,
            Some(v) => {
                return Err(ConfigError::Invalid {
                    key: "RELAY_BACKEND",
                    value: v,
                    reason: "expected \"openai\" or \"sample\"".to_string(),
                });
            }
        };

        let sample_delay = Duration::from_millis(
            parse_u64("SAMPLE_DELAY_MS", get("SAMPLE_DELAY_MS"))?.unwrap_or(DEFAULT_SAMPLE_DELAY_MS),
        );

        let upstream_timeout = Duration::from_secs(
            parse_u64("UPSTREAM_TIMEOUT_SECS", get("UPSTREAM_TIMEOUT_SECS"))?.unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let log_path = PathBuf::from(get("LOG_PATH").unwrap_or_else(|| DEFAULT_LOG_PATH.to_string()));

        Ok(RelayConfig {
            api_key,
            base_url,
            model,
            system_prompt_enabled,
            backend,
            sample_delay,
            upstream_timeout,
            bind_addr,
            log_path,
        })

    }

    pub fn completions_url(&self) -> String {

        format!("{}/chat/completions", self.base_url)

    }

}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {

    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }

}

fn parse_u64(key: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {

    value
        .map(|v| {
            v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key,
                value: v.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()

}

#[cfg(test)]
mod tests {

    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<RelayConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RelayConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {

        let config = config_from(&[]).expect("defaults should parse");

        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.completions_url(), "https://api.openai.com/v1/chat/completions");
        assert!(config.system_prompt_enabled);
        assert_eq!(config.backend, Backend::OpenAi);
        assert_eq!(config.upstream_timeout, Duration::from_secs(60));
        assert_eq!(config.sample_delay, Duration::from_millis(2000));
        assert_eq!(config.bind_addr.port(), 3000);

    }

    #[test]
    fn test_overrides_are_applied() {

        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:9999/v1/"),
            ("RELAY_MODEL", "gpt-3.5-turbo"),
            ("RELAY_SYSTEM_PROMPT", "off"),
            ("RELAY_BACKEND", "Sample"),
            ("SAMPLE_DELAY_MS", "0"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .expect("overrides should parse");

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.completions_url(), "http://127.0.0.1:9999/v1/chat/completions");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert!(!config.system_prompt_enabled);
        assert_eq!(config.backend, Backend::Sample);
        assert_eq!(config.sample_delay, Duration::ZERO);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");

    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {

        let config = config_from(&[("OPENAI_API_KEY", "   ")]).expect("should parse");
        assert!(config.api_key.is_none());

    }

    #[test]
    fn test_invalid_values_are_rejected() {

        assert!(config_from(&[("UPSTREAM_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("RELAY_BACKEND", "redis")]).is_err());
        assert!(config_from(&[("RELAY_SYSTEM_PROMPT", "maybe")]).is_err());
        assert!(config_from(&[("BIND_ADDR", "not-an-addr")]).is_err());

    }

}
