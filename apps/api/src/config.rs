use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_BASE_URL;
use crate::session::registry::DEFAULT_IDLE_TTL_SECS;

/// Where checklist completion state is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionBackend {
    Postgres { database_url: String },
    Redis { redis_url: String },
    Memory,
    /// Persistence disabled.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Postgres,
    Redis,
    Memory,
    None,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(BackendKind::Postgres),
            "redis" => Ok(BackendKind::Redis),
            "memory" => Ok(BackendKind::Memory),
            "none" => Ok(BackendKind::None),
            other => bail!("COMPLETION_STORE must be one of postgres, redis, memory, none (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub completion_backend: CompletionBackend,
    pub port: u16,
    pub rust_log: String,
    /// Sessions untouched for this long are evicted.
    pub session_idle_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let llm_api_key = require("GEMINI_API_KEY").or_else(|_| {
            require("REACT_APP_GEMINI_API_KEY")
                .context("Required environment variable 'GEMINI_API_KEY' is not set")
        })?;

        let kind: BackendKind = lookup("COMPLETION_STORE")
            .unwrap_or_else(|| "memory".to_string())
            .parse()?;
        let completion_backend = match kind {
            BackendKind::Postgres => CompletionBackend::Postgres {
                database_url: require("DATABASE_URL")?,
            },
            BackendKind::Redis => CompletionBackend::Redis {
                redis_url: require("REDIS_URL")?,
            },
            BackendKind::Memory => CompletionBackend::Memory,
            BackendKind::None => CompletionBackend::None,
        };

        Ok(Config {
            llm_api_key,
            llm_base_url: lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            completion_backend,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_idle_ttl_secs: match lookup("SESSION_IDLE_TTL_SECS") {
                Some(raw) => raw
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .context("SESSION_IDLE_TTL_SECS must be a positive number of seconds")?,
                None => DEFAULT_IDLE_TTL_SECS,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("GEMINI_API_KEY", "k")]).unwrap();
        assert_eq!(config.completion_backend, CompletionBackend::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.llm_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.session_idle_ttl_secs, DEFAULT_IDLE_TTL_SECS);
    }

    #[test]
    fn test_missing_api_key_fails() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_legacy_api_key_name_is_accepted() {
        let config = config_from(&[("REACT_APP_GEMINI_API_KEY", "legacy")]).unwrap();
        assert_eq!(config.llm_api_key, "legacy");
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        assert!(config_from(&[("GEMINI_API_KEY", "k"), ("COMPLETION_STORE", "postgres")]).is_err());
        let config = config_from(&[
            ("GEMINI_API_KEY", "k"),
            ("COMPLETION_STORE", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/advisor"),
        ])
        .unwrap();
        assert_eq!(
            config.completion_backend,
            CompletionBackend::Postgres {
                database_url: "postgres://localhost/advisor".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(config_from(&[("GEMINI_API_KEY", "k"), ("COMPLETION_STORE", "firestore")]).is_err());
    }

    #[test]
    fn test_session_idle_ttl() {
        let config = config_from(&[("GEMINI_API_KEY", "k"), ("SESSION_IDLE_TTL_SECS", "900")]).unwrap();
        assert_eq!(config.session_idle_ttl_secs, 900);
        assert!(config_from(&[("GEMINI_API_KEY", "k"), ("SESSION_IDLE_TTL_SECS", "0")]).is_err());
        assert!(config_from(&[("GEMINI_API_KEY", "k"), ("SESSION_IDLE_TTL_SECS", "soon")]).is_err());
    }

    #[test]
    fn test_bad_port_is_rejected() {
        assert!(config_from(&[("GEMINI_API_KEY", "k"), ("PORT", "eighty")]).is_err());
    }
}
