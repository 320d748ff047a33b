//! Runtime configuration read from the environment (and `.env` via dotenv).

use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Which implementation backs the sentiment and emotion model handles.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// Built-in keyword classifiers, no network access.
    Keyword,
    /// HTTP inference endpoints, one per model.
    Remote {
        sentiment_url: String,
        emotion_url: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub static_dir: String,
    pub backend: ClassifierBackend,
    pub classifier_timeout: Duration,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_str = var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_addr: SocketAddr = bind_str
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid BIND_ADDR: {}", bind_str)))?;

        let timeout_secs: u64 = match var("CLASSIFIER_TIMEOUT_SECS") {
            Some(s) => s
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid CLASSIFIER_TIMEOUT_SECS: {}", s)))?,
            None => 30,
        };

        let backend_str = var("CLASSIFIER_BACKEND").unwrap_or_else(|| "keyword".to_string());
        let backend = match backend_str.to_lowercase().as_str() {
            "keyword" => ClassifierBackend::Keyword,
            "remote" => {
                let sentiment_url = var("SENTIMENT_MODEL_URL").ok_or_else(|| {
                    AppError::Config("SENTIMENT_MODEL_URL must be set for the remote backend".into())
                })?;
                let emotion_url = var("EMOTION_MODEL_URL").ok_or_else(|| {
                    AppError::Config("EMOTION_MODEL_URL must be set for the remote backend".into())
                })?;
                ClassifierBackend::Remote {
                    sentiment_url,
                    emotion_url,
                }
            }
            other => {
                return Err(AppError::Config(format!(
                    "Unknown CLASSIFIER_BACKEND '{}' (expected keyword or remote)",
                    other
                )))
            }
        };

        Ok(Self {
            bind_addr,
            static_dir: var("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            backend,
            classifier_timeout: Duration::from_secs(timeout_secs),
            log_level: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
