//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::auth::SessionDuration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Which session strategy guards the API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// In-memory sessions that never expire
    #[serde(alias = "session_auth")]
    Basic,
    /// In-memory sessions with a time-to-live
    #[serde(alias = "session_exp_auth")]
    Expiring,
    /// Sessions persisted to the data directory
    #[default]
    #[serde(alias = "session_db_auth")]
    Durable,
}

/// Session authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Name of the cookie carrying the session id
    #[serde(default = "default_session_name")]
    pub session_name: String,

    /// Session lifetime in seconds. Kept as text so an interpolated
    /// environment value that is not a number still loads.
    #[serde(default = "default_session_duration")]
    pub session_duration: String,

    /// Paths that skip authentication; a trailing `*` matches any suffix
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
}

fn default_session_name() -> String {
    "_my_session_id".to_string()
}

fn default_session_duration() -> String {
    "0".to_string()
}

fn default_excluded_paths() -> Vec<String> {
    vec![
        "/api/v1/status/".to_string(),
        "/api/v1/unauthorized/".to_string(),
        "/api/v1/forbidden/".to_string(),
        "/api/v1/auth_session/login/".to_string(),
    ]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            session_name: default_session_name(),
            session_duration: default_session_duration(),
            excluded_paths: default_excluded_paths(),
        }
    }
}

impl AuthConfig {
    /// Parsed session duration; anything unparsable falls back to "never expire"
    pub fn duration(&self) -> SessionDuration {
        SessionDuration::parse(&self.session_duration).unwrap_or_else(|e| {
            tracing::warn!("{}, sessions will not expire", e);
            SessionDuration::default()
        })
    }
}

/// Where users and durable sessions are stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// File holding user records
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join("users.json")
    }

    /// File holding durable session records
    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join("user_sessions.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.session_name, "_my_session_id");
        assert_eq!(config.auth.strategy, StrategyKind::Durable);
        assert_eq!(config.auth.duration(), SessionDuration::default());
        assert_eq!(config.auth.excluded_paths.len(), 4);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[auth]
strategy = "expiring"
session_duration = "60"
"#,
        )
        .unwrap();
        assert_eq!(config.auth.strategy, StrategyKind::Expiring);
        assert_eq!(config.auth.duration(), SessionDuration::from_secs(60));
        assert_eq!(config.auth.session_name, "_my_session_id");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_legacy_strategy_names() {
        for (name, expected) in [
            ("session_auth", StrategyKind::Basic),
            ("session_exp_auth", StrategyKind::Expiring),
            ("session_db_auth", StrategyKind::Durable),
        ] {
            let config: Config =
                toml::from_str(&format!("[auth]\nstrategy = \"{}\"\n", name)).unwrap();
            assert_eq!(config.auth.strategy, expected);
        }
        let serialized = toml::to_string(&Config::default()).unwrap();
        assert!(serialized.contains("strategy = \"durable\""));
    }

    #[test]
    fn test_unparsable_duration_defaults_to_zero() {
        let auth = AuthConfig {
            session_duration: "soon".to_string(),
            ..AuthConfig::default()
        };
        assert!(auth.duration().never_expires());
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/tmp/sg"),
        };
        assert_eq!(storage.users_path(), PathBuf::from("/tmp/sg/users.json"));
        assert_eq!(
            storage.sessions_path(),
            PathBuf::from("/tmp/sg/user_sessions.json")
        );
    }
}
