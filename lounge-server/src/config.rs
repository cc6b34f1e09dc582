//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Address to listen on (default `127.0.0.1:3000`).
pub const BIND_VAR: &str = "LOUNGE_BIND";

/// SQLite database URL; unset keeps reservations in memory.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Directory served under `/static` (default `static`).
pub const STATIC_DIR_VAR: &str = "LOUNGE_STATIC_DIR";

/// Errors from reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value:?}")]
    InvalidBind { var: &'static str, value: String },

    #[error("{var} must be a sqlite:// URL, got {value:?}")]
    UnsupportedDatabase { var: &'static str, value: String },
}

/// Where reservations are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(String),
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backend: StoreBackend,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            backend: StoreBackend::Memory,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = get(BIND_VAR) {
            config.bind = value.parse().map_err(|_| ConfigError::InvalidBind {
                var: BIND_VAR,
                value: value.clone(),
            })?;
        }

        if let Some(url) = get(DATABASE_URL_VAR) {
            if !url.starts_with("sqlite:") {
                return Err(ConfigError::UnsupportedDatabase {
                    var: DATABASE_URL_VAR,
                    value: url,
                });
            }
            config.backend = StoreBackend::Sqlite(url);
        }

        if let Some(dir) = get(STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(dir);
        }

        Ok(config)
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
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("LOUNGE_BIND", "0.0.0.0:8080"),
            ("DATABASE_URL", "sqlite://lounge.db"),
            ("LOUNGE_STATIC_DIR", "/srv/lounge/static"),
        ]))
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(
            config.backend,
            StoreBackend::Sqlite("sqlite://lounge.db".into())
        );
        assert_eq!(config.static_dir, PathBuf::from("/srv/lounge/static"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.backend, StoreBackend::Memory);
    }

    #[test]
    fn rejects_bad_bind() {
        let err = ServerConfig::from_lookup(lookup(&[("LOUNGE_BIND", "localhost")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "LOUNGE_BIND is not a socket address: \"localhost\""
        );
    }

    #[test]
    fn rejects_other_databases() {
        let err = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://db/lounge")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDatabase { .. }));
    }
}
