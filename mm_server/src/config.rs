//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::net::SocketAddr;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter bind address; metrics are disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Tournament defaults
    pub tournament: TournamentDefaults,
}

/// Default tournament configuration
#[derive(Debug, Clone)]
pub struct TournamentDefaults {
    /// Display name of the bracket stage
    pub stage_name: String,
    /// Players required in the lobby before a tournament may start
    pub min_participants: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// CLI overrides (from `pico-args`) win over the environment; anything
    /// unset falls back to a default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a set variable fails to parse.
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_env_addr("SERVER_BIND")?.unwrap_or_else(default_bind),
        };

        let metrics_bind = match metrics_bind_override {
            Some(addr) => Some(addr),
            None => parse_env_addr("METRICS_BIND")?,
        };

        let tournament = TournamentDefaults {
            stage_name: std::env::var("STAGE_NAME").unwrap_or_else(|_| "Main".to_string()),
            min_participants: parse_env_or("MIN_PARTICIPANTS", 2)?,
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            tournament,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tournament.min_participants < 2 {
            return Err(ConfigError::Invalid {
                var: "MIN_PARTICIPANTS".to_string(),
                reason: "Must be at least 2 (a bracket needs two players)".to_string(),
            });
        }

        if self.tournament.stage_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                var: "STAGE_NAME".to_string(),
                reason: "Must not be blank".to_string(),
            });
        }

        Ok(())
    }
}

fn default_bind() -> SocketAddr {
    // Loopback only unless configured otherwise.
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an optional socket address variable
fn parse_env_addr(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("'{raw}' is not a valid IP:PORT address"),
            }),
        Err(_) => Ok(None),
    }
}

/// Helper to parse an environment variable with a default fallback
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("'{raw}' failed to parse"),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ServerConfig {
        ServerConfig {
            bind: "127.0.0.1:5000".parse().unwrap(),
            metrics_bind: None,
            tournament: TournamentDefaults {
                stage_name: "Main".to_string(),
                min_participants: 2,
            },
        }
    }

    #[test]
    fn test_valid_config_passes_validation() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_min_participants_below_two_is_rejected() {
        let mut config = base_config();
        config.tournament.min_participants = 1;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("MIN_PARTICIPANTS"));
    }

    #[test]
    fn test_blank_stage_name_is_rejected() {
        let mut config = base_config();
        config.tournament.stage_name = "   ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("STAGE_NAME"));
    }

    #[test]
    fn test_cli_override_wins() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        let config = ServerConfig::from_env(Some(addr), None).unwrap();
        assert_eq!(config.bind, addr);
    }
}
