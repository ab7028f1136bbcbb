use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_INDRA_API_URL: &str = "https://discovery.indra.bio/api/get_variants_for_gene";

/// Runtime configuration, read once at process start.
///
/// `PORT` selects the transport: when set the server binds an HTTP listener,
/// otherwise it runs the stdio protocol loop.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub bind_addr: String,
    pub indra_api_url: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("INDRA_API_URL must not be empty")]
    EmptyApiUrl,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string());

        let indra_api_url = match env::var("INDRA_API_URL") {
            Ok(value) => {
                let value = value.trim().to_string();
                if value.is_empty() {
                    return Err(ConfigError::EmptyApiUrl);
                }
                value
            }
            Err(_) => DEFAULT_INDRA_API_URL.to_string(),
        };

        let config = Self {
            port,
            bind_addr,
            indra_api_url,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    /// The HTTP bind socket, or `None` when the stdio transport is selected.
    pub fn bind_socket(&self) -> Result<Option<SocketAddr>, ConfigError> {
        let Some(port) = self.port else {
            return Ok(None);
        };

        format!("{}:{}", self.bind_addr, port)
            .parse::<SocketAddr>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // Environment variables are process-global; serialize tests that touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn parse_defaults_to_stdio_transport() {
        let _guard = lock_env();
        env::remove_var("PORT");
        env::remove_var("BIND_ADDR");
        env::remove_var("INDRA_API_URL");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.port, None);
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.indra_api_url, DEFAULT_INDRA_API_URL);
        assert!(config.bind_socket().expect("socket").is_none());
    }

    #[test]
    fn port_selects_http_transport() {
        let _guard = lock_env();
        env::set_var("PORT", "8080");
        env::remove_var("BIND_ADDR");
        env::remove_var("INDRA_API_URL");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.port, Some(8080));
        assert_eq!(
            config.bind_socket().expect("socket"),
            Some("0.0.0.0:8080".parse().expect("valid socket"))
        );

        env::remove_var("PORT");
    }

    #[test]
    fn invalid_port_fails() {
        let _guard = lock_env();
        env::set_var("PORT", "not-a-port");
        env::remove_var("INDRA_API_URL");

        let err = Config::from_env().expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));

        env::remove_var("PORT");
    }

    #[test]
    fn api_url_override_is_honored() {
        let _guard = lock_env();
        env::remove_var("PORT");
        env::set_var("INDRA_API_URL", "http://127.0.0.1:9999/api");

        let config = Config::from_env().expect("config should parse");
        assert_eq!(config.indra_api_url, "http://127.0.0.1:9999/api");

        env::remove_var("INDRA_API_URL");
    }

    #[test]
    fn empty_api_url_fails() {
        let _guard = lock_env();
        env::remove_var("PORT");
        env::set_var("INDRA_API_URL", "   ");

        let err = Config::from_env().expect_err("expected empty url error");
        assert!(matches!(err, ConfigError::EmptyApiUrl));

        env::remove_var("INDRA_API_URL");
    }
}
