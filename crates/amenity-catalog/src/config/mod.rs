use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::catalog::CategoryId;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_category = env::var("APP_DEFAULT_AMENITY_CATEGORY")
            .unwrap_or_else(|_| "1".to_string())
            .trim()
            .parse::<u64>()
            .map(CategoryId)
            .map_err(|_| ConfigError::InvalidDefaultCategory)?;
        let seed_path = env::var("APP_CATALOG_SEED")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let api_tokens = parse_api_tokens(&env::var("APP_API_TOKENS").unwrap_or_default())?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            catalog: CatalogConfig {
                default_category,
                seed_path,
            },
            auth: AuthConfig { api_tokens },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Catalog bootstrap settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Category that receives user-submitted amenities.
    pub default_category: CategoryId,
    pub seed_path: Option<PathBuf>,
}

/// Static bearer tokens, token -> user id.
#[derive(Clone, Default)]
pub struct AuthConfig {
    pub api_tokens: BTreeMap<String, String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_tokens", &self.api_tokens.len())
            .finish()
    }
}

/// Parses `token=user,token2=user2`.
fn parse_api_tokens(raw: &str) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut tokens = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (token, user) = entry
            .split_once('=')
            .map(|(token, user)| (token.trim(), user.trim()))
            .filter(|(token, user)| !token.is_empty() && !user.is_empty())
            .ok_or(ConfigError::InvalidApiTokens)?;
        tokens.insert(token.to_string(), user.to_string());
    }
    Ok(tokens)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDefaultCategory,
    InvalidApiTokens,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDefaultCategory => {
                write!(f, "APP_DEFAULT_AMENITY_CATEGORY must be a numeric category id")
            }
            ConfigError::InvalidApiTokens => {
                write!(f, "APP_API_TOKENS must be a comma separated list of token=user pairs")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidDefaultCategory
            | ConfigError::InvalidApiTokens => None,
        }
    }
}
