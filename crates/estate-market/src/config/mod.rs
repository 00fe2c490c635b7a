use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::marketplace::policy::Role;

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
    pub auth: AuthConfig,
    pub marketplace: MarketplaceConfig,
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

        let token_secret =
            env::var("APP_TOKEN_SECRET").unwrap_or_else(|_| "insecure-dev-secret".to_string());
        let access_ttl_secs = env::var("APP_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidTokenTtl)?;

        let default_role_raw = env::var("APP_DEFAULT_ROLE").unwrap_or_else(|_| "buyer".to_string());
        let default_role = Role::parse(&default_role_raw)
            .filter(|role| *role != Role::Superadmin)
            .ok_or(ConfigError::InvalidDefaultRole {
                value: default_role_raw,
            })?;

        let superadmin = match (
            env::var("APP_SUPERADMIN_EMAIL").ok(),
            env::var("APP_SUPERADMIN_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) => Some(SuperadminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                token_secret,
                access_ttl_secs,
            },
            marketplace: MarketplaceConfig {
                default_role,
                superadmin,
            },
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

/// Token signing controls for the bearer-token provider.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token_secret: String,
    pub access_ttl_secs: u64,
}

/// Marketplace policy dials.
///
/// The default role is an explicit configuration value rather than a
/// model-level implicit, so tests can assert it without relying on
/// framework defaulting.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub default_role: Role,
    pub superadmin: Option<SuperadminSeed>,
}

/// Credentials for the superadmin account seeded at startup.
#[derive(Debug, Clone)]
pub struct SuperadminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTokenTtl,
    InvalidDefaultRole { value: String },
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTokenTtl => {
                write!(f, "APP_TOKEN_TTL_SECS must be a positive integer")
            }
            ConfigError::InvalidDefaultRole { value } => {
                write!(
                    f,
                    "APP_DEFAULT_ROLE '{}' must be one of: admin, seller, buyer",
                    value
                )
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidTokenTtl
            | ConfigError::InvalidDefaultRole { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
