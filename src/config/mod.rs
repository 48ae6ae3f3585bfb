use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub triage: TriageConfig,
    pub enrichment: EnrichmentConfig,
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

        let daily_accept_limit = env::var("APP_DAILY_ACCEPT_LIMIT")
            .unwrap_or_else(|_| TriageConfig::DEFAULT_DAILY_ACCEPT_LIMIT.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidDailyAcceptLimit)?;
        if daily_accept_limit == 0 {
            return Err(ConfigError::InvalidDailyAcceptLimit);
        }

        let staleness_hours = env::var("APP_ENRICHMENT_STALENESS_HOURS")
            .unwrap_or_else(|_| EnrichmentConfig::DEFAULT_STALENESS_HOURS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|hours| *hours > 0)
            .ok_or(ConfigError::InvalidStalenessWindow)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            triage: TriageConfig { daily_accept_limit },
            enrichment: EnrichmentConfig { staleness_hours },
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

/// Dials for the daily triage workflow.
#[derive(Debug, Clone, Copy)]
pub struct TriageConfig {
    pub daily_accept_limit: u32,
}

impl TriageConfig {
    pub const DEFAULT_DAILY_ACCEPT_LIMIT: u32 = 25;
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            daily_accept_limit: Self::DEFAULT_DAILY_ACCEPT_LIMIT,
        }
    }
}

/// Controls for the enrichment cache refresh window.
#[derive(Debug, Clone, Copy)]
pub struct EnrichmentConfig {
    pub staleness_hours: i64,
}

impl EnrichmentConfig {
    pub const DEFAULT_STALENESS_HOURS: i64 = 24 * 7;

    pub fn staleness(&self) -> chrono::Duration {
        chrono::Duration::hours(self.staleness_hours)
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            staleness_hours: Self::DEFAULT_STALENESS_HOURS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidDailyAcceptLimit,
    InvalidStalenessWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDailyAcceptLimit => {
                write!(f, "APP_DAILY_ACCEPT_LIMIT must be a positive integer")
            }
            ConfigError::InvalidStalenessWindow => {
                write!(
                    f,
                    "APP_ENRICHMENT_STALENESS_HOURS must be a positive number of hours"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
