//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Outgoing mail configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// One-time password configuration.
    #[serde(default)]
    pub otp: OtpConfig,
    /// Recommendation service configuration.
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// SMTP configuration for the OTP mailer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_username: String,
    /// SMTP password (an app password for hosted providers).
    pub smtp_password: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "no-reply@mudra.local".to_string(),
            from_name: "Mudra-Plan".to_string(),
        }
    }
}

/// One-time password configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// How long an issued code stays valid, in seconds.
    pub ttl_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

/// Recommendation (advisor) service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Base URL, without a trailing `/api`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Listen address of the stand-alone advisor binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AdvisorServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_advisor_port")]
    pub port: u16,
}

fn default_advisor_port() -> u16 {
    8000
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `MUDRA__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("MUDRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl AdvisorServerConfig {
    /// Loads the advisor listen address from `MUDRA_ADVISOR__HOST` / `MUDRA_ADVISOR__PORT`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("MUDRA_ADVISOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("MUDRA__DATABASE__URL", Some("postgres://u:p@db:5432/mudra")),
                ("MUDRA__JWT__SECRET", Some("s3cret")),
                ("MUDRA__SERVER__PORT", Some("9090")),
                ("MUDRA__ADVISOR__BASE_URL", Some("http://ai_service:8000")),
            ],
            || {
                let config = AppConfig::load().unwrap();

                assert_eq!(config.database.url, "postgres://u:p@db:5432/mudra");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.jwt.secret, "s3cret");
                assert_eq!(config.jwt.access_token_expiry_secs, 3600);
                assert_eq!(config.server.host, "0.0.0.0");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.otp.ttl_secs, 600);
                assert_eq!(config.advisor.base_url, "http://ai_service:8000");
                assert_eq!(config.advisor.timeout_secs, 10);
            },
        );
    }

    #[test]
    fn test_load_requires_database_url() {
        temp_env::with_vars(
            [
                ("MUDRA__DATABASE__URL", None::<&str>),
                ("MUDRA__JWT__SECRET", Some("s3cret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_email_config_default() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert_eq!(config.from_name, "Mudra-Plan");
    }

    #[test]
    fn test_advisor_server_defaults() {
        temp_env::with_vars(
            [
                ("MUDRA_ADVISOR__HOST", None::<&str>),
                ("MUDRA_ADVISOR__PORT", Some("8123")),
            ],
            || {
                let config = AdvisorServerConfig::load().unwrap();
                assert_eq!(config.host, "0.0.0.0");
                assert_eq!(config.port, 8123);
            },
        );
    }
}
