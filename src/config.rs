//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Upper bound for multipart bodies (image uploads)
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub require_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "travelbook".to_string(),
            max_pool_size: 10,
            require_tls: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Where uploaded images end up
#[derive(Debug, Clone, PartialEq)]
pub enum UploadConfig {
    /// Files written under `dir`, referenced by generated file name
    Local { dir: PathBuf },
    /// Cloudinary-compatible hosted image service
    Hosted {
        cloud_name: String,
        api_key: String,
        api_secret: String,
    },
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig::Local {
            dir: PathBuf::from("wwwroot/images"),
        }
    }
}

/// SMTP relay used for registration notifications
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
    pub implicit_tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            from_address: "no-reply@travelbook.local".to_string(),
            from_name: "TravelBook".to_string(),
            implicit_tls: false,
        }
    }
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secret: String,
    pub idle_timeout_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "travelbook_session".to_string(),
            secret: "travelbook-dev-secret-change-in-production".to_string(),
            idle_timeout_minutes: 30,
        }
    }
}

/// Administrator account created at startup when missing
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub email: String,
    pub password: String,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub upload: UploadConfig,
    pub smtp: SmtpConfig,
    pub session: SessionConfig,
    pub admin: Option<AdminAccount>,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: env_parse("HOST").unwrap_or_else(|| ServerConfig::default().host),
            port: env_parse("PORT").unwrap_or_else(|| ServerConfig::default().port),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES")
                .unwrap_or_else(|| ServerConfig::default().max_upload_bytes),
        };

        // Try DATABASE_URL first, fall back to individual vars
        let database = if let Ok(database_url) = std::env::var("DATABASE_URL") {
            Self::parse_database_url(&database_url)?
        } else {
            let defaults = DatabaseConfig::default();
            DatabaseConfig {
                host: std::env::var("DB_HOST").unwrap_or(defaults.host),
                port: env_parse("DB_PORT").unwrap_or(defaults.port),
                user: std::env::var("DB_USER").unwrap_or(defaults.user),
                password: std::env::var("DB_PASSWORD").unwrap_or_default(),
                database: std::env::var("DB_NAME").unwrap_or(defaults.database),
                max_pool_size: env_parse("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_pool_size),
                require_tls: env_parse("DB_REQUIRE_TLS").unwrap_or(false),
            }
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let upload = Self::load_upload()?;
        let smtp = Self::load_smtp();
        let session = Self::load_session();
        let admin = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) if !email.trim().is_empty() && !password.is_empty() => {
                Some(AdminAccount {
                    email: email.trim().to_string(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            server,
            database,
            cors,
            upload,
            smtp,
            session,
            admin,
        })
    }

    fn load_upload() -> Result<UploadConfig, ConfigError> {
        let strategy = std::env::var("UPLOAD_STRATEGY").unwrap_or_else(|_| "local".to_string());
        Self::upload_from_parts(
            &strategy,
            std::env::var("UPLOAD_DIR").ok(),
            std::env::var("CLOUDINARY_CLOUD_NAME").ok(),
            std::env::var("CLOUDINARY_API_KEY").ok(),
            std::env::var("CLOUDINARY_API_SECRET").ok(),
        )
    }

    fn upload_from_parts(
        strategy: &str,
        dir: Option<String>,
        cloud_name: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Result<UploadConfig, ConfigError> {
        match strategy.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(UploadConfig::Local {
                dir: dir.map(PathBuf::from).unwrap_or_else(|| match UploadConfig::default() {
                    UploadConfig::Local { dir } => dir,
                    UploadConfig::Hosted { .. } => PathBuf::from("wwwroot/images"),
                }),
            }),
            "hosted" => {
                let require = |value: Option<String>, name: &str| {
                    value
                        .filter(|v| !v.trim().is_empty())
                        .ok_or_else(|| ConfigError::MissingVar(name.to_string()))
                };
                Ok(UploadConfig::Hosted {
                    cloud_name: require(cloud_name, "CLOUDINARY_CLOUD_NAME")?,
                    api_key: require(api_key, "CLOUDINARY_API_KEY")?,
                    api_secret: require(api_secret, "CLOUDINARY_API_SECRET")?,
                })
            }
            other => Err(ConfigError::InvalidValue(format!(
                "UPLOAD_STRATEGY must be 'local' or 'hosted', got '{}'",
                other
            ))),
        }
    }

    fn load_smtp() -> SmtpConfig {
        let defaults = SmtpConfig::default();
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or(defaults.host),
            port: env_parse("SMTP_PORT").unwrap_or(defaults.port),
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_address: std::env::var("SMTP_FROM_ADDRESS").unwrap_or(defaults.from_address),
            from_name: std::env::var("SMTP_FROM_NAME").unwrap_or(defaults.from_name),
            implicit_tls: env_parse("SMTP_IMPLICIT_TLS").unwrap_or(defaults.implicit_tls),
        };
        if smtp.username.is_empty() {
            warn!("SMTP_USERNAME not set, registration emails will likely be rejected");
        }
        smtp
    }

    fn load_session() -> SessionConfig {
        let defaults = SessionConfig::default();
        let secret = std::env::var("SESSION_SECRET").unwrap_or_else(|_| {
            warn!("SESSION_SECRET not set, using default (INSECURE - set in production!)");
            defaults.secret.clone()
        });
        SessionConfig {
            cookie_name: std::env::var("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
            secret,
            idle_timeout_minutes: env_parse("SESSION_IDLE_MINUTES")
                .filter(|m: &i64| *m > 0)
                .unwrap_or(defaults.idle_timeout_minutes),
        }
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue(
                "Invalid DATABASE_URL format (expected postgresql://...)".to_string(),
            )
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let database = parsed.path().trim_start_matches('/').to_string();
        if database.is_empty() {
            return Err(ConfigError::InvalidValue(
                "Missing database name in DATABASE_URL".to_string(),
            ));
        }

        let require_tls = parsed
            .query_pairs()
            .any(|(k, v)| k == "sslmode" && v == "require")
            || env_parse("DB_REQUIRE_TLS").unwrap_or(false);

        Ok(DatabaseConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database,
            max_pool_size: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            require_tls,
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
