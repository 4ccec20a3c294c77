//! Configuration module
//!
//! Reads a TOML configuration file (default:
//! `~/.config/evcharge-service/config.toml`, overridable via the
//! `EVCHARGE_CONFIG` environment variable). Every section has working
//! defaults so the service can start with no file at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::application::services::BookingConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub admin: AdminBootstrap,
    pub booking: BookingSection,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Connection URL; `DATABASE_URL` wins if set
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/ev_charging_db".to_string(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }
}

/// JWT settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secret-key-change-in-production".to_string()),
            jwt_expiration_hours: 24,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter, e.g. `info` or `evcharge=debug,info`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Bootstrap admin account created on first start
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminBootstrap {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminBootstrap {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "change-me-immediately".to_string(),
        }
    }
}

/// Booking flow tunables
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingSection {
    /// Assumed charging power in kW for energy estimates
    pub charge_rate_kw: i32,
    /// Customer cancellation grace period after the start time
    pub cancellation_grace_minutes: i64,
}

impl Default for BookingSection {
    fn default() -> Self {
        Self {
            charge_rate_kw: 50,
            cancellation_grace_minutes: 5,
        }
    }
}

impl From<&BookingSection> for BookingConfig {
    fn from(s: &BookingSection) -> Self {
        Self {
            charge_rate_kw: s.charge_rate_kw,
            cancellation_grace_minutes: s.cancellation_grace_minutes,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        toml::from_str(&contents).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
    }
}

/// Default configuration file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("evcharge-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.booking.charge_rate_kw, 50);
        assert_eq!(cfg.booking.cancellation_grace_minutes, 5);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [booking]
            charge_rate_kw = 22
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.booking.charge_rate_kw, 22);
        assert_eq!(cfg.booking.cancellation_grace_minutes, 5);
    }
}
