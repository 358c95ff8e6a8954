//! Configuration module
//!
//! Settings load from a TOML file (default `~/.config/labdesk/config.toml`,
//! overridable via `LABDESK_CONFIG`). Every section has workable defaults
//! so the service starts with no file at all.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub kiosk: KioskConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// HTTP server binding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
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
pub struct DatabaseSettings {
    /// SeaORM connection URL
    pub url: String,
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        std::env::var("DATABASE_URL").unwrap_or_else(|_| self.url.clone())
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./labdesk.db?mode=rwc".to_string(),
        }
    }
}

/// Token verification settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Secret shared with the campus identity provider
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            jwt_issuer: "campus-identity".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

/// Kiosk integration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Label recorded when a kiosk does not identify itself
    pub default_label: String,
    /// Base URL encoded into QR scan-url links
    pub public_base_url: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            default_label: "Tablet Kiosk".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing env-filter directive, e.g. "info" or "labdesk=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Default config file location: `<config dir>/labdesk/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("labdesk")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.address(), "0.0.0.0:8080");
        assert_eq!(cfg.kiosk.default_label, "Tablet Kiosk");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [kiosk]
            public_base_url = "https://labs.example.edu"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.kiosk.public_base_url, "https://labs.example.edu");
        assert_eq!(cfg.kiosk.default_label, "Tablet Kiosk");
    }
}
