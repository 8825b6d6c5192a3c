use std::env;

use thiserror::Error;

pub const DEFAULT_DATABASE_NAME: &str = "pets";
pub const DEFAULT_MOUNT_PATH: &str = "/api/pets";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub server_host: String,
    pub server_port: u16,
    pub mount_path: String,
    /// When set, the store creates the `pets` collection on startup.
    pub managed: bool,
}

impl AppConfig {

    pub fn from_env() -> Result<AppConfig, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let server_port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "SERVER_PORT",
                value: value.clone(),
                reason: e.to_string(),
            })?,
            Err(_) => 8080,
        };

        let managed = match env::var("PETS_MANAGED") {
            Ok(value) => parse_bool("PETS_MANAGED", &value)?,
            Err(_) => false,
        };

        Ok(AppConfig {
            database_url,
            database_name: env::var("DATABASE_NAME")
                .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string()),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
            mount_path: normalize_mount_path(
                &env::var("PETS_MOUNT_PATH").unwrap_or_else(|_| DEFAULT_MOUNT_PATH.to_string()),
            ),
            managed,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

// "/" and "" both mean the root scope; otherwise one leading slash, no trailing one.
fn normalize_mount_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
