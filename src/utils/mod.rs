pub mod errors;
pub mod config;

pub use errors::{ApiError, ValidationErrors};
pub use config::{AppConfig, ConfigError};
