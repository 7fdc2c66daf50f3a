use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;

pub mod database;
pub mod report;

pub use database::DatabaseConfig;
pub use report::ReportConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(AppError::Configuration(format!("Invalid LOG_FORMAT: '{}'", s))),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "text".to_string())
                    .parse()?,
            },
            database: DatabaseConfig::from_env()?,
            report: ReportConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(AppError::Configuration(
                "SALES_DB_PATH must not be empty".to_string(),
            ));
        }

        if self.report.top_products == 0 {
            return Err(AppError::Configuration(
                "Top products limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
