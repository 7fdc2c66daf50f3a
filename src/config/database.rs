use crate::core::{AppError, Result, SalesConnection};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub read_only: bool,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(DatabaseConfig {
            path: env::var("SALES_DB_PATH")
                .unwrap_or_else(|_| "linisco.db".to_string())
                .into(),
            read_only: parse_bool(
                "SALES_DB_READ_ONLY",
                &env::var("SALES_DB_READ_ONLY").unwrap_or_else(|_| "true".to_string()),
            )?,
        })
    }

    /// Open the single connection used for the whole session
    pub async fn open(&self) -> Result<SalesConnection> {
        SalesConnection::open_with(&self.path, self.read_only).await
    }
}

pub(crate) fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Configuration(format!("Invalid {}: '{}'", name, value))),
    }
}
