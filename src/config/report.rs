use crate::core::{AppError, DateRange, Result};
use std::env;
use std::path::PathBuf;

/// Report window and presentation settings
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub range: DateRange,
    /// Rows in the top products chart
    pub top_products: u32,
    /// Where to save the SVG charts; `None` skips them
    pub chart_dir: Option<PathBuf>,
    /// Where to save the JSON copy of the report, if anywhere
    pub json_path: Option<PathBuf>,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        let from = env::var("REPORT_FROM_DATE").unwrap_or_else(|_| "2025-01-01".to_string());
        let to = env::var("REPORT_TO_DATE").unwrap_or_else(|_| "2025-12-31".to_string());

        Ok(ReportConfig {
            range: DateRange::parse(&from, &to)
                .map_err(|e| AppError::Configuration(format!("Invalid report range: {}", e)))?,
            top_products: env::var("REPORT_TOP_PRODUCTS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| AppError::Configuration("Invalid REPORT_TOP_PRODUCTS".to_string()))?,
            chart_dir: optional_path(
                &env::var("REPORT_CHART_DIR").unwrap_or_else(|_| "charts".to_string()),
            ),
            json_path: env::var("REPORT_JSON_PATH")
                .ok()
                .and_then(|p| optional_path(&p)),
        })
    }
}

/// Blank values switch the output off
fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}
