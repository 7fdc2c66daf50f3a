//! Sales report engine
//!
//! Read-only aggregation queries over a franchise sales database (SQLite),
//! a console report assembled from them, and chart-ready series.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use crate::core::{AppError, DateRange, Result, SalesConnection};
pub use modules::reports;
pub use modules::reports::{ReportService, SalesReport, SqliteReportRepository};

/// Open `path` read-only and wrap it in a ready-to-use report service
pub async fn open_report_service(
    path: impl AsRef<std::path::Path>,
) -> Result<ReportService<SqliteReportRepository>> {
    let conn = SalesConnection::open(path).await?;
    Ok(ReportService::new(SqliteReportRepository::new(conn)))
}
