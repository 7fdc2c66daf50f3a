pub mod models;
pub mod presenters;
pub mod repositories;
pub mod services;

pub use models::SalesReport;
pub use repositories::{ReportRepository, SqliteReportRepository};
pub use services::ReportService;
