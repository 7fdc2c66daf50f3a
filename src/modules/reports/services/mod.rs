pub mod report_service;

pub use report_service::{ReportService, DEFAULT_TOP_PRODUCTS, REPORT_TOP_PRODUCTS};
