pub mod charts;
pub mod json;
pub mod text_report;

pub use charts::{Chart, ChartKind};
