pub mod connection;
pub mod date_range;
pub mod error;
pub mod money;

pub use connection::SalesConnection;
pub use date_range::DateRange;
pub use error::{AppError, Result};
