use serde::Serialize;

use crate::core::Result;

/// Pretty JSON for any result set, for handing to an external charting tool
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
