//! HTTP handlers for the SiteStock inventory core

pub mod alert;
pub mod assignment;
pub mod health;
pub mod item;
pub mod location;
pub mod statistics;
pub mod supplier;
pub mod transaction;

pub use alert::*;
pub use assignment::*;
pub use health::*;
pub use item::*;
pub use location::*;
pub use statistics::*;
pub use supplier::*;
pub use transaction::*;

use crate::error::{AppError, AppResult};

/// Deserialize a JSON body into a typed input, mapping failures to a 400
/// instead of the framework's default rejection.
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::ValidationError(format!("Invalid request body: {}", e)))
}

/// Simple confirmation payload for delete-style operations
#[derive(Debug, serde::Serialize)]
pub struct StatusMessage {
    pub message: String,
}
