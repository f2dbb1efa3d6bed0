//! Shared domain types and calculations for the SiteStock inventory core
//!
//! This crate contains the database-free parts of the stock domain: status
//! and movement enums, stock-health tiering, capacity math, and consumption
//! analytics. The backend binds these to SQL; tests exercise them directly.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
