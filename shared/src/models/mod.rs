//! Domain models for the SiteStock inventory core

mod alert;
mod analytics;
mod item;
mod location;
mod supplier;
mod transaction;

pub use alert::*;
pub use analytics::*;
pub use item::*;
pub use location::*;
pub use supplier::*;
pub use transaction::*;
