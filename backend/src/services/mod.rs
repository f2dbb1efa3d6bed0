//! Business logic services for the SiteStock inventory core

pub mod alert;
pub mod analytics;
pub mod assignment;
pub mod catalog;
pub mod ledger;
pub mod location;
pub mod supplier;

pub use alert::AlertService;
pub use analytics::AnalyticsService;
pub use assignment::AssignmentService;
pub use catalog::CatalogService;
pub use ledger::LedgerService;
pub use location::LocationService;
pub use supplier::SupplierService;
