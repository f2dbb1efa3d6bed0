//! Request middleware for the SiteStock inventory backend

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
