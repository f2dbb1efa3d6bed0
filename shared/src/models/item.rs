//! Inventory item domain types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of an inventory item
///
/// Items are never hard-deleted; archiving removes them from active views
/// and from alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Active,
    Archived,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Archived => "archived",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ItemStatus::Active),
            "archived" => Ok(ItemStatus::Archived),
            other => Err(format!("unknown item status: {other}")),
        }
    }
}
