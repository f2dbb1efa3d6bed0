//! Supplier domain types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of a supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
}

impl SupplierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierStatus::Active => "active",
            SupplierStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for SupplierStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SupplierStatus::Active),
            "inactive" => Ok(SupplierStatus::Inactive),
            other => Err(format!("unknown supplier status: {other}")),
        }
    }
}
