//! Stock movement types
//!
//! Every quantity change flows through the transaction ledger. Quantities
//! are stored unsigned; the movement type alone carries the direction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Kind of ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    In,
    Out,
    Initial,
    AdjustmentUp,
    AdjustmentDown,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "in",
            TransactionType::Out => "out",
            TransactionType::Initial => "initial",
            TransactionType::AdjustmentUp => "adjustment_up",
            TransactionType::AdjustmentDown => "adjustment_down",
        }
    }

    /// Whether this movement increases the item quantity
    pub fn is_inbound(&self) -> bool {
        matches!(
            self,
            TransactionType::In | TransactionType::Initial | TransactionType::AdjustmentUp
        )
    }

    /// Signed contribution of a stored (unsigned) quantity
    pub fn signed(&self, quantity: Decimal) -> Decimal {
        if self.is_inbound() {
            quantity.abs()
        } else {
            -quantity.abs()
        }
    }

    /// Apply this movement to a current item quantity.
    ///
    /// Outbound movements that would drive the quantity negative are
    /// rejected; the ledger never commits negative stock.
    pub fn apply(&self, current: Decimal, quantity: Decimal) -> Result<Decimal, InsufficientStock> {
        let next = current + self.signed(quantity);
        if next < Decimal::ZERO {
            return Err(InsufficientStock {
                available: current,
                requested: quantity.abs(),
            });
        }
        Ok(next)
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(TransactionType::In),
            "out" => Ok(TransactionType::Out),
            "initial" => Ok(TransactionType::Initial),
            "adjustment_up" => Ok(TransactionType::AdjustmentUp),
            "adjustment_down" => Ok(TransactionType::AdjustmentDown),
            other => Err(UnknownTransactionType(other.to_string())),
        }
    }
}

/// A movement type string that is not part of the ledger vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown transaction type: {0}")]
pub struct UnknownTransactionType(pub String);

/// An outbound movement larger than the available stock
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("insufficient stock: {available} available, {requested} requested")]
pub struct InsufficientStock {
    pub available: Decimal,
    pub requested: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn direction_follows_type() {
        assert!(TransactionType::In.is_inbound());
        assert!(TransactionType::Initial.is_inbound());
        assert!(TransactionType::AdjustmentUp.is_inbound());
        assert!(!TransactionType::Out.is_inbound());
        assert!(!TransactionType::AdjustmentDown.is_inbound());
    }

    #[test]
    fn apply_rejects_overdraw() {
        let err = TransactionType::Out.apply(dec("15"), dec("30")).unwrap_err();
        assert_eq!(err.available, dec("15"));
        assert_eq!(err.requested, dec("30"));
    }

    #[test]
    fn apply_takes_absolute_quantity() {
        // Callers may pass signed input; the type decides the direction.
        assert_eq!(TransactionType::In.apply(dec("10"), dec("-5")).unwrap(), dec("15"));
        assert_eq!(TransactionType::Out.apply(dec("10"), dec("-5")).unwrap(), dec("5"));
    }

    #[test]
    fn round_trips_wire_names() {
        for t in [
            TransactionType::In,
            TransactionType::Out,
            TransactionType::Initial,
            TransactionType::AdjustmentUp,
            TransactionType::AdjustmentDown,
        ] {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
        assert!("transfer".parse::<TransactionType>().is_err());
    }
}
