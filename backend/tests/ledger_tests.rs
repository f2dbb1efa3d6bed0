//! Transaction ledger tests
//!
//! Covers the movement state machine: direction by type, quantity
//! conservation over arbitrary movement sequences, and rejection of
//! overdraws without state change.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::TransactionType;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const ALL_TYPES: [TransactionType; 5] = [
    TransactionType::In,
    TransactionType::Out,
    TransactionType::Initial,
    TransactionType::AdjustmentUp,
    TransactionType::AdjustmentDown,
];

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// in/initial/adjustment_up increase; out/adjustment_down decrease
    #[test]
    fn test_movement_directions() {
        assert_eq!(TransactionType::In.apply(dec("10"), dec("5")).unwrap(), dec("15"));
        assert_eq!(TransactionType::Initial.apply(dec("0"), dec("7")).unwrap(), dec("7"));
        assert_eq!(
            TransactionType::AdjustmentUp.apply(dec("10"), dec("2")).unwrap(),
            dec("12")
        );
        assert_eq!(TransactionType::Out.apply(dec("10"), dec("4")).unwrap(), dec("6"));
        assert_eq!(
            TransactionType::AdjustmentDown.apply(dec("10"), dec("10")).unwrap(),
            dec("0")
        );
    }

    /// Scenario: 100 on hand, draw 85, then a draw of 30 must fail and
    /// leave the quantity untouched.
    #[test]
    fn test_overdraw_rejected_without_state_change() {
        let after_first = TransactionType::Out.apply(dec("100"), dec("85")).unwrap();
        assert_eq!(after_first, dec("15"));

        let err = TransactionType::Out.apply(after_first, dec("30")).unwrap_err();
        assert_eq!(err.available, dec("15"));
        assert_eq!(err.requested, dec("30"));
        // the failed movement contributes nothing; quantity stays at 15
        assert_eq!(after_first, dec("15"));
    }

    /// Unknown movement types are rejected at the boundary
    #[test]
    fn test_unknown_type_rejected() {
        assert!("transfer".parse::<TransactionType>().is_err());
        assert!("IN".parse::<TransactionType>().is_err());
        assert!("".parse::<TransactionType>().is_err());
    }

    /// Wire names round-trip
    #[test]
    fn test_wire_names() {
        for t in ALL_TYPES {
            assert_eq!(t.as_str().parse::<TransactionType>().unwrap(), t);
        }
    }

    /// Quantities are treated as magnitudes; sign comes from the type
    #[test]
    fn test_signed_contribution() {
        assert_eq!(TransactionType::In.signed(dec("5")), dec("5"));
        assert_eq!(TransactionType::In.signed(dec("-5")), dec("5"));
        assert_eq!(TransactionType::Out.signed(dec("5")), dec("-5"));
        assert_eq!(TransactionType::AdjustmentDown.signed(dec("3")), dec("-3"));
    }
}

proptest! {
    /// Quantity conservation: the final quantity equals the initial
    /// quantity plus the signed sum of all committed movements, and no
    /// committed movement ever leaves the quantity negative.
    #[test]
    fn conservation_over_movement_sequences(
        initial in 0u32..10_000,
        moves in proptest::collection::vec((0usize..5, 0u32..5_000), 0..100),
    ) {
        let initial = Decimal::from(initial);
        let mut current = initial;
        let mut signed_sum = Decimal::ZERO;

        for (type_index, qty) in moves {
            let transaction_type = ALL_TYPES[type_index];
            let qty = Decimal::from(qty);
            match transaction_type.apply(current, qty) {
                Ok(next) => {
                    // committed movement
                    prop_assert!(next >= Decimal::ZERO);
                    signed_sum += transaction_type.signed(qty);
                    current = next;
                }
                Err(_) => {
                    // rejected movement leaves no trace
                }
            }
        }

        prop_assert_eq!(current, initial + signed_sum);
        prop_assert!(current >= Decimal::ZERO);
    }

    /// An overdraw is rejected exactly when the requested magnitude
    /// exceeds the available quantity.
    #[test]
    fn overdraw_rejection_is_exact(available in 0u32..10_000, requested in 0u32..10_000) {
        let available = Decimal::from(available);
        let requested = Decimal::from(requested);
        let result = TransactionType::Out.apply(available, requested);
        if requested > available {
            prop_assert!(result.is_err());
        } else {
            prop_assert_eq!(result.unwrap(), available - requested);
        }
    }
}
