//! # Settlement Engine
//!
//! Turns a group's net balances into the transfers that zero them out,
//! using a deterministic greedy matching of sorted creditors and debtors.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 4 decimal places via `rust_decimal`, with a
//!   0.01 tolerance ([`Amount::EPSILON`]) for every zero comparison
//! - **Pure functions**: no state between calls, caller data is never mutated
//! - **Failures as data**: validation reports unbalanced ledgers and matching
//!   inconsistencies separately instead of erroring
//! - **Deterministic output**: stable sorts, identical input gives identical
//!   transfers
//!
//! ## Example
//!
//! ```
//! use settlement_engine::{compute_settlements, validate_settlements, Amount, Balance};
//! use std::str::FromStr;
//!
//! let balances = vec![
//!     Balance::new("A", Amount::from_str("100").unwrap()),
//!     Balance::new("B", Amount::from_str("-60").unwrap()),
//!     Balance::new("C", Amount::from_str("-40").unwrap()),
//! ];
//! let transfers = compute_settlements(&balances);
//! assert_eq!(transfers.len(), 2);
//! assert!(validate_settlements(&balances, &transfers).ok);
//! ```

pub mod amount;
pub mod balance;
pub mod error;
pub mod ledger;
pub mod matcher;
pub mod partition;
pub mod round;
pub mod stats;
pub mod transfer;
pub mod validate;

pub use amount::Amount;
pub use balance::{Balance, BalanceRecord};
pub use error::{EngineError, Result};
pub use matcher::{compute_settlements, match_partition};
pub use partition::{partition_balances, Partition};
pub use round::{settle, SettlementRound};
pub use stats::{compute_stats, SettlementStats};
pub use transfer::Transfer;
pub use validate::{validate_settlements, BalanceCheck, FailureCause, Mismatch, ValidationReport};
