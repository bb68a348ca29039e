//! Transfer instruction produced by the matcher.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// A single directed payment: `from` pays `amount` to `to`.
///
/// Created fresh on every settlement run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Paying participant (a debtor).
    pub from: String,

    /// Receiving participant (a creditor).
    pub to: String,

    /// Strictly positive amount.
    pub amount: Amount,
}

impl Transfer {
    /// Creates a transfer of `amount` from `from` to `to`.
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Amount) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}
