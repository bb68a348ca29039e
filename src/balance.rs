//! Balance models for CSV parsing and the engine's input entity.

use crate::amount::Amount;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One participant's net position in a settlement round.
///
/// Positive means the participant is owed money, negative means they owe
/// money. A set of balances handed to the engine is expected to sum to zero
/// within [`Amount::EPSILON`]; the engine can detect a violation but not
/// repair it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Participant identifier.
    pub participant_id: String,

    /// Signed net balance.
    pub net_balance: Amount,
}

impl Balance {
    /// Creates a balance entry.
    pub fn new(participant_id: impl Into<String>, net_balance: Amount) -> Self {
        Balance {
            participant_id: participant_id.into(),
            net_balance,
        }
    }
}

/// Raw balance row as read from CSV.
///
/// The amount is kept as a string so a malformed value is reported for the
/// row instead of failing the whole deserialization.
#[derive(Debug, Deserialize)]
pub struct BalanceRecord {
    /// Participant identifier
    pub participant: String,

    /// Net balance, signed decimal
    pub balance: Option<String>,
}

impl BalanceRecord {
    /// Parses the raw CSV record into a typed balance.
    ///
    /// Returns `None` if the participant is blank or the balance is missing,
    /// not a decimal, or beyond [`Amount::MAX_MAGNITUDE`].
    pub fn parse(&self) -> Option<Balance> {
        let participant = self.participant.trim();
        if participant.is_empty() {
            return None;
        }

        let raw = self.balance.as_ref()?.trim();
        if raw.is_empty() {
            return None;
        }

        let net_balance = Amount::from_str(raw).ok()?;
        Some(Balance::new(participant, net_balance))
    }
}
