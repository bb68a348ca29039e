//! Settlement validation.
//!
//! Replays a transfer list against the balances it was computed from and
//! certifies that every participant ends at zero. Two independent failure
//! causes are distinguished:
//!
//! - **Unbalanced ledger**: total credits and total debts differ by more than
//!   `EPSILON`. The input snapshot was inconsistent before matching started.
//! - **Matching inconsistency**: totals agree, yet some participant's replayed
//!   net flow differs from their balance. This points at the matcher itself.
//!
//! Participants inside the settled band (`|balance| <= EPSILON`) are never
//! matched, so a round can legitimately leave a residual on someone else of
//! at most the band's total. Such residuals are listed separately and do not
//! fail the round.
//!
//! Failures are returned as data. A report with `ok == false` must block the
//! caller from applying the transfers.

use crate::amount::Amount;
use crate::balance::Balance;
use crate::transfer::Transfer;
use log::{debug, error, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Why a settlement failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureCause {
    /// Positive and negative balances do not cancel out.
    UnbalancedLedger,

    /// Balances cancel out but the transfers do not reproduce them.
    MatchingInconsistency,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::UnbalancedLedger => write!(f, "unbalanced ledger"),
            FailureCause::MatchingInconsistency => write!(f, "matching inconsistency"),
        }
    }
}

/// Totals of the input balances, independent of any transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCheck {
    /// Sum of all positive balances.
    pub total_credits: Amount,

    /// Sum of the absolute values of all negative balances.
    pub total_debits: Amount,

    /// `total_credits - total_debits`.
    pub difference: Amount,

    /// Sum of absolute balances within `EPSILON` of zero, which the
    /// partitioner drops unmatched.
    pub settled_band: Amount,
}

impl BalanceCheck {
    /// Totals `balances` without looking at any transfers.
    pub fn from_balances(balances: &[Balance]) -> Self {
        let mut total_credits = Amount::ZERO;
        let mut total_debits = Amount::ZERO;
        let mut settled_band = Amount::ZERO;
        for balance in balances {
            if balance.net_balance > Amount::ZERO {
                total_credits += balance.net_balance;
            } else {
                total_debits += balance.net_balance.abs();
            }
            if balance.net_balance.is_settled() {
                settled_band += balance.net_balance.abs();
            }
        }

        BalanceCheck {
            total_credits,
            total_debits,
            difference: total_credits - total_debits,
            settled_band,
        }
    }

    /// Credits and debts agree within `EPSILON`.
    pub fn is_balanced(&self) -> bool {
        self.difference.is_settled()
    }
}

/// A participant whose replayed flow does not match their balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    /// Participant whose position does not reconcile.
    pub participant_id: String,

    /// Original net balance (zero for participants only seen in transfers).
    pub expected: Amount,

    /// Net flow from replaying the transfers.
    pub actual: Amount,

    /// `expected - actual`.
    pub difference: Amount,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, settled {} (off by {})",
            self.participant_id, self.expected, self.actual, self.difference
        )
    }
}

/// Outcome of [`validate_settlements`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` when the transfers may be applied.
    pub ok: bool,

    /// Set exactly when `ok` is false. An unbalanced ledger takes precedence.
    pub cause: Option<FailureCause>,

    /// Totals of the input balances.
    pub balance_check: BalanceCheck,

    /// Per-participant mismatches, in balance input order followed by
    /// participants that only appear in transfers.
    pub mismatches: Vec<Mismatch>,

    /// Differences left by settled-band balances that were never matched.
    /// Informational only, in the same order as `mismatches`.
    pub residuals: Vec<Mismatch>,
}

/// Validates `transfers` against the `balances` they should settle.
pub fn validate_settlements(balances: &[Balance], transfers: &[Transfer]) -> ValidationReport {
    let balance_check = BalanceCheck::from_balances(balances);

    // participant -> (expected, actual), kept in first-seen order
    let mut order: Vec<&str> = Vec::new();
    let mut positions: HashMap<&str, (Amount, Amount)> = HashMap::new();

    for balance in balances {
        let id = balance.participant_id.as_str();
        let entry = positions.entry(id).or_insert_with(|| {
            order.push(id);
            (Amount::ZERO, Amount::ZERO)
        });
        entry.0 += balance.net_balance;
    }

    for transfer in transfers {
        for (id, flow) in [
            (transfer.to.as_str(), transfer.amount),
            (transfer.from.as_str(), -transfer.amount),
        ] {
            let entry = positions.entry(id).or_insert_with(|| {
                order.push(id);
                (Amount::ZERO, Amount::ZERO)
            });
            entry.1 += flow;
        }
    }

    let mut mismatches: Vec<Mismatch> = order
        .iter()
        .filter_map(|id| {
            let (expected, actual) = positions[id];
            if expected.approx_eq(actual) {
                None
            } else {
                Some(Mismatch {
                    participant_id: id.to_string(),
                    expected,
                    actual,
                    difference: expected - actual,
                })
            }
        })
        .collect();

    let mut residuals = Vec::new();
    if balance_check.is_balanced() && !mismatches.is_empty() {
        let unreconciled: Amount = mismatches.iter().map(|m| m.difference.abs()).sum();
        if unreconciled <= balance_check.settled_band + Amount::EPSILON {
            warn!(
                "Residual of {} left by {} settled-band balances totalling {}",
                unreconciled,
                balances.iter().filter(|b| b.net_balance.is_settled()).count(),
                balance_check.settled_band
            );
            residuals = std::mem::take(&mut mismatches);
        }
    }

    let cause = if !balance_check.is_balanced() {
        warn!(
            "Unbalanced ledger: credits {} vs debts {} (difference {})",
            balance_check.total_credits, balance_check.total_debits, balance_check.difference
        );
        Some(FailureCause::UnbalancedLedger)
    } else if !mismatches.is_empty() {
        for mismatch in &mismatches {
            error!("Matching inconsistency for {}", mismatch);
        }
        Some(FailureCause::MatchingInconsistency)
    } else {
        None
    };

    debug!(
        "Validated {} transfers against {} balances: {}",
        transfers.len(),
        balances.len(),
        cause.map_or_else(|| "ok".to_string(), |c| c.to_string())
    );

    ValidationReport {
        ok: cause.is_none(),
        cause,
        balance_check,
        mismatches,
        residuals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::compute_settlements;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn bal(id: &str, value: &str) -> Balance {
        Balance::new(id, amt(value))
    }

    #[test]
    fn test_valid_settlement_passes() {
        let balances = vec![bal("A", "100"), bal("B", "-60"), bal("C", "-40")];
        let transfers = compute_settlements(&balances);
        let report = validate_settlements(&balances, &transfers);

        assert!(report.ok);
        assert_eq!(report.cause, None);
        assert!(report.mismatches.is_empty());
        assert_eq!(report.balance_check.total_credits, amt("100"));
        assert_eq!(report.balance_check.total_debits, amt("100"));
    }

    #[test]
    fn test_empty_round_passes() {
        let report = validate_settlements(&[], &[]);
        assert!(report.ok);
        assert!(report.balance_check.difference.is_zero());
    }

    #[test]
    fn test_unbalanced_ledger_is_reported() {
        let balances = vec![bal("A", "100"), bal("B", "-50")];
        let transfers = compute_settlements(&balances);
        let report = validate_settlements(&balances, &transfers);

        assert!(!report.ok);
        assert_eq!(report.cause, Some(FailureCause::UnbalancedLedger));
        assert_eq!(report.balance_check.difference, amt("50"));
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].participant_id, "A");
        assert_eq!(report.mismatches[0].difference, amt("50"));
    }

    #[test]
    fn test_tampered_transfer_is_matching_inconsistency() {
        let balances = vec![bal("A", "100"), bal("B", "-60"), bal("C", "-40")];
        let mut transfers = compute_settlements(&balances);
        transfers[0].amount = amt("55");

        let report = validate_settlements(&balances, &transfers);

        assert!(!report.ok);
        assert_eq!(report.cause, Some(FailureCause::MatchingInconsistency));
        let ids: Vec<_> = report
            .mismatches
            .iter()
            .map(|m| m.participant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(report.mismatches[1].expected, amt("-60"));
        assert_eq!(report.mismatches[1].actual, amt("-55"));
        assert_eq!(report.mismatches[1].difference, amt("-5"));
    }

    #[test]
    fn test_unknown_participant_in_transfers() {
        let balances = vec![bal("A", "10"), bal("B", "-10")];
        let transfers = vec![
            Transfer::new("B", "A", amt("10")),
            Transfer::new("Z", "A", amt("1")),
        ];
        let report = validate_settlements(&balances, &transfers);

        assert_eq!(report.cause, Some(FailureCause::MatchingInconsistency));
        let ids: Vec<_> = report
            .mismatches
            .iter()
            .map(|m| m.participant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "Z"]);
        assert_eq!(report.mismatches[1].expected, Amount::ZERO);
    }

    #[test]
    fn test_small_residual_is_tolerated() {
        let balances = vec![bal("A", "33.335"), bal("B", "-33.33")];
        let transfers = compute_settlements(&balances);
        assert!(validate_settlements(&balances, &transfers).ok);
    }

    #[test]
    fn test_settled_band_residual_is_accepted() {
        let balances = vec![bal("A", "0.01"), bal("B", "0.01"), bal("C", "-0.02")];
        let transfers = compute_settlements(&balances);
        assert!(transfers.is_empty());

        let report = validate_settlements(&balances, &transfers);

        assert!(report.ok);
        assert_eq!(report.cause, None);
        assert!(report.mismatches.is_empty());
        assert_eq!(report.balance_check.settled_band, amt("0.02"));
        assert_eq!(report.residuals.len(), 1);
        assert_eq!(report.residuals[0].participant_id, "C");
        assert_eq!(report.residuals[0].difference, amt("-0.02"));
    }

    #[test]
    fn test_residual_beyond_settled_band_is_still_inconsistency() {
        let balances = vec![
            bal("A", "0.01"),
            bal("B", "0.01"),
            bal("C", "9.98"),
            bal("D", "-10"),
        ];
        // Short-paying C by 0.50 is more than the band can explain.
        let transfers = vec![Transfer::new("D", "C", amt("9.48"))];

        let report = validate_settlements(&balances, &transfers);

        assert_eq!(report.cause, Some(FailureCause::MatchingInconsistency));
        assert!(report.residuals.is_empty());
        let ids: Vec<_> = report
            .mismatches
            .iter()
            .map(|m| m.participant_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "D"]);
    }

    #[test]
    fn test_cause_display() {
        assert_eq!(FailureCause::UnbalancedLedger.to_string(), "unbalanced ledger");
        assert_eq!(
            FailureCause::MatchingInconsistency.to_string(),
            "matching inconsistency"
        );
    }
}
