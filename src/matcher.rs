//! Greedy two-pointer matching of creditors against debtors.
//!
//! The largest remaining creditor is paired with the largest remaining
//! debtor and the smaller of the two magnitudes changes hands. Whichever
//! side drops to within `EPSILON` of zero advances its pointer. Each step
//! settles at least one participant, so the result never exceeds
//! `creditors + debtors - 1` transfers.
//!
//! This is not a global minimum for every balance distribution (that is a
//! subset-sum style problem); it is the intended, deterministic algorithm.

use crate::amount::Amount;
use crate::balance::Balance;
use crate::partition::{partition_balances, Partition};
use crate::transfer::Transfer;
use log::{debug, warn};

/// Computes the transfers that zero out `balances`.
///
/// Never fails. Empty input, or input where everyone is already within
/// `EPSILON` of zero, yields an empty list.
pub fn compute_settlements(balances: &[Balance]) -> Vec<Transfer> {
    match_partition(partition_balances(balances))
}

/// Runs the matcher over an already partitioned round.
///
/// Consumes the partition as its working copy. A one-sided partition means
/// the balances did not sum to zero; it produces no transfers and is
/// reported at warn level.
pub fn match_partition(partition: Partition) -> Vec<Transfer> {
    let Partition {
        mut creditors,
        mut debtors,
    } = partition;

    let mut transfers = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
    let (mut i, mut j) = (0, 0);

    while i < creditors.len() && j < debtors.len() {
        let creditor = &mut creditors[i];
        let debtor = &mut debtors[j];

        let amount = creditor.net_balance.min(debtor.net_balance.abs());

        creditor.net_balance -= amount;
        debtor.net_balance += amount;

        if amount > Amount::EPSILON {
            debug!(
                "Step {}: {} pays {} {} (creditor left {}, debtor left {})",
                transfers.len() + 1,
                debtor.participant_id,
                creditor.participant_id,
                amount,
                creditor.net_balance,
                debtor.net_balance
            );
            transfers.push(Transfer::new(
                debtor.participant_id.clone(),
                creditor.participant_id.clone(),
                amount,
            ));
        }

        if creditor.net_balance <= Amount::EPSILON {
            i += 1;
        }
        if debtor.net_balance >= -Amount::EPSILON {
            j += 1;
        }
    }

    let unmatched_credit: Amount = creditors[i..].iter().map(|c| c.net_balance).sum();
    let unmatched_debt: Amount = debtors[j..].iter().map(|d| d.net_balance).sum();
    if !unmatched_credit.is_zero() || !unmatched_debt.is_zero() {
        warn!(
            "Matching left {} owed to {} creditors and {} owing from {} debtors unsettled; balances do not sum to zero",
            unmatched_credit,
            creditors.len() - i,
            unmatched_debt.abs(),
            debtors.len() - j
        );
    }

    debug!("Matched round in {} transfers", transfers.len());
    transfers
}
