//! Joins cabinet inventory with parcel transactions.
//!
//! A cabinet matches a transaction when the transaction's `CabinetId` equals
//! the cabinet's `_id` in canonical form (see [`crate::id`]). When several
//! transactions reference the same cabinet the first one in the given order
//! wins. No recency ordering is applied here; whatever order the backend
//! returns is the order that decides.

use tracing::debug;

use crate::id::RecordId;
use crate::types::{Locker, Transaction};

/// First transaction in `transactions` that references `cabinet_id`.
pub fn match_transaction<'a>(
    cabinet_id: &RecordId,
    transactions: &'a [Transaction],
) -> Option<&'a Transaction> {
    transactions
        .iter()
        .find(|t| t.cabinet_id.as_ref() == Some(cabinet_id))
}

/// Annotate every cabinet with its matched transaction id.
///
/// Returns a new collection; `lockers` is left untouched. Any
/// `transaction_id` already present on the input is replaced, so running this
/// twice on the same inputs yields the same output.
pub fn reconcile(lockers: &[Locker], transactions: &[Transaction]) -> Vec<Locker> {
    lockers
        .iter()
        .map(|locker| {
            let mut locker = locker.clone();
            for cabinet in &mut locker.cabinets {
                let matched = match_transaction(&cabinet.id, transactions);
                match matched {
                    Some(t) => debug!(
                        cabinet = cabinet.number,
                        transaction = %t.id,
                        "cabinet matched with transaction"
                    ),
                    None => debug!(cabinet = cabinet.number, "no transaction matched for cabinet"),
                }
                cabinet.transaction_id = matched.map(|t| t.id.clone());
            }
            locker
        })
        .collect()
}
