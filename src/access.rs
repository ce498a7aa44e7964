//! Unlock protocol: code validation, status toggle and the two dependent
//! writes.
//!
//! One unlock attempt:
//! 1. re-fetch transactions so the decision never rests on the session's
//!    startup snapshot
//! 2. find the first cabinet at the selected location whose code equals the
//!    entered code exactly
//! 3. toggle its status and re-match its transaction against the fresh data
//! 4. write the cabinet status; only on success write the transaction status
//!
//! The cabinet write always finishes before the transaction write starts.
//! Nothing local changes unless the cabinet write succeeded: the caller gets a
//! new locker collection in the outcome and the input slice is never touched.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{LockerError, Result};
use crate::gateway::LockerGateway;
use crate::id::RecordId;
use crate::reconcile::match_transaction;
use crate::types::{Cabinet, CabinetStatus, Location, Locker, ParcelStatus};

/// Transaction write performed as part of an unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionUpdate {
    pub transaction_id: RecordId,
    pub parcel_status: ParcelStatus,
}

/// Result of a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockOutcome {
    pub locker_id: RecordId,
    pub cabinet_id: RecordId,
    pub cabinet_number: u32,
    pub previous_status: CabinetStatus,
    pub new_status: CabinetStatus,
    /// `None` when no transaction references the cabinet.
    pub transaction: Option<TransactionUpdate>,
    /// Locker collection with the cabinet's new status applied.
    pub lockers: Vec<Locker>,
}

/// First cabinet at `location` whose code equals `code` exactly.
///
/// Lockers at other locations are filtered out before any code comparison,
/// so a valid code for a cabinet elsewhere never matches.
pub fn find_cabinet<'a>(
    lockers: &'a [Locker],
    location: &Location,
    code: &str,
) -> Option<(&'a Locker, &'a Cabinet)> {
    lockers
        .iter()
        .filter(|locker| locker.is_at(location))
        .find_map(|locker| {
            locker
                .cabinets
                .iter()
                .find(|cabinet| cabinet.code.as_deref() == Some(code))
                .map(|cabinet| (locker, cabinet))
        })
}

/// Copy of `lockers` with cabinet `cabinet_id` set to `status`.
pub fn apply_cabinet_status(
    lockers: &[Locker],
    cabinet_id: &RecordId,
    status: &CabinetStatus,
    transaction_id: Option<&RecordId>,
) -> Vec<Locker> {
    lockers
        .iter()
        .map(|locker| {
            let mut locker = locker.clone();
            for cabinet in locker.cabinets.iter_mut().filter(|c| &c.id == cabinet_id) {
                cabinet.status = status.clone();
                if let Some(id) = transaction_id {
                    cabinet.transaction_id = Some(id.clone());
                }
            }
            locker
        })
        .collect()
}

/// Runs the unlock protocol against a gateway.
pub struct AccessController<'g, G> {
    gateway: &'g G,
}

impl<'g, G: LockerGateway> AccessController<'g, G> {
    pub fn new(gateway: &'g G) -> Self {
        Self { gateway }
    }

    /// Attempt to unlock the cabinet at `location` whose code is `code`.
    ///
    /// Errors:
    /// - `LocationNotSelected` when `location` is `None`
    /// - `NoMatchingCode` when no cabinet at the location has this code
    /// - `InvalidStatusMapping` when the new status has no parcel status;
    ///   checked before any write
    /// - the gateway's error when the cabinet write fails; nothing else is
    ///   written
    /// - `TransactionSyncFailed` when the cabinet write succeeded but the
    ///   transaction write did not
    pub async fn unlock(
        &self,
        lockers: &[Locker],
        location: Option<&Location>,
        code: &str,
    ) -> Result<UnlockOutcome> {
        let location = location.ok_or(LockerError::LocationNotSelected)?;

        let transactions = match self.gateway.list_transactions().await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!("could not refresh transactions, continuing without them: {e}");
                Vec::new()
            }
        };

        let Some((locker, cabinet)) = find_cabinet(lockers, location, code) else {
            debug!(%location, "no cabinet matched the entered code");
            return Err(LockerError::NoMatchingCode);
        };

        let new_status = cabinet.status.toggled();
        let matched = match_transaction(&cabinet.id, &transactions);
        match matched {
            Some(t) => debug!(
                cabinet = cabinet.number,
                transaction = %t.id,
                "cabinet matched with transaction"
            ),
            None => debug!(cabinet = cabinet.number, "no transaction matched for cabinet"),
        }

        let transaction = match matched {
            Some(t) => Some(TransactionUpdate {
                transaction_id: t.id.clone(),
                parcel_status: new_status.parcel_status()?,
            }),
            None => None,
        };

        if let Err(e) = self
            .gateway
            .set_cabinet_status(&locker.id, cabinet.number, &new_status)
            .await
        {
            error!(
                locker = %locker.id,
                cabinet = cabinet.number,
                "error updating cabinet status: {e}"
            );
            return Err(e);
        }
        info!(
            locker = %locker.id,
            cabinet = cabinet.number,
            status = %new_status,
            "cabinet status updated"
        );

        if let Some(update) = &transaction {
            if let Err(e) = self
                .gateway
                .set_transaction_status(&update.transaction_id, &update.parcel_status)
                .await
            {
                error!(
                    transaction = %update.transaction_id,
                    "error updating transaction status: {e}"
                );
                return Err(LockerError::TransactionSyncFailed {
                    cabinet_id: cabinet.id.to_string(),
                    new_status,
                    transaction_id: update.transaction_id.to_string(),
                    source: Box::new(e),
                });
            }
            info!(
                transaction = %update.transaction_id,
                status = %update.parcel_status,
                "transaction status updated"
            );
        }

        let updated = apply_cabinet_status(
            lockers,
            &cabinet.id,
            &new_status,
            transaction.as_ref().map(|t| &t.transaction_id),
        );

        Ok(UnlockOutcome {
            locker_id: locker.id.clone(),
            cabinet_id: cabinet.id.clone(),
            cabinet_number: cabinet.number,
            previous_status: cabinet.status.clone(),
            new_status,
            transaction,
            lockers: updated,
        })
    }
}
