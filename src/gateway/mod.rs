//! Access to the locker backend.
//!
//! [`LockerGateway`] is the seam between the terminal logic and the REST
//! backend. [`HttpGateway`] is the production implementation; tests provide
//! in-memory ones.

pub mod http;

use std::future::Future;

use crate::error::Result;
use crate::id::RecordId;
use crate::types::{CabinetStatus, Locker, ParcelStatus, Transaction};

pub use http::HttpGateway;

/// Typed reads and writes against the locker backend.
pub trait LockerGateway: Send + Sync {
    /// Fetch every locker with its cabinets.
    ///
    /// Fails with `Transport` on network failure or an unparseable body.
    /// Malformed locker or cabinet records are skipped one by one. Each
    /// returned locker has a (possibly empty) cabinet list.
    fn list_lockers(&self) -> impl Future<Output = Result<Vec<Locker>>> + Send;

    /// Fetch every parcel transaction.
    ///
    /// Fails with `Transport` when the backend cannot be reached. A payload
    /// without a usable `transactions` array yields an empty list instead.
    fn list_transactions(&self) -> impl Future<Output = Result<Vec<Transaction>>> + Send;

    /// Persist a cabinet's occupancy. Fails with `Persistence` when the
    /// backend rejects the write. Never retried.
    fn set_cabinet_status(
        &self,
        locker_id: &RecordId,
        cabinet_number: u32,
        status: &CabinetStatus,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Persist a transaction's parcel status. Fails with `Persistence` when
    /// the backend rejects the write.
    fn set_transaction_status(
        &self,
        transaction_id: &RecordId,
        status: &ParcelStatus,
    ) -> impl Future<Output = Result<()>> + Send;
}
