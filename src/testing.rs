//! In-memory gateway and fixtures for unit tests.

use std::sync::Mutex;

use crate::error::{LockerError, Result};
use crate::gateway::LockerGateway;
use crate::id::RecordId;
use crate::types::{Cabinet, CabinetStatus, Location, Locker, ParcelStatus, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    ListLockers,
    ListTransactions,
    SetCabinetStatus {
        locker_id: RecordId,
        cabinet_number: u32,
        status: CabinetStatus,
    },
    SetTransactionStatus {
        transaction_id: RecordId,
        status: ParcelStatus,
    },
}

impl GatewayCall {
    fn is_write(&self) -> bool {
        matches!(
            self,
            GatewayCall::SetCabinetStatus { .. } | GatewayCall::SetTransactionStatus { .. }
        )
    }
}

/// Gateway that keeps backend records in memory and records every call.
///
/// Accepted writes are applied to the stored records so consecutive
/// operations observe each other.
#[derive(Default)]
pub struct MemoryGateway {
    lockers: Mutex<Vec<Locker>>,
    transactions: Mutex<Vec<Transaction>>,
    calls: Mutex<Vec<GatewayCall>>,
    fail_locker_reads: bool,
    fail_transaction_reads: bool,
    reject_cabinet_writes: bool,
    reject_transaction_writes: bool,
}

impl MemoryGateway {
    pub fn new(lockers: Vec<Locker>, transactions: Vec<Transaction>) -> Self {
        Self {
            lockers: Mutex::new(lockers),
            transactions: Mutex::new(transactions),
            ..Default::default()
        }
    }

    pub fn fail_locker_reads(mut self) -> Self {
        self.fail_locker_reads = true;
        self
    }

    pub fn fail_transaction_reads(mut self) -> Self {
        self.fail_transaction_reads = true;
        self
    }

    pub fn reject_cabinet_writes(mut self) -> Self {
        self.reject_cabinet_writes = true;
        self
    }

    pub fn reject_transaction_writes(mut self) -> Self {
        self.reject_transaction_writes = true;
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<GatewayCall> {
        self.calls().into_iter().filter(GatewayCall::is_write).collect()
    }

    pub fn transaction(&self, id: &str) -> Option<Transaction> {
        self.transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn rejected(operation: &'static str) -> LockerError {
    LockerError::Persistence {
        operation,
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: "rejected".to_string(),
    }
}

fn unreachable_backend(operation: &'static str) -> LockerError {
    LockerError::Transport {
        operation,
        message: "connection refused".to_string(),
    }
}

impl LockerGateway for MemoryGateway {
    async fn list_lockers(&self) -> Result<Vec<Locker>> {
        self.record(GatewayCall::ListLockers);
        if self.fail_locker_reads {
            return Err(unreachable_backend("list lockers"));
        }
        Ok(self.lockers.lock().unwrap().clone())
    }

    async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.record(GatewayCall::ListTransactions);
        if self.fail_transaction_reads {
            return Err(unreachable_backend("list transactions"));
        }
        Ok(self.transactions.lock().unwrap().clone())
    }

    async fn set_cabinet_status(
        &self,
        locker_id: &RecordId,
        cabinet_number: u32,
        status: &CabinetStatus,
    ) -> Result<()> {
        self.record(GatewayCall::SetCabinetStatus {
            locker_id: locker_id.clone(),
            cabinet_number,
            status: status.clone(),
        });
        if self.reject_cabinet_writes {
            return Err(rejected("update cabinet status"));
        }
        let mut lockers = self.lockers.lock().unwrap();
        for locker in lockers.iter_mut().filter(|l| &l.id == locker_id) {
            for cabinet in locker
                .cabinets
                .iter_mut()
                .filter(|c| c.number == cabinet_number)
            {
                cabinet.status = status.clone();
            }
        }
        Ok(())
    }

    async fn set_transaction_status(
        &self,
        transaction_id: &RecordId,
        status: &ParcelStatus,
    ) -> Result<()> {
        self.record(GatewayCall::SetTransactionStatus {
            transaction_id: transaction_id.clone(),
            status: status.clone(),
        });
        if self.reject_transaction_writes {
            return Err(rejected("update transaction status"));
        }
        let mut transactions = self.transactions.lock().unwrap();
        for t in transactions.iter_mut().filter(|t| &t.id == transaction_id) {
            t.parcel_status = Some(status.clone());
        }
        Ok(())
    }
}

pub fn cabinet(id: &str, number: u32, code: &str, status: CabinetStatus) -> Cabinet {
    Cabinet {
        id: RecordId::new(id),
        number,
        code: Some(code.to_string()),
        status,
        transaction_id: None,
    }
}

pub fn locker(id: &str, location: &str, cabinets: Vec<Cabinet>) -> Locker {
    Locker {
        id: RecordId::new(id),
        location: Location::new(location).unwrap(),
        cabinets,
    }
}

pub fn transaction(id: &str, cabinet_id: Option<&str>) -> Transaction {
    Transaction {
        id: RecordId::new(id),
        cabinet_id: cabinet_id.map(RecordId::new),
        parcel_status: Some(ParcelStatus::Other("in transit".to_string())),
    }
}

/// Locker L1 in Espoo with cabinet c1 (#3, code 9921, available) and
/// transaction t1 pointing at it.
pub fn espoo_fixture() -> (Vec<Locker>, Vec<Transaction>) {
    (
        vec![locker(
            "L1",
            "Espoo",
            vec![cabinet("c1", 3, "9921", CabinetStatus::Available)],
        )],
        vec![transaction("t1", Some("c1"))],
    )
}
