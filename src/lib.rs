pub mod access;
pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod id;
pub mod presentation;
pub mod reconcile;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_guards;
#[cfg(test)]
mod testing;

pub use access::{AccessController, TransactionUpdate, UnlockOutcome, find_cabinet};
pub use config::Config;
pub use error::{LockerError, NO_MATCHING_CODE_MESSAGE, Result};
pub use gateway::{HttpGateway, LockerGateway};
pub use id::RecordId;
pub use presentation::{
    CabinetView, Notice, NoticeLevel, TerminalAction, TerminalState, TerminalViewModel,
    compute_terminal_view_model, reduce_terminal_state,
};
pub use reconcile::{match_transaction, reconcile};
pub use session::TerminalSession;
pub use types::{Cabinet, CabinetStatus, Location, Locker, ParcelStatus, Transaction};
