use thiserror::Error;

use crate::types::CabinetStatus;

/// User-facing message for an unlock attempt that matched no cabinet.
pub const NO_MATCHING_CODE_MESSAGE: &str = "Incorrect code for all cabinets in this location.";

#[derive(Error, Debug)]
pub enum LockerError {
    #[error("transport error during {operation}: {message}")]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[error("backend rejected {operation} (HTTP {status}): {message}")]
    Persistence {
        operation: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("{}", NO_MATCHING_CODE_MESSAGE)]
    NoMatchingCode,

    #[error("cannot map cabinet status '{0}' to a parcel status")]
    InvalidStatusMapping(CabinetStatus),

    #[error(
        "cabinet '{cabinet_id}' is now {new_status} but transaction '{transaction_id}' was not updated: {source}"
    )]
    TransactionSyncFailed {
        cabinet_id: String,
        new_status: CabinetStatus,
        transaction_id: String,
        #[source]
        source: Box<LockerError>,
    },

    #[error("no location selected")]
    LocationNotSelected,

    #[error("unknown location '{0}'")]
    InvalidLocation(String),

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LockerError {
    /// Wrap a reqwest failure that happened before a response was received.
    pub fn transport(operation: &'static str, error: reqwest::Error) -> Self {
        LockerError::Transport {
            operation,
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LockerError>;
