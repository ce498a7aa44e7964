use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::error::{LockerError, Result};
use crate::id::{RecordId, deserialize_optional_id, deserialize_optional_text};

/// Cities the terminal offers when no location list is configured.
pub const DEFAULT_LOCATIONS: &[&str] = &["Helsinki", "Espoo", "Tampere", "Vantaa", "Oulu"];

/// A city a locker stands in. Only ever used as a filter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Create a location for selection. Empty names are rejected.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LockerError::InvalidLocation(name));
        }
        Ok(Location(name))
    }

    /// Parse a location and check it against the set the terminal offers.
    ///
    /// Membership is case-insensitive; the returned location carries the
    /// spelling from `allowed` so it compares equal to backend records.
    pub fn parse_in(name: &str, allowed: &[String]) -> Result<Self> {
        let name = name.trim();
        allowed
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(|candidate| Location(candidate.clone()))
            .ok_or_else(|| LockerError::InvalidLocation(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy of a cabinet.
///
/// Values other than `available` / `occupied` are kept as `Unknown` so a
/// record with an unexpected status still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CabinetStatus {
    #[default]
    Available,
    Occupied,
    Unknown(String),
}

impl CabinetStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CabinetStatus::Available => "available",
            CabinetStatus::Occupied => "occupied",
            CabinetStatus::Unknown(s) => s,
        }
    }

    /// Status after a successful unlock. Anything not occupied becomes occupied.
    pub fn toggled(&self) -> CabinetStatus {
        match self {
            CabinetStatus::Occupied => CabinetStatus::Available,
            CabinetStatus::Available | CabinetStatus::Unknown(_) => CabinetStatus::Occupied,
        }
    }

    /// Parcel status a transaction takes when its cabinet moves to `self`.
    pub fn parcel_status(&self) -> Result<ParcelStatus> {
        match self {
            CabinetStatus::Occupied => Ok(ParcelStatus::AwaitingPickup),
            CabinetStatus::Available => Ok(ParcelStatus::PickedUp),
            CabinetStatus::Unknown(_) => Err(LockerError::InvalidStatusMapping(self.clone())),
        }
    }

    fn from_wire(s: String) -> Self {
        match s.as_str() {
            "available" => CabinetStatus::Available,
            "occupied" => CabinetStatus::Occupied,
            _ => CabinetStatus::Unknown(s),
        }
    }
}

impl fmt::Display for CabinetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CabinetStatus {
    type Err = LockerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(CabinetStatus::Available),
            "occupied" => Ok(CabinetStatus::Occupied),
            _ => Err(LockerError::InvalidStatus(s.to_string())),
        }
    }
}

impl Serialize for CabinetStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CabinetStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(CabinetStatus::from_wire(String::deserialize(deserializer)?))
    }
}

/// Lifecycle state of a parcel transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParcelStatus {
    AwaitingPickup,
    PickedUp,
    /// Backend states this terminal never writes, e.g. "in transit".
    Other(String),
}

impl ParcelStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ParcelStatus::AwaitingPickup => "awaiting pickup",
            ParcelStatus::PickedUp => "picked up",
            ParcelStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ParcelStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ParcelStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "awaiting pickup" => ParcelStatus::AwaitingPickup,
            "picked up" => ParcelStatus::PickedUp,
            _ => ParcelStatus::Other(s),
        })
    }
}

/// A lockable compartment inside a [`Locker`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabinet {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(rename = "cabinetNumber")]
    pub number: u32,

    /// Access code in canonical text form; numeric codes become their digits.
    /// `None` when the record has no usable code, so it never matches.
    #[serde(
        skip_serializing,
        default,
        deserialize_with = "deserialize_optional_text"
    )]
    pub code: Option<String>,

    pub status: CabinetStatus,

    /// Transaction matched to this cabinet by reconciliation. Never read from
    /// the backend.
    #[serde(
        rename = "transactionId",
        skip_deserializing,
        skip_serializing_if = "Option::is_none"
    )]
    pub transaction_id: Option<RecordId>,
}

impl fmt::Debug for Cabinet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cabinet")
            .field("id", &self.id)
            .field("number", &self.number)
            .field("code", &"[REDACTED]")
            .field("status", &self.status)
            .field("transaction_id", &self.transaction_id)
            .finish()
    }
}

/// A physical locker unit at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locker {
    /// Read from `id` only; Mongo's `_id` on the same record is ignored.
    pub id: RecordId,

    pub location: Location,

    #[serde(default, deserialize_with = "deserialize_cabinets")]
    pub cabinets: Vec<Cabinet>,
}

impl Locker {
    pub fn is_at(&self, location: &Location) -> bool {
        &self.location == location
    }
}

/// A parcel drop-off/pickup record pointing at one cabinet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: RecordId,

    #[serde(
        rename = "CabinetId",
        default,
        deserialize_with = "deserialize_optional_id"
    )]
    pub cabinet_id: Option<RecordId>,

    #[serde(rename = "parcelStatus", default)]
    pub parcel_status: Option<ParcelStatus>,
}

/// Cabinet list where `null` means empty and a malformed cabinet is skipped
/// rather than failing its whole locker.
fn deserialize_cabinets<'de, D>(deserializer: D) -> std::result::Result<Vec<Cabinet>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Cabinet>(item) {
            Ok(cabinet) => Some(cabinet),
            Err(e) => {
                warn!("skipping malformed cabinet record: {e}");
                None
            }
        })
        .collect())
}
