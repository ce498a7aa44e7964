//! Backend identifier normalization.
//!
//! The locker backend is not consistent about how it types identifiers: a
//! cabinet `_id` may arrive as a string while the `CabinetId` on a transaction
//! that points at it arrives as a number (or the other way around). Every
//! identifier is therefore funnelled through [`normalize_id`] at the wire
//! boundary and stored as a [`RecordId`], whose equality is plain string
//! equality on the canonical form.
//!
//! Canonical form:
//! - strings are kept verbatim (no trimming, no case folding)
//! - integers and floats use their JSON number text (`7`, `7.5`)
//! - booleans become `true` / `false`
//! - `null` and missing values have no canonical form

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Canonical string form of a JSON identifier, or `None` for `null` and
/// structured values that cannot identify a record.
pub fn normalize_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// A backend record identifier in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        normalize_id(&value)
            .map(RecordId)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid identifier: {value}")))
    }
}

/// Deserialize an optional identifier, treating `null` and unusable values as absent.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_optional_text(deserializer)?.map(RecordId))
}

/// Deserialize a scalar that may arrive as a string or a number into its
/// canonical text. `null` and structured values become `None`.
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(normalize_id))
}
