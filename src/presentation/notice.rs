//! User-visible feedback shown under the cabinet grid.

use serde::Serialize;

/// A message for the person at the terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// The message to display
    pub message: String,
    /// The severity level of the notice
    pub level: NoticeLevel,
}

/// Severity level for notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
    Success,
}

impl Notice {
    pub fn new(message: impl Into<String>, level: NoticeLevel) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NoticeLevel::Success)
    }
}
