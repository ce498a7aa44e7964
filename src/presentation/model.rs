//! Terminal state, actions and view model.
//!
//! This module separates state (TerminalState) from view (TerminalViewModel).
//! State only changes through [`reduce_terminal_state`], which takes the old
//! state by value and returns the next one; the view is derived from state by
//! [`compute_terminal_view_model`] and never touches the network.

use serde::Serialize;

use crate::access::{UnlockOutcome, apply_cabinet_status};
use crate::error::{LockerError, NO_MATCHING_CODE_MESSAGE};
use crate::id::RecordId;
use crate::types::{CabinetStatus, Location, Locker};

use super::notice::Notice;

// ============================================================================
// State Types
// ============================================================================

/// Everything the terminal screen depends on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalState {
    // Data
    /// Reconciled lockers for the whole session
    pub lockers: Vec<Locker>,

    // Input
    /// Location picked by the user, if any
    pub selected_location: Option<Location>,
    /// Code typed so far
    pub input_code: String,

    // Feedback
    /// Cabinet opened by the most recent successful unlock
    pub last_unlocked: Option<RecordId>,
    /// Message shown under the grid
    pub notice: Option<Notice>,

    // Loading/app state
    /// Whether the initial locker fetch is still running
    pub is_loading: bool,
    /// Whether an unlock attempt is in flight
    pub is_unlocking: bool,
}

impl TerminalState {
    /// State for a session whose lockers have not arrived yet.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Default::default()
        }
    }
}

// ============================================================================
// Action Types
// ============================================================================

/// Why an unlock attempt did not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockFailure {
    /// No cabinet at the location has the entered code
    NoMatchingCode,
    /// Unlock was attempted before choosing a location
    LocationNotSelected,
    /// The cabinet write went through but the transaction write did not
    TransactionNotSynced {
        cabinet_id: RecordId,
        new_status: CabinetStatus,
        message: String,
    },
    /// Anything else, e.g. the backend rejected the cabinet write
    Failed(String),
}

impl From<&LockerError> for UnlockFailure {
    fn from(error: &LockerError) -> Self {
        match error {
            LockerError::NoMatchingCode => UnlockFailure::NoMatchingCode,
            LockerError::LocationNotSelected => UnlockFailure::LocationNotSelected,
            LockerError::TransactionSyncFailed {
                cabinet_id,
                new_status,
                ..
            } => UnlockFailure::TransactionNotSynced {
                cabinet_id: RecordId::new(cabinet_id.clone()),
                new_status: new_status.clone(),
                message: error.to_string(),
            },
            other => UnlockFailure::Failed(other.to_string()),
        }
    }
}

/// All possible actions on the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalAction {
    /// Reconciled lockers arrived
    LockersLoaded(Vec<Locker>),
    /// User picked a location, or cleared the selection
    SelectLocation(Option<Location>),
    /// User edited the code field
    SetCode(String),
    /// Unlock button pressed
    UnlockStarted,
    /// Unlock finished with both writes accepted
    UnlockSucceeded(UnlockOutcome),
    /// Unlock finished without a full success
    UnlockFailed(UnlockFailure),
    /// Hide the current notice
    DismissNotice,
}

// ============================================================================
// View Model Types
// ============================================================================

/// One cabinet tile on the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CabinetView {
    pub locker_id: RecordId,
    pub cabinet_id: RecordId,
    pub number: u32,
    pub status: CabinetStatus,
    pub has_transaction: bool,
    pub is_highlighted: bool,
}

/// Everything needed to draw the terminal screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalViewModel {
    pub location: Option<String>,
    pub input_code: String,
    pub cabinets: Vec<CabinetView>,
    pub notice: Option<Notice>,
    pub is_loading: bool,
    pub can_unlock: bool,
}

// ============================================================================
// View Model Computation
// ============================================================================

/// Cabinets of lockers at `location`, in locker-then-cabinet order, with the
/// last unlocked one flagged.
pub fn visible_cabinets(
    lockers: &[Locker],
    location: Option<&Location>,
    last_unlocked: Option<&RecordId>,
) -> Vec<CabinetView> {
    let Some(location) = location else {
        return Vec::new();
    };

    lockers
        .iter()
        .filter(|locker| locker.is_at(location))
        .flat_map(|locker| {
            locker.cabinets.iter().map(|cabinet| CabinetView {
                locker_id: locker.id.clone(),
                cabinet_id: cabinet.id.clone(),
                number: cabinet.number,
                status: cabinet.status.clone(),
                has_transaction: cabinet.transaction_id.is_some(),
                is_highlighted: last_unlocked == Some(&cabinet.id),
            })
        })
        .collect()
}

pub fn compute_terminal_view_model(state: &TerminalState) -> TerminalViewModel {
    TerminalViewModel {
        location: state.selected_location.as_ref().map(|l| l.to_string()),
        input_code: state.input_code.clone(),
        cabinets: visible_cabinets(
            &state.lockers,
            state.selected_location.as_ref(),
            state.last_unlocked.as_ref(),
        ),
        notice: state.notice.clone(),
        is_loading: state.is_loading,
        can_unlock: state.selected_location.is_some()
            && !state.input_code.is_empty()
            && !state.is_unlocking,
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Apply one action to the terminal state.
pub fn reduce_terminal_state(mut state: TerminalState, action: TerminalAction) -> TerminalState {
    match action {
        TerminalAction::LockersLoaded(lockers) => {
            state.lockers = lockers;
            state.is_loading = false;
        }
        TerminalAction::SelectLocation(location) => {
            state.selected_location = location;
            state.last_unlocked = None;
            state.notice = None;
        }
        TerminalAction::SetCode(code) => {
            state.input_code = code;
        }
        TerminalAction::UnlockStarted => {
            state.is_unlocking = true;
            state.notice = None;
        }
        TerminalAction::UnlockSucceeded(outcome) => {
            state.notice = Some(Notice::success(format!(
                "Cabinet {} is now {}",
                outcome.cabinet_number, outcome.new_status
            )));
            state.last_unlocked = Some(outcome.cabinet_id);
            state.lockers = outcome.lockers;
            state.input_code.clear();
            state.is_unlocking = false;
        }
        TerminalAction::UnlockFailed(failure) => {
            state.notice = Some(match failure {
                UnlockFailure::NoMatchingCode => Notice::warning(NO_MATCHING_CODE_MESSAGE),
                UnlockFailure::LocationNotSelected => Notice::warning("Select a location first."),
                UnlockFailure::TransactionNotSynced {
                    cabinet_id,
                    new_status,
                    message,
                } => {
                    // The backend already accepted the cabinet write.
                    state.lockers =
                        apply_cabinet_status(&state.lockers, &cabinet_id, &new_status, None);
                    Notice::error(message)
                }
                UnlockFailure::Failed(message) => Notice::error(message),
            });
            state.input_code.clear();
            state.is_unlocking = false;
        }
        TerminalAction::DismissNotice => {
            state.notice = None;
        }
    }
    state
}
