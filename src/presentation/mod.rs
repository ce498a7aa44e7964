//! Presentation state for the terminal screen.

pub mod model;
pub mod notice;

pub use model::{
    CabinetView, TerminalAction, TerminalState, TerminalViewModel, UnlockFailure,
    compute_terminal_view_model, reduce_terminal_state, visible_cabinets,
};
pub use notice::{Notice, NoticeLevel};
