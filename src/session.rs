//! Terminal session: owns presentation state and drives the gateway.

use tracing::{info, warn};

use crate::access::{AccessController, UnlockOutcome};
use crate::error::Result;
use crate::gateway::LockerGateway;
use crate::presentation::{
    TerminalAction, TerminalState, TerminalViewModel, UnlockFailure, compute_terminal_view_model,
    reduce_terminal_state,
};
use crate::reconcile::reconcile;
use crate::types::Location;

pub struct TerminalSession<G> {
    gateway: G,
    state: TerminalState,
}

impl<G: LockerGateway> TerminalSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: TerminalState::loading(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> &TerminalState {
        &self.state
    }

    pub fn view(&self) -> TerminalViewModel {
        compute_terminal_view_model(&self.state)
    }

    fn dispatch(&mut self, action: TerminalAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce_terminal_state(state, action);
    }

    /// Load lockers and transactions and reconcile them.
    ///
    /// A failed read is treated as an empty collection so the terminal still
    /// comes up.
    pub async fn start(&mut self) {
        let lockers = match self.gateway.list_lockers().await {
            Ok(lockers) => lockers,
            Err(e) => {
                warn!("error fetching lockers: {e}");
                Vec::new()
            }
        };
        let transactions = match self.gateway.list_transactions().await {
            Ok(transactions) => transactions,
            Err(e) => {
                warn!("error fetching transactions: {e}");
                Vec::new()
            }
        };

        let lockers = reconcile(&lockers, &transactions);
        info!(
            lockers = lockers.len(),
            transactions = transactions.len(),
            "terminal loaded"
        );
        self.dispatch(TerminalAction::LockersLoaded(lockers));
    }

    pub fn select_location(&mut self, location: Option<Location>) {
        self.dispatch(TerminalAction::SelectLocation(location));
    }

    pub fn enter_code(&mut self, code: impl Into<String>) {
        self.dispatch(TerminalAction::SetCode(code.into()));
    }

    /// Try the entered code against the selected location.
    ///
    /// The state is updated either way; the result is returned so callers
    /// can report it.
    pub async fn unlock(&mut self) -> Result<UnlockOutcome> {
        self.dispatch(TerminalAction::UnlockStarted);

        let result = AccessController::new(&self.gateway)
            .unlock(
                &self.state.lockers,
                self.state.selected_location.as_ref(),
                &self.state.input_code,
            )
            .await;

        match &result {
            Ok(outcome) => self.dispatch(TerminalAction::UnlockSucceeded(outcome.clone())),
            Err(e) => self.dispatch(TerminalAction::UnlockFailed(UnlockFailure::from(e))),
        }
        result
    }
}
