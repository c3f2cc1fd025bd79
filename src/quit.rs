// src/quit.rs
//! Quit negotiation between a window close and the application.
//!
//! ```text
//! Running --close--> QuitRequested --handler returned--> QuitOrdered --cleanup--> Terminated
//!    ^                     |
//!    +------cancel---------+
//! ```
//!
//! `QuitRequested` only exists while the `QuitRequested` event is being
//! delivered, so a cancel outside that delivery has nothing to undo.

use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuitState {
    #[default]
    Running,
    QuitRequested,
    QuitOrdered,
    Terminated,
}

/// Inputs to the quit state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitInput {
    /// The OS asked to close the window.
    CloseSignal,
    /// The application called `cancel_quit`.
    CancelQuit,
    /// The handler returned from a `QuitRequested` delivery.
    HandlerReturned,
    /// Cleanup ran and native resources are released.
    CleanupComplete,
}

/// What the event loop must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitAction {
    None,
    /// Deliver a `QuitRequested` event to the handler now.
    DeliverQuitRequested,
    /// Tell the native pump to stop.
    SignalPump,
}

/// The whole quit handshake as one function.
pub fn transition(state: QuitState, input: QuitInput) -> (QuitState, QuitAction) {
    use QuitAction as A;
    use QuitInput as I;
    use QuitState as S;

    match (state, input) {
        (S::Terminated, _) => (S::Terminated, A::None),
        (_, I::CleanupComplete) => (S::Terminated, A::None),

        (S::Running, I::CloseSignal) => (S::QuitRequested, A::DeliverQuitRequested),
        (S::QuitOrdered, I::CloseSignal) => (S::QuitOrdered, A::SignalPump),
        (S::QuitRequested, I::CloseSignal) => (S::QuitRequested, A::None),

        (S::QuitRequested, I::CancelQuit) => (S::Running, A::None),
        (state, I::CancelQuit) => (state, A::None),

        (S::QuitRequested, I::HandlerReturned) => (S::QuitOrdered, A::SignalPump),
        (state, I::HandlerReturned) => (state, A::None),
    }
}

/// Holds the quit state for one event loop.
#[derive(Debug, Default)]
pub struct QuitNegotiator {
    state: QuitState,
}

impl QuitNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> QuitState {
        self.state
    }

    pub fn apply(&mut self, input: QuitInput) -> QuitAction {
        let (next, action) = transition(self.state, input);
        if next != self.state {
            match next {
                QuitState::QuitOrdered | QuitState::Terminated => {
                    info!("Quit: {:?} -> {:?} on {:?}", self.state, next, input)
                }
                _ => debug!("Quit: {:?} -> {:?} on {:?}", self.state, next, input),
            }
        }
        self.state = next;
        action
    }

    /// A close is pending or has been ordered.
    pub fn quit_requested(&self) -> bool {
        matches!(
            self.state,
            QuitState::QuitRequested | QuitState::QuitOrdered | QuitState::Terminated
        )
    }

    /// The close survived delivery and the pump has been told to stop.
    pub fn quit_ordered(&self) -> bool {
        matches!(self.state, QuitState::QuitOrdered | QuitState::Terminated)
    }
}
