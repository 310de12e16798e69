//! Process lifecycle state machine
//!
//! `Uninitialized -> Initializing -> Running -> ShuttingDown -> Terminated`.
//! Initialization may fail straight to `Terminated(Failure)`; no state is
//! ever re-entered.

use std::fmt;
use thiserror::Error;

/// How the process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Normal close
    Success,
    /// Initialization or the frame loop failed
    Failure,
}

/// Lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing has been created yet
    Uninitialized,
    /// Library, window and renderer are being created
    Initializing,
    /// The frame loop is running
    Running,
    /// The loop has exited and resources are being released
    ShuttingDown,
    /// Final state
    Terminated(Termination),
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "Uninitialized"),
            Self::Initializing => write!(f, "Initializing"),
            Self::Running => write!(f, "Running"),
            Self::ShuttingDown => write!(f, "ShuttingDown"),
            Self::Terminated(Termination::Success) => write!(f, "Terminated(success)"),
            Self::Terminated(Termination::Failure) => write!(f, "Terminated(failure)"),
        }
    }
}

/// Lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested transition is not an edge of the state machine
    #[error("Illegal lifecycle transition {from} -> {to}")]
    IllegalTransition {
        /// State before the attempt
        from: LifecycleState,
        /// Requested state
        to: LifecycleState,
    },
}

/// Tracks the process through its lifecycle
#[derive(Debug)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Start in `Uninitialized`
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
        }
    }

    /// Current state
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether `from -> to` is an edge of the state machine
    pub const fn is_allowed(from: LifecycleState, to: LifecycleState) -> bool {
        use LifecycleState::{Initializing, Running, ShuttingDown, Terminated, Uninitialized};

        matches!(
            (from, to),
            (Uninitialized, Initializing)
                | (Initializing, Running)
                | (Initializing, Terminated(Termination::Failure))
                | (Running, ShuttingDown)
                | (ShuttingDown, Terminated(_))
        )
    }

    /// Move to `to`, rejecting anything that is not an edge
    pub fn transition(&mut self, to: LifecycleState) -> Result<(), LifecycleError> {
        let from = self.state;
        if !Self::is_allowed(from, to) {
            log::error!("Rejected lifecycle transition {} -> {}", from, to);
            return Err(LifecycleError::IllegalTransition { from, to });
        }
        log::debug!("Lifecycle: {} -> {}", from, to);
        self.state = to;
        Ok(())
    }

    /// `Uninitialized -> Initializing`
    pub fn begin_initialization(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Initializing)
    }

    /// `Initializing -> Running`
    pub fn start_running(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Running)
    }

    /// `Running -> ShuttingDown`
    pub fn begin_shutdown(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::ShuttingDown)
    }

    /// Enter the final state
    pub fn terminate(&mut self, outcome: Termination) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Terminated(outcome))
    }

    /// Whether the final state has been reached
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, LifecycleState::Terminated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_lifecycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);

        lifecycle.begin_initialization().unwrap();
        lifecycle.start_running().unwrap();
        lifecycle.begin_shutdown().unwrap();
        lifecycle.terminate(Termination::Success).unwrap();

        assert_eq!(lifecycle.state(), LifecycleState::Terminated(Termination::Success));
        assert!(lifecycle.is_terminated());
    }

    #[test]
    fn test_initialization_can_fail_directly() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin_initialization().unwrap();
        lifecycle.terminate(Termination::Failure).unwrap();
        assert_eq!(lifecycle.state(), LifecycleState::Terminated(Termination::Failure));
    }

    #[test]
    fn test_runtime_failure_goes_through_shutdown() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin_initialization().unwrap();
        lifecycle.start_running().unwrap();
        // Running cannot skip ShuttingDown
        assert!(lifecycle.terminate(Termination::Failure).is_err());
        lifecycle.begin_shutdown().unwrap();
        lifecycle.terminate(Termination::Failure).unwrap();
    }

    #[test]
    fn test_initialization_cannot_succeed_without_running() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin_initialization().unwrap();
        let err = lifecycle.terminate(Termination::Success).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                from: LifecycleState::Initializing,
                to: LifecycleState::Terminated(Termination::Success),
            }
        );
        // Rejected transitions leave the state alone
        assert_eq!(lifecycle.state(), LifecycleState::Initializing);
    }

    #[test]
    fn test_no_state_is_reentered() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.begin_initialization().unwrap();
        assert!(lifecycle.begin_initialization().is_err());
        lifecycle.start_running().unwrap();
        assert!(lifecycle.start_running().is_err());
        lifecycle.begin_shutdown().unwrap();
        assert!(lifecycle.start_running().is_err());
        lifecycle.terminate(Termination::Success).unwrap();
        assert!(lifecycle.terminate(Termination::Success).is_err());
        assert!(lifecycle.begin_initialization().is_err());
    }

    #[test]
    fn test_skipping_states_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.start_running().is_err());
        assert!(lifecycle.begin_shutdown().is_err());
        assert!(lifecycle.terminate(Termination::Failure).is_err());
        assert_eq!(lifecycle.state(), LifecycleState::Uninitialized);
    }

    #[test]
    fn test_error_message_names_states() {
        let err = LifecycleError::IllegalTransition {
            from: LifecycleState::Running,
            to: LifecycleState::Initializing,
        };
        assert_eq!(err.to_string(), "Illegal lifecycle transition Running -> Initializing");
    }
}
