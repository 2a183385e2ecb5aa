//! Error types
//!
//! The simulation has no recoverable runtime failures. What can go wrong is a
//! bad level table, a lookup for a level that does not exist, or a phase
//! transition requested from the wrong phase.

use thiserror::Error;

use crate::sim::GamePhase;

/// Level table lookup and loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("level {0} is not defined")]
    UnknownLevel(u8),

    #[error("failed to parse level table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level {level} is invalid: {reason}")]
    Invalid { level: u8, reason: &'static str },

    #[error("level table is empty")]
    Empty,
}

/// A phase change that the state machine does not allow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} while in {from:?}")]
    Invalid {
        from: GamePhase,
        action: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}
