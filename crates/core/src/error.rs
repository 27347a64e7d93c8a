//! Error types raised by the session engine.

use thiserror::Error;

/// Failures reported by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Target score text was not a positive integer.
    #[error("invalid target score '{0}': enter a whole number greater than 0")]
    InvalidTarget(String),

    /// Hand key outside the fixed hand table.
    #[error("unknown hand '{0}'")]
    UnknownHand(String),

    /// A hand was played after the last turn was used.
    #[error("no turns left in this session")]
    NoTurnsLeft,
}
