#![warn(clippy::all, missing_docs)]

//! Core domain logic for handtally.
//!
//! This crate hosts the hand table, the session engine and its
//! remaining-hands projection, and configuration handling used by the
//! terminal UI and any future frontends.

pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use config::AppConfig;
pub use error::SessionError;
pub use models::{HandDefinition, HandKind, HAND_DEFINITIONS, SCORE_ADJUSTMENT, TOTAL_TURNS};
pub use session::{
    parse_target, Action, Combination, HandPlayRecord, Outcome, Projection, ScoreAdjustment,
    Session, SessionStatus, Step,
};
