#![allow(missing_docs)]

//! Session engine: state, transitions and remaining-hands projection.

mod engine;
mod models;
pub mod projection;

pub use engine::{parse_target, Session};
pub use models::{
    Action, Combination, HandPlayRecord, Outcome, Projection, ScoreAdjustment, SessionStatus,
    Step,
};
