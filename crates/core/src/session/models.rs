#![allow(missing_docs)]

use chrono::{DateTime, Local};

use crate::models::{HandKind, SCORE_ADJUSTMENT};

/// Ledger entry written once per hand play.
#[derive(Debug, Clone, PartialEq)]
pub struct HandPlayRecord {
    pub hand: HandKind,
    pub hand_name: String,
    pub points_awarded: u32,
    pub score_after_play: u32,
    pub played_at: DateTime<Local>,
}

/// Manual correction applied to the running score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreAdjustment {
    Increase,
    Decrease,
}

impl ScoreAdjustment {
    pub fn delta(self) -> i64 {
        match self {
            ScoreAdjustment::Increase => i64::from(SCORE_ADJUSTMENT),
            ScoreAdjustment::Decrease => -i64::from(SCORE_ADJUSTMENT),
        }
    }
}

/// Every choice the player can make from the action menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PlayHand(HandKind),
    Analyze,
    Adjust(ScoreAdjustment),
    Quit,
}

impl Action {
    /// Menu order: the seven hands, analysis, +/- adjustments, quit.
    pub fn menu() -> Vec<Action> {
        let mut actions: Vec<Action> = HandKind::ALL.into_iter().map(Action::PlayHand).collect();
        actions.push(Action::Analyze);
        actions.push(Action::Adjust(ScoreAdjustment::Increase));
        actions.push(Action::Adjust(ScoreAdjustment::Decrease));
        actions.push(Action::Quit);
        actions
    }

    pub fn label(&self) -> String {
        match self {
            Action::PlayHand(kind) => format!("{} (+{} pts)", kind.name(), kind.points()),
            Action::Analyze => "[P] Analysis - hands needed".to_string(),
            Action::Adjust(ScoreAdjustment::Increase) => {
                format!("[+] Increase +{SCORE_ADJUSTMENT} pts")
            }
            Action::Adjust(ScoreAdjustment::Decrease) => {
                format!("[-] Decrease -{SCORE_ADJUSTMENT} pts")
            }
            Action::Quit => "[Q] Quit".to_string(),
        }
    }
}

/// How a session ended after its last hand play. Quitting is reported as
/// [`Step::Quit`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Finished(Outcome),
}

impl SessionStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, SessionStatus::Finished(_))
    }
}

/// One row of the remaining-hands analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination {
    pub hand: HandKind,
    pub quantity: u32,
    pub points: u32,
    pub total: u32,
}

impl Combination {
    /// Arithmetic breakdown, e.g. `4 × 750pts = 3000pts`.
    pub fn breakdown(&self) -> String {
        format!("{} × {}pts = {}pts", self.quantity, self.points, self.total)
    }
}

/// Result of projecting the remaining hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Current score already meets the target.
    TargetMet,
    /// Achievable single-hand strategies, fewest plays first. Empty when none fit.
    Combinations(Vec<Combination>),
}

/// Result of applying one [`Action`] to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Played {
        record: HandPlayRecord,
        status: SessionStatus,
    },
    Adjusted {
        score: u32,
    },
    Analysis(Projection),
    Quit,
}
