//! Session state and the transitions applied to it.

use chrono::Local;
use tracing::{debug, info};

use crate::{
    error::SessionError,
    models::{HandKind, TOTAL_TURNS},
};

use super::{
    models::{
        Action, HandPlayRecord, Outcome, Projection, ScoreAdjustment, SessionStatus, Step,
    },
    projection,
};

/// Parse user-entered target text into a positive score.
pub fn parse_target(input: &str) -> Result<u32, SessionError> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(SessionError::InvalidTarget(trimmed.to_string())),
    }
}

/// Mutable state of one scoring session.
///
/// A new value is built for every session; dropping it discards the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    target_score: u32,
    current_score: u32,
    turns_remaining: u8,
    history: Vec<HandPlayRecord>,
}

impl Session {
    /// Start a session aiming for `target_score`.
    pub fn new(target_score: u32) -> Result<Self, SessionError> {
        if target_score == 0 {
            return Err(SessionError::InvalidTarget(target_score.to_string()));
        }
        info!(target_score, turns = TOTAL_TURNS, "Session started");
        Ok(Self {
            target_score,
            current_score: 0,
            turns_remaining: TOTAL_TURNS,
            history: Vec::new(),
        })
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn turns_remaining(&self) -> u8 {
        self.turns_remaining
    }

    /// Hand plays so far, oldest first.
    pub fn history(&self) -> &[HandPlayRecord] {
        &self.history
    }

    /// Progress towards the target as a percentage. Exceeds 100 on overshoot.
    pub fn progress_percent(&self) -> f64 {
        f64::from(self.current_score) / f64::from(self.target_score) * 100.0
    }

    /// Record one play of `hand`, consuming a turn.
    pub fn play_hand(&mut self, hand: HandKind) -> Result<&HandPlayRecord, SessionError> {
        if self.turns_remaining == 0 {
            return Err(SessionError::NoTurnsLeft);
        }
        let points = hand.points();
        let score_after_play = self.current_score.saturating_add(points);
        self.history.push(HandPlayRecord {
            hand,
            hand_name: hand.name().to_string(),
            points_awarded: points,
            score_after_play,
            played_at: Local::now(),
        });
        self.current_score = score_after_play;
        self.turns_remaining -= 1;
        info!(
            hand = hand.key(),
            points,
            score = self.current_score,
            turns_remaining = self.turns_remaining,
            "Hand played"
        );
        Ok(&self.history[self.history.len() - 1])
    }

    /// Play a hand identified by its textual key (e.g. `fullHouse`).
    pub fn play_hand_by_key(&mut self, key: &str) -> Result<&HandPlayRecord, SessionError> {
        let hand = key.parse::<HandKind>()?;
        self.play_hand(hand)
    }

    /// Apply a +/- correction, flooring the score at zero.
    pub fn adjust_score(&mut self, adjustment: ScoreAdjustment) -> u32 {
        let adjusted = (i64::from(self.current_score) + adjustment.delta()).max(0);
        self.current_score = u32::try_from(adjusted).unwrap_or(u32::MAX);
        debug!(?adjustment, score = self.current_score, "Score adjusted");
        self.current_score
    }

    /// Fewest-plays strategies still able to reach the target.
    pub fn project(&self) -> Projection {
        projection::project(self.target_score, self.current_score, self.turns_remaining)
    }

    /// Classification used after a hand play.
    pub fn status(&self) -> SessionStatus {
        if self.current_score >= self.target_score {
            SessionStatus::Finished(Outcome::Won)
        } else if self.turns_remaining == 0 {
            SessionStatus::Finished(Outcome::Exhausted)
        } else {
            SessionStatus::InProgress
        }
    }

    /// Apply a menu action and report what happened.
    pub fn apply(&mut self, action: Action) -> Result<Step, SessionError> {
        match action {
            Action::PlayHand(hand) => {
                let record = self.play_hand(hand)?.clone();
                let status = self.status();
                if let SessionStatus::Finished(outcome) = status {
                    info!(
                        ?outcome,
                        score = self.current_score,
                        target_score = self.target_score,
                        "Session finished"
                    );
                }
                Ok(Step::Played { record, status })
            }
            Action::Analyze => {
                let projection = self.project();
                debug!(?projection, "Analysis requested");
                Ok(Step::Analysis(projection))
            }
            Action::Adjust(adjustment) => Ok(Step::Adjusted {
                score: self.adjust_score(adjustment),
            }),
            Action::Quit => {
                info!(score = self.current_score, "Session quit");
                Ok(Step::Quit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::models::Combination;

    #[test]
    fn fresh_session_defaults() -> Result<(), SessionError> {
        for target in [1, 100, 3000, u32::MAX] {
            let session = Session::new(target)?;
            assert_eq!(session.target_score(), target);
            assert_eq!(session.current_score(), 0);
            assert_eq!(session.turns_remaining(), 10);
            assert!(session.history().is_empty());
            assert_eq!(session.status(), SessionStatus::InProgress);
        }
        Ok(())
    }

    #[test]
    fn zero_target_is_rejected() {
        assert_eq!(
            Session::new(0),
            Err(SessionError::InvalidTarget("0".to_string()))
        );
    }

    #[test]
    fn parse_target_accepts_only_positive_integers() {
        assert_eq!(parse_target(" 3000 "), Ok(3000));
        for bad in ["", "abc", "0", "-5", "12.5", "99999999999"] {
            assert!(
                matches!(parse_target(bad), Err(SessionError::InvalidTarget(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn each_play_appends_one_record_and_uses_one_turn() -> Result<(), SessionError> {
        let mut session = Session::new(100_000)?;
        for (idx, hand) in HandKind::ALL.into_iter().enumerate() {
            let before = session.current_score();
            let turns = session.turns_remaining();
            let record = session.play_hand(hand)?.clone();
            assert_eq!(record.hand_name, hand.name());
            assert_eq!(record.points_awarded, hand.points());
            assert_eq!(record.score_after_play, before + hand.points());
            assert_eq!(session.current_score(), before + hand.points());
            assert_eq!(session.turns_remaining(), turns - 1);
            assert_eq!(session.history().len(), idx + 1);
        }
        Ok(())
    }

    #[test]
    fn play_by_key_rejects_unknown_hands() -> Result<(), SessionError> {
        let mut session = Session::new(500)?;
        session.play_hand_by_key("fullHouse")?;
        assert_eq!(session.current_score(), 350);
        assert_eq!(
            session.play_hand_by_key("straight").map(|record| record.points_awarded),
            Err(SessionError::UnknownHand("straight".to_string()))
        );
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.turns_remaining(), 9);
        Ok(())
    }

    #[test]
    fn adjustments_floor_at_zero_and_keep_turns() -> Result<(), SessionError> {
        let mut session = Session::new(1000)?;
        assert_eq!(session.adjust_score(ScoreAdjustment::Decrease), 0);
        assert_eq!(session.adjust_score(ScoreAdjustment::Increase), 50);
        assert_eq!(session.adjust_score(ScoreAdjustment::Increase), 100);
        session.play_hand(HandKind::Pair)?;
        assert_eq!(session.current_score(), 150);
        for _ in 0..5 {
            session.adjust_score(ScoreAdjustment::Decrease);
        }
        assert_eq!(session.current_score(), 0);
        assert_eq!(session.turns_remaining(), 9);
        assert_eq!(session.history().len(), 1);
        Ok(())
    }

    #[test]
    fn projection_tracks_flush_run_until_win() -> Result<(), SessionError> {
        let mut session = Session::new(3000)?;
        for _ in 0..3 {
            let step = session.apply(Action::PlayHand(HandKind::Flush))?;
            assert!(matches!(
                step,
                Step::Played {
                    status: SessionStatus::InProgress,
                    ..
                }
            ));
        }
        assert_eq!(session.current_score(), 2250);
        assert_eq!(session.turns_remaining(), 7);

        match session.apply(Action::Analyze)? {
            Step::Analysis(Projection::Combinations(list)) => {
                assert_eq!(
                    list[0],
                    Combination {
                        hand: HandKind::Flush,
                        quantity: 1,
                        points: 750,
                        total: 750,
                    }
                );
                assert!(list.iter().all(|combo| combo.quantity <= 7));
            }
            other => panic!("unexpected step: {other:?}"),
        }

        let step = session.apply(Action::PlayHand(HandKind::Flush))?;
        assert!(matches!(
            step,
            Step::Played {
                status: SessionStatus::Finished(Outcome::Won),
                ..
            }
        ));
        assert_eq!(session.turns_remaining(), 6);
        assert_eq!(session.project(), Projection::TargetMet);
        Ok(())
    }

    #[test]
    fn ten_pairs_exhaust_an_unreachable_target() -> Result<(), SessionError> {
        let mut session = Session::new(1000)?;
        let mut last = None;
        for _ in 0..10 {
            last = Some(session.apply(Action::PlayHand(HandKind::Pair))?);
        }
        assert_eq!(session.turns_remaining(), 0);
        assert_eq!(session.current_score(), 500);
        assert!(matches!(
            last,
            Some(Step::Played {
                status: SessionStatus::Finished(Outcome::Exhausted),
                ..
            })
        ));
        assert_eq!(session.play_hand(HandKind::Pair), Err(SessionError::NoTurnsLeft));
        assert_eq!(session.history().len(), 10);
        assert_eq!(session.project(), Projection::Combinations(Vec::new()));
        Ok(())
    }

    #[test]
    fn small_target_is_won_by_second_pair() -> Result<(), SessionError> {
        let mut session = Session::new(100)?;
        session.play_hand(HandKind::Pair)?;
        assert_eq!(session.status(), SessionStatus::InProgress);
        session.play_hand(HandKind::Pair)?;
        assert_eq!(session.status(), SessionStatus::Finished(Outcome::Won));
        assert_eq!(session.turns_remaining(), 8);
        Ok(())
    }

    #[test]
    fn analysis_and_quit_leave_state_untouched() -> Result<(), SessionError> {
        let mut session = Session::new(800)?;
        session.play_hand(HandKind::FullHouse)?;
        let snapshot = session.clone();
        session.apply(Action::Analyze)?;
        session.apply(Action::Analyze)?;
        assert_eq!(session.apply(Action::Quit)?, Step::Quit);
        assert_eq!(session, snapshot);
        Ok(())
    }

    #[test]
    fn quitting_does_not_finish_the_session() -> Result<(), SessionError> {
        let mut session = Session::new(3000)?;
        session.play_hand(HandKind::Flush)?;
        assert_eq!(session.apply(Action::Quit)?, Step::Quit);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert!(!session.status().is_finished());
        Ok(())
    }

    #[test]
    fn progress_is_relative_to_target() -> Result<(), SessionError> {
        let mut session = Session::new(3000)?;
        session.play_hand(HandKind::Flush)?;
        assert!((session.progress_percent() - 25.0).abs() < f64::EPSILON);
        Ok(())
    }
}
