//! Shared domain models.

use std::{fmt, str::FromStr};

use crate::error::SessionError;

/// Number of turns available in a fresh session.
pub const TOTAL_TURNS: u8 = 10;

/// Magnitude of a single manual score adjustment.
pub const SCORE_ADJUSTMENT: u32 = 50;

/// Scoring hand types recognised by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKind {
    /// Five gems of one colour.
    Flush,
    /// Four matching gems.
    FourOfAKind,
    /// Three plus two matching gems.
    FullHouse,
    /// Three matching gems.
    ThreeOfAKind,
    /// Two pairs of matching gems.
    TwoPair,
    /// Five distinct colours.
    Spectrum,
    /// Two matching gems.
    Pair,
}

impl HandKind {
    /// Every hand, in declaration order.
    pub const ALL: [HandKind; 7] = [
        HandKind::Flush,
        HandKind::FourOfAKind,
        HandKind::FullHouse,
        HandKind::ThreeOfAKind,
        HandKind::TwoPair,
        HandKind::Spectrum,
        HandKind::Pair,
    ];

    /// Static definition (name and points) for this hand.
    pub fn definition(self) -> &'static HandDefinition {
        &HAND_DEFINITIONS[self as usize]
    }

    /// Display name shown in menus and history.
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    /// Points awarded for one play of this hand.
    pub fn points(self) -> u32 {
        self.definition().points
    }

    /// Stable textual key, e.g. `fourOfAKind`.
    pub fn key(self) -> &'static str {
        match self {
            HandKind::Flush => "flush",
            HandKind::FourOfAKind => "fourOfAKind",
            HandKind::FullHouse => "fullHouse",
            HandKind::ThreeOfAKind => "threeOfAKind",
            HandKind::TwoPair => "twoPair",
            HandKind::Spectrum => "spectrum",
            HandKind::Pair => "pair",
        }
    }

    /// Look up a hand by its position in the menu (zero based).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for HandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandKind {
    type Err = SessionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        HandKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(needle))
            .ok_or_else(|| SessionError::UnknownHand(needle.to_string()))
    }
}

/// Immutable description of a scoring hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandDefinition {
    /// Hand identifier.
    pub kind: HandKind,
    /// Human-readable name.
    pub name: &'static str,
    /// Points awarded per play.
    pub points: u32,
}

/// Fixed hand table, indexed by `HandKind as usize`.
pub const HAND_DEFINITIONS: [HandDefinition; 7] = [
    HandDefinition {
        kind: HandKind::Flush,
        name: "Flush",
        points: 750,
    },
    HandDefinition {
        kind: HandKind::FourOfAKind,
        name: "4 of a Kind",
        points: 500,
    },
    HandDefinition {
        kind: HandKind::FullHouse,
        name: "Full House",
        points: 350,
    },
    HandDefinition {
        kind: HandKind::ThreeOfAKind,
        name: "3 of a Kind",
        points: 200,
    },
    HandDefinition {
        kind: HandKind::TwoPair,
        name: "2 Pair",
        points: 150,
    },
    HandDefinition {
        kind: HandKind::Spectrum,
        name: "Spectrum",
        points: 100,
    },
    HandDefinition {
        kind: HandKind::Pair,
        name: "Pair",
        points: 50,
    },
];
