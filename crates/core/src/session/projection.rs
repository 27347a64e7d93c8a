//! Minimal remaining-hands projection.

use crate::models::HAND_DEFINITIONS;

use super::models::{Combination, Projection};

/// Project how many plays of each single hand type would close the gap.
///
/// Combinations needing more plays than `turns_remaining` are dropped. The
/// rest are ordered by quantity; `sort_by_key` is stable so equal quantities
/// keep the hand table order.
pub fn project(target_score: u32, current_score: u32, turns_remaining: u8) -> Projection {
    if current_score >= target_score {
        return Projection::TargetMet;
    }
    let remaining = target_score - current_score;

    let mut combinations: Vec<Combination> = HAND_DEFINITIONS
        .iter()
        .map(|definition| {
            let quantity = remaining.div_ceil(definition.points);
            Combination {
                hand: definition.kind,
                quantity,
                points: definition.points,
                total: quantity.saturating_mul(definition.points),
            }
        })
        .filter(|combo| combo.quantity <= u32::from(turns_remaining))
        .collect();
    combinations.sort_by_key(|combo| combo.quantity);

    Projection::Combinations(combinations)
}
