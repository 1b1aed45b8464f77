//! Stage-value curve and damage mitigation.
//!
//! Every numeric quantity in the simulator (damage, block, heal, poison) is a
//! sum of `stage_value` terms, so this table is the single source of truth for
//! balance magnitudes.

/// Lowest design stage.
pub const MIN_STAGE: i32 = 1;
/// Highest design stage.
pub const MAX_STAGE: i32 = 10;

/// Stage -> magnitude lookup. Index 0 is a sentinel and never returned.
pub const STAGE_TABLE: [f64; 11] = [0.0, 1.0, 1.3, 1.7, 2.2, 3.0, 4.0, 5.3, 7.0, 9.0, 12.0];

/// Mitigation gained per damage-reduce stage.
pub const DAMAGE_REDUCE_PER_STAGE: f64 = 0.03;
/// Mitigation never exceeds this fraction.
pub const DAMAGE_REDUCE_CAP: f64 = 0.45;

/// Convert a design stage into a concrete magnitude.
///
/// Stages outside `[1, 10]` are clamped, so the result is always one of the
/// table's non-sentinel entries.
#[inline]
pub fn stage_value(stage: i32) -> f64 {
    STAGE_TABLE[stage.clamp(MIN_STAGE, MAX_STAGE) as usize]
}

/// Fraction of incoming damage an enemy shrugs off at the given reduce stage.
///
/// Only applies to damage dealt *to* the enemy.
#[inline]
pub fn damage_reduce_pct(stage: i32) -> f64 {
    (stage.max(0) as f64 * DAMAGE_REDUCE_PER_STAGE).min(DAMAGE_REDUCE_CAP)
}
