//! Timed status effects threaded through a single simulation
//!
//! A [`SimState`] is created fresh for every `simulate` call. Enemy actions are
//! folded into it with [`apply_action`] and durations advance once per turn
//! with [`tick_status`]. Every timed amount is paired with a turns-remaining
//! counter and drops back to neutral on the tick that takes the counter to 0.

use crate::curve::stage_value;
use crate::enemy::Action;
use log::trace;
use serde::Serialize;

/// Multiplier applied to the coin budget while hallucinating
pub const HALLUCINATION_BUDGET_FACTOR: f64 = 0.7;

/// One independently expiring poison application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoisonStack {
    pub stage: i32,
    pub turns_remaining: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimState {
    // Player attack debuff, in stages
    pub attack_debuff: i32,
    pub attack_debuff_turns: u32,
    pub hallucination_turns: u32,
    pub evade_charges: u32,
    // Per-turn only; cleared by begin_turn
    pub shield: f64,
    pub pending_heal: f64,
    // Extra coins charged per skill in a combo
    pub skill_cost_up: i32,
    pub skill_cost_up_turns: u32,
    // Stage of damage soaked per landed hit
    pub reactive_shield: i32,
    pub reactive_shield_turns: u32,
    pub enemy_attack_buff: i32,
    pub enemy_attack_buff_turns: u32,
    pub poison: Vec<PoisonStack>,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the modifiers that only live for one turn
    pub fn begin_turn(&mut self) {
        self.shield = 0.0;
        self.pending_heal = 0.0;
    }

    /// Stage shift applied to the player's damage effects
    pub fn attack_stage_shift(&self) -> i32 {
        self.attack_debuff.saturating_neg()
    }

    pub fn is_hallucinating(&self) -> bool {
        self.hallucination_turns > 0
    }

    pub fn reactive_shield_active(&self) -> bool {
        self.reactive_shield > 0
    }

    /// Damage the player takes from every active poison stack this turn
    pub fn poison_damage(&self) -> f64 {
        self.poison.iter().map(|p| stage_value(p.stage)).sum()
    }

    /// Coin budget the optimizer actually gets this turn. Never below 1.
    pub fn effective_budget(&self, coin_budget: u32) -> u32 {
        let factor = if self.is_hallucinating() {
            HALLUCINATION_BUDGET_FACTOR
        } else {
            1.0
        };
        ((coin_budget as f64 * factor).floor() as u32).max(1)
    }

    /// Spend the evasion charge if one is held
    pub fn consume_evade(&mut self) -> bool {
        if self.evade_charges > 0 {
            self.evade_charges -= 1;
            true
        } else {
            false
        }
    }
}

/// Fold one enemy action into the status state.
pub fn apply_action(action: &Action, state: &mut SimState) {
    trace!(target: "oracle.status", "apply {}", action);
    match *action {
        Action::AttackDebuff { stage, duration } => {
            state.attack_debuff = state.attack_debuff.saturating_add(stage);
            state.attack_debuff_turns = state.attack_debuff_turns.max(duration);
        }
        Action::Hallucination { duration } => {
            state.hallucination_turns = state.hallucination_turns.max(duration);
        }
        Action::Evade => {
            state.evade_charges = 1;
        }
        Action::Defend { stage } => {
            state.shield += stage_value(stage);
        }
        Action::Heal { stage } => {
            state.pending_heal += stage_value(stage);
        }
        Action::SkillCostUp { stage, duration } => {
            state.skill_cost_up = state.skill_cost_up.saturating_add(stage);
            state.skill_cost_up_turns = state.skill_cost_up_turns.max(duration);
        }
        Action::ReactiveShield { stage, duration } => {
            state.reactive_shield = stage;
            state.reactive_shield_turns = state.reactive_shield_turns.max(duration);
        }
        Action::MonsterBuff { stage, duration } => {
            state.enemy_attack_buff = state.enemy_attack_buff.saturating_add(stage);
            state.enemy_attack_buff_turns = state.enemy_attack_buff_turns.max(duration);
        }
        Action::Poison { stage, duration } => {
            state.poison.push(PoisonStack {
                stage,
                turns_remaining: duration,
            });
        }
        // Attacks are resolved by the turn loop, not stored
        Action::Attack { .. } => {}
        // Known gap: bind is authored but has no mechanic
        Action::Bind { .. } => {}
        Action::Unknown => {}
    }
}

fn tick_timed(amount: &mut i32, turns: &mut u32) {
    *turns = turns.saturating_sub(1);
    if *turns == 0 {
        *amount = 0;
    }
}

/// Advance every duration by one turn.
pub fn tick_status(state: &mut SimState) {
    tick_timed(&mut state.attack_debuff, &mut state.attack_debuff_turns);
    tick_timed(&mut state.skill_cost_up, &mut state.skill_cost_up_turns);
    tick_timed(&mut state.reactive_shield, &mut state.reactive_shield_turns);
    tick_timed(&mut state.enemy_attack_buff, &mut state.enemy_attack_buff_turns);
    state.hallucination_turns = state.hallucination_turns.saturating_sub(1);

    for stack in &mut state.poison {
        stack.turns_remaining = stack.turns_remaining.saturating_sub(1);
    }
    state.poison.retain(|p| p.turns_remaining > 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_debuff_stacks_and_keeps_longest_duration() {
        let mut state = SimState::new();
        apply_action(&Action::AttackDebuff { stage: 1, duration: 3 }, &mut state);
        apply_action(&Action::AttackDebuff { stage: 2, duration: 1 }, &mut state);
        assert_eq!(state.attack_debuff, 3);
        assert_eq!(state.attack_debuff_turns, 3);
        assert_eq!(state.attack_stage_shift(), -3);
    }

    #[test]
    fn timed_amount_resets_on_the_tick_that_expires_it() {
        let mut state = SimState::new();
        apply_action(&Action::MonsterBuff { stage: 2, duration: 2 }, &mut state);
        tick_status(&mut state);
        assert_eq!(state.enemy_attack_buff, 2);
        assert_eq!(state.enemy_attack_buff_turns, 1);
        tick_status(&mut state);
        assert_eq!(state.enemy_attack_buff, 0);
        assert_eq!(state.enemy_attack_buff_turns, 0);
    }

    #[test]
    fn zero_duration_effects_last_only_the_current_turn() {
        let mut state = SimState::new();
        apply_action(&Action::SkillCostUp { stage: 1, duration: 0 }, &mut state);
        assert_eq!(state.skill_cost_up, 1);
        tick_status(&mut state);
        assert_eq!(state.skill_cost_up, 0);
    }

    #[test]
    fn reactive_shield_overwrites_amount() {
        let mut state = SimState::new();
        apply_action(&Action::ReactiveShield { stage: 4, duration: 2 }, &mut state);
        apply_action(&Action::ReactiveShield { stage: 1, duration: 1 }, &mut state);
        assert_eq!(state.reactive_shield, 1);
        assert_eq!(state.reactive_shield_turns, 2);
        assert!(state.reactive_shield_active());
    }

    #[test]
    fn evade_never_exceeds_one_charge() {
        let mut state = SimState::new();
        apply_action(&Action::Evade, &mut state);
        apply_action(&Action::Evade, &mut state);
        assert_eq!(state.evade_charges, 1);
        assert!(state.consume_evade());
        assert!(!state.consume_evade());
    }

    #[test]
    fn shield_and_heal_are_cleared_each_turn() {
        let mut state = SimState::new();
        apply_action(&Action::Defend { stage: 5 }, &mut state);
        apply_action(&Action::Defend { stage: 1 }, &mut state);
        apply_action(&Action::Heal { stage: 3 }, &mut state);
        assert_eq!(state.shield, 4.0);
        assert_eq!(state.pending_heal, 1.7);
        state.begin_turn();
        assert_eq!(state.shield, 0.0);
        assert_eq!(state.pending_heal, 0.0);
    }

    #[test]
    fn poison_stacks_expire_independently() {
        let mut state = SimState::new();
        apply_action(&Action::Poison { stage: 2, duration: 1 }, &mut state);
        apply_action(&Action::Poison { stage: 5, duration: 3 }, &mut state);
        assert_eq!(state.poison_damage(), 1.3 + 3.0);

        tick_status(&mut state);
        assert_eq!(state.poison, vec![PoisonStack { stage: 5, turns_remaining: 2 }]);
        tick_status(&mut state);
        assert_eq!(state.poison.len(), 1);
        tick_status(&mut state);
        assert!(state.poison.is_empty());
        assert_eq!(state.poison_damage(), 0.0);
    }

    #[test]
    fn hallucination_shrinks_budget_with_floor_of_one() {
        let mut state = SimState::new();
        assert_eq!(state.effective_budget(3), 3);
        assert_eq!(state.effective_budget(0), 1);
        apply_action(&Action::Hallucination { duration: 2 }, &mut state);
        assert_eq!(state.effective_budget(3), 2);
        assert_eq!(state.effective_budget(10), 7);
        assert_eq!(state.effective_budget(1), 1);
        tick_status(&mut state);
        tick_status(&mut state);
        assert!(!state.is_hallucinating());
        assert_eq!(state.effective_budget(3), 3);
    }

    #[test]
    fn bind_and_unknown_are_no_ops() {
        let mut state = SimState::new();
        apply_action(&Action::Bind { duration: 3 }, &mut state);
        apply_action(&Action::Unknown, &mut state);
        apply_action(&Action::Attack { stage: 9, hits: 2 }, &mut state);
        assert_eq!(state, SimState::new());
    }

    #[test]
    fn extreme_stages_saturate_instead_of_wrapping() {
        let mut state = SimState::new();
        apply_action(&Action::AttackDebuff { stage: i32::MIN, duration: 1 }, &mut state);
        assert_eq!(state.attack_stage_shift(), i32::MAX);

        let mut state = SimState::new();
        apply_action(&Action::AttackDebuff { stage: i32::MAX, duration: 1 }, &mut state);
        apply_action(&Action::AttackDebuff { stage: 5, duration: 1 }, &mut state);
        assert_eq!(state.attack_debuff, i32::MAX);
        assert_eq!(state.attack_stage_shift(), -i32::MAX);

        apply_action(&Action::MonsterBuff { stage: i32::MAX, duration: 1 }, &mut state);
        apply_action(&Action::MonsterBuff { stage: i32::MAX, duration: 1 }, &mut state);
        assert_eq!(state.enemy_attack_buff, i32::MAX);

        apply_action(&Action::SkillCostUp { stage: i32::MIN, duration: 1 }, &mut state);
        apply_action(&Action::SkillCostUp { stage: -1, duration: 1 }, &mut state);
        assert_eq!(state.skill_cost_up, i32::MIN);
    }
}
