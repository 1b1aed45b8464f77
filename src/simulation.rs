//! Turn-by-turn combat resolver and the two-scenario range runners

use crate::curve::{damage_reduce_pct, stage_value};
use crate::enemy::{Action, Enemy};
use crate::optimizer::{best_combo_for_turn, ComboOutcome, ComboQuery};
use crate::skill::{Scenario, Skill};
use crate::stats::TurnRange;
use crate::status::{apply_action, tick_status, SimState};
use log::debug;
use serde::Serialize;

/// Player HP at the start of every fight
pub const STARTING_PLAYER_HP: f64 = 50.0;
pub const DEFAULT_TURN_CAP: u32 = 20;
pub const DEFAULT_PREFERENCE_WEIGHT: f64 = 1.0;
/// Coin budget of the pessimistic scenario
pub const MIN_SCENARIO_BUDGET: u32 = 1;

/// Combo label for a turn the enemy evaded
pub const EVADED_LABEL: &str = "evaded";

/// One row of the per-turn trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnLog {
    pub turn: u32,
    /// Enemy HP after the turn, heal included
    pub hp: f64,
    pub player_hp: f64,
    pub player_damage: f64,
    pub combo: String,
    /// Damage that landed on the enemy after shield and mitigation
    pub damage: f64,
    pub actions: Vec<String>,
    pub evaded: bool,
    pub effective_budget: u32,
}

/// Full outcome of one simulated fight
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// Enemy HP; index 0 is before the first turn
    pub hp_timeline: Vec<f64>,
    /// Player HP; index 0 is [`STARTING_PLAYER_HP`]
    pub player_hp_timeline: Vec<f64>,
    pub kill_turn: u32,
    pub killed: bool,
    pub player_defeated_turn: Option<u32>,
    pub last_combo: String,
    pub log: Vec<TurnLog>,
}

/// Raw damage of this turn's attacks, enemy buffs included
fn attack_damage(actions: &[Action], state: &SimState) -> f64 {
    actions
        .iter()
        .map(|action| match *action {
            Action::Attack { stage, hits } => {
                stage_value(stage.saturating_add(state.enemy_attack_buff).max(1)) * hits as f64
            }
            _ => 0.0,
        })
        .sum()
}

/// Simulate one fight until the enemy dies or `turn_cap` turns have passed.
///
/// Deterministic: the same inputs always give the same result. Combo search
/// only looks at the first [`MAX_COMBO_SKILLS`](crate::optimizer::MAX_COMBO_SKILLS) skills.
pub fn simulate(
    enemy: &Enemy,
    skills: &[Skill],
    coin_budget: u32,
    scenario: Scenario,
    turn_cap: u32,
    preference_weight: f64,
) -> SimulationResult {
    let mitigation = damage_reduce_pct(enemy.damage_reduce_stage);
    let mut state = SimState::new();

    let mut hp = enemy.hp as f64;
    let mut player_hp = STARTING_PLAYER_HP;
    let mut hp_timeline = vec![hp];
    let mut player_hp_timeline = vec![player_hp];
    let mut log = Vec::new();
    let mut last_combo = ComboOutcome::default().describe();
    let mut player_defeated_turn = None;

    let mut turns_played = 0;
    for turn in 1..=turn_cap {
        if hp <= 0.0 {
            break;
        }
        state.begin_turn();
        let actions = enemy.actions_for_turn(turn);

        // Stacks applied this turn only hurt from next turn on
        let poison_damage = state.poison_damage();
        for action in actions {
            apply_action(action, &mut state);
        }
        let incoming_attack = attack_damage(actions, &state);

        let effective_budget = state.effective_budget(coin_budget);
        let evaded = state.consume_evade();

        let (outcome, mut combo_damage) = if evaded {
            (ComboOutcome::default(), 0.0)
        } else {
            let query = ComboQuery {
                coin_budget: effective_budget,
                attack_stage_shift: state.attack_stage_shift(),
                scenario,
                cost_penalty: state.skill_cost_up,
                incoming_attack_damage: incoming_attack,
                poison_damage,
                preference_weight,
            };
            let outcome = best_combo_for_turn(skills, &query);
            let mut damage = outcome.damage;
            if state.reactive_shield_active() {
                let soaked = stage_value(state.reactive_shield) * outcome.hits as f64;
                damage = (damage - soaked).max(0.0);
            }
            (outcome, damage)
        };

        combo_damage = (combo_damage - state.shield).max(0.0);
        let dealt = combo_damage * (1.0 - mitigation);
        hp = (hp - dealt).max(0.0);

        let player_damage = poison_damage + (incoming_attack - outcome.block).max(0.0);
        player_hp = (player_hp - player_damage).max(0.0);
        if player_hp <= 0.0 && player_defeated_turn.is_none() {
            player_defeated_turn = Some(turn);
        }

        // Heal only lands if the enemy survived the hit; there is no max-HP cap
        if state.pending_heal > 0.0 && hp > 0.0 {
            hp += state.pending_heal;
        }

        let combo = if evaded {
            EVADED_LABEL.to_string()
        } else {
            outcome.describe()
        };
        debug!(
            target: "oracle.turn",
            "{} [{}] T{}: {} dealt={:.2} hp={:.2} took={:.2} player={:.2}",
            enemy.id, scenario, turn, combo, dealt, hp, player_damage, player_hp
        );

        hp_timeline.push(hp);
        player_hp_timeline.push(player_hp);
        log.push(TurnLog {
            turn,
            hp,
            player_hp,
            player_damage,
            combo: combo.clone(),
            damage: dealt,
            actions: actions.iter().map(|a| a.to_string()).collect(),
            evaded,
            effective_budget,
        });
        last_combo = combo;

        tick_status(&mut state);
        turns_played = turn;
    }

    SimulationResult {
        hp_timeline,
        player_hp_timeline,
        kill_turn: turns_played,
        killed: hp <= 0.0,
        player_defeated_turn,
        last_combo,
        log,
    }
}

/// Best-case and worst-case traces of one enemy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioDetails {
    /// `Max` scenario with the full coin budget
    pub best: SimulationResult,
    /// `Min` scenario with a single coin
    pub worst: SimulationResult,
}

/// Run both scenarios with an explicit turn cap and preference weight.
pub fn compute_scenario_details_with(
    enemy: &Enemy,
    skills: &[Skill],
    max_coin: u32,
    turn_cap: u32,
    preference_weight: f64,
) -> ScenarioDetails {
    ScenarioDetails {
        best: simulate(enemy, skills, max_coin, Scenario::Max, turn_cap, preference_weight),
        worst: simulate(
            enemy,
            skills,
            MIN_SCENARIO_BUDGET,
            Scenario::Min,
            turn_cap,
            preference_weight,
        ),
    }
}

/// Both scenario traces with the default cap and weight
pub fn compute_scenario_details(enemy: &Enemy, skills: &[Skill], max_coin: u32) -> ScenarioDetails {
    compute_scenario_details_with(
        enemy,
        skills,
        max_coin,
        DEFAULT_TURN_CAP,
        DEFAULT_PREFERENCE_WEIGHT,
    )
}

/// Optimistic/pessimistic kill-turn bracket with an explicit cap and weight.
pub fn compute_range_with(
    enemy: &Enemy,
    skills: &[Skill],
    max_coin: u32,
    turn_cap: u32,
    preference_weight: f64,
) -> TurnRange {
    let details =
        compute_scenario_details_with(enemy, skills, max_coin, turn_cap, preference_weight);
    let range = TurnRange::from_details(&details);
    debug!(
        target: "oracle.range",
        "{}: {}..{} turns ({} / {})",
        enemy.id, range.min_turn, range.max_turn, range.min_combo, range.max_combo
    );
    range
}

/// Kill-turn bracket: `Max` with `max_coin` coins vs `Min` with one coin.
pub fn compute_range(enemy: &Enemy, skills: &[Skill], max_coin: u32) -> TurnRange {
    compute_range_with(
        enemy,
        skills,
        max_coin,
        DEFAULT_TURN_CAP,
        DEFAULT_PREFERENCE_WEIGHT,
    )
}
