//! Design-time kill-turn oracle for a turn-based, coin-budgeted combat game.
//!
//! Given enemy scripts and the player's skill kit, [`simulate`] plays a fight
//! out deterministically, choosing the best affordable combo every turn.
//! [`compute_range`] brackets an enemy between a lucky and an unlucky run and
//! [`compute_round_range`] folds those brackets into per-round bounds.

pub mod config;
pub mod curve;
pub mod enemy;
pub mod optimizer;
pub mod simulation;
pub mod skill;
pub mod stats;
pub mod status;

pub use config::BalanceConfig;
pub use curve::{damage_reduce_pct, stage_value};
pub use enemy::{Action, Enemy};
pub use optimizer::{best_combo_for_turn, ComboOutcome, ComboQuery};
pub use simulation::{
    compute_range, compute_range_with, compute_scenario_details, compute_scenario_details_with,
    simulate, ScenarioDetails, SimulationResult, TurnLog,
};
pub use skill::{EffectSpec, Scenario, Skill, SkillCondition, SkillEffect};
pub use stats::{
    compute_pool_round_ranges, compute_roster_ranges, compute_roster_round_range,
    compute_round_range, EnemyRange, RoundRange, TurnRange,
};
pub use status::{apply_action, tick_status, PoisonStack, SimState};
