//! Enemy definitions and their scripted per-turn actions

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_stage() -> i32 {
    1
}

fn default_hits() -> u32 {
    1
}

/// One scripted enemy action.
///
/// Missing `stage` reads as 1, missing `hits` as 1 and missing `duration` as 0.
/// Tags the simulator does not know about load as [`Action::Unknown`] so a
/// half-edited sheet still simulates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    Attack {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default = "default_hits")]
        hits: u32,
    },
    Defend {
        #[serde(default = "default_stage")]
        stage: i32,
    },
    Heal {
        #[serde(default = "default_stage")]
        stage: i32,
    },
    Poison {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default)]
        duration: u32,
    },
    Hallucination {
        #[serde(default)]
        duration: u32,
    },
    /// Parsed but never resolved; no binding mechanic exists yet.
    Bind {
        #[serde(default)]
        duration: u32,
    },
    Evade,
    AttackDebuff {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default)]
        duration: u32,
    },
    MonsterBuff {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default)]
        duration: u32,
    },
    SkillCostUp {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default)]
        duration: u32,
    },
    ReactiveShield {
        #[serde(default = "default_stage")]
        stage: i32,
        #[serde(default)]
        duration: u32,
    },
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Short tag used in turn logs
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Attack { .. } => "attack",
            Action::Defend { .. } => "defend",
            Action::Heal { .. } => "heal",
            Action::Poison { .. } => "poison",
            Action::Hallucination { .. } => "hallucination",
            Action::Bind { .. } => "bind",
            Action::Evade => "evade",
            Action::AttackDebuff { .. } => "attackDebuff",
            Action::MonsterBuff { .. } => "monsterBuff",
            Action::SkillCostUp { .. } => "skillCostUp",
            Action::ReactiveShield { .. } => "reactiveShield",
            Action::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Action::Attack { stage, hits } if hits > 1 => write!(f, "attack S{} x{}", stage, hits),
            Action::Attack { stage, .. } | Action::Defend { stage } | Action::Heal { stage } => {
                write!(f, "{} S{}", self.tag(), stage)
            }
            Action::Poison { stage, duration }
            | Action::AttackDebuff { stage, duration }
            | Action::MonsterBuff { stage, duration }
            | Action::SkillCostUp { stage, duration }
            | Action::ReactiveShield { stage, duration } => {
                write!(f, "{} S{} ({}t)", self.tag(), stage, duration)
            }
            Action::Hallucination { duration } | Action::Bind { duration } => {
                write!(f, "{} ({}t)", self.tag(), duration)
            }
            Action::Evade | Action::Unknown => f.write_str(self.tag()),
        }
    }
}

/// Externally authored enemy record. Read-only during a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub hp: u32,
    #[serde(default, alias = "damageReduceStage")]
    pub damage_reduce_stage: i32,
    /// Tier tag; only consulted when grouping enemies into rounds
    #[serde(default)]
    pub pool: String,
    /// Cyclic script: each entry is the set of actions taken on one turn
    pub pattern: Vec<Vec<Action>>,
}

impl Enemy {
    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Actions for a 1-based turn number, cycling through the pattern.
    pub fn actions_for_turn(&self, turn: u32) -> &[Action] {
        if self.pattern.is_empty() {
            return &[];
        }
        let idx = (turn.max(1) - 1) as usize % self.pattern.len();
        &self.pattern[idx]
    }
}
