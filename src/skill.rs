//! Player skill definitions and the scenario gate for luck-based conditions

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Resource preset a simulation runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Abundant budget, coin-gated skills enabled
    Max,
    /// Minimal budget, coin-gated skills disabled
    Min,
}

// Custom deserializer for case-insensitive matching
impl<'de> Deserialize<'de> for Scenario {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "max" => Ok(Scenario::Max),
            "min" => Ok(Scenario::Min),
            _ => Err(serde::de::Error::unknown_variant(&s, &["max", "min", "Max", "Min"])),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Max => f.write_str("max"),
            Scenario::Min => f.write_str("min"),
        }
    }
}

/// Activation condition of a skill. Only the first one listed is consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillCondition {
    HpBelow {
        #[serde(default)]
        value: Option<f64>,
    },
    HpAbove {
        #[serde(default)]
        value: Option<f64>,
    },
    CoinHeads,
    CoinTails,
    Combo {
        #[serde(default)]
        value: Option<f64>,
    },
    #[serde(rename = "none")]
    Always,
    #[serde(other)]
    Unknown,
}

impl SkillCondition {
    /// Whether the condition depends on a coin toss
    pub fn is_luck_gated(&self) -> bool {
        matches!(self, SkillCondition::CoinHeads | SkillCondition::CoinTails)
    }
}

/// Payload shared by every effect kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    #[serde(default)]
    pub target: Option<String>,
    /// Stage value of the effect
    #[serde(default)]
    pub magnitude: i32,
    #[serde(default)]
    pub hits: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub stackable: Option<bool>,
}

impl EffectSpec {
    pub fn hits(&self) -> u32 {
        self.hits.unwrap_or(1)
    }

    pub fn duration(&self) -> u32 {
        self.duration.unwrap_or(0)
    }
}

/// A single skill effect.
///
/// Only `Damage` and `Block` move HP in the simulator. The rest are carried so
/// designer data round-trips, but resolve to nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SkillEffect {
    Damage(EffectSpec),
    Block(EffectSpec),
    Heal(EffectSpec),
    Buff(EffectSpec),
    Debuff(EffectSpec),
    Utility(EffectSpec),
    #[serde(other)]
    Unknown,
}

/// Externally authored skill record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub conditions: Vec<SkillCondition>,
    #[serde(default)]
    pub effects: Vec<SkillEffect>,
}

impl Skill {
    /// The condition that gates this skill; an empty list means always on.
    pub fn leading_condition(&self) -> &SkillCondition {
        self.conditions.first().unwrap_or(&SkillCondition::Always)
    }

    /// Coin-gated skills only fire in the `Max` scenario. Everything else,
    /// including HP thresholds and unknown conditions, is always available.
    pub fn is_available(&self, scenario: Scenario) -> bool {
        !self.leading_condition().is_luck_gated() || scenario == Scenario::Max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(conditions: Vec<SkillCondition>) -> Skill {
        Skill {
            name: "s".to_string(),
            cost: 0,
            conditions,
            effects: vec![],
        }
    }

    #[test]
    fn coin_conditions_gate_on_scenario() {
        for cond in [SkillCondition::CoinHeads, SkillCondition::CoinTails] {
            let s = skill(vec![cond]);
            assert!(s.is_available(Scenario::Max));
            assert!(!s.is_available(Scenario::Min));
        }
    }

    #[test]
    fn other_conditions_are_always_available() {
        for cond in [
            SkillCondition::Always,
            SkillCondition::HpBelow { value: Some(0.3) },
            SkillCondition::HpAbove { value: None },
            SkillCondition::Combo { value: Some(2.0) },
            SkillCondition::Unknown,
        ] {
            let s = skill(vec![cond]);
            assert!(s.is_available(Scenario::Min));
        }
        assert!(skill(vec![]).is_available(Scenario::Min));
    }

    #[test]
    fn only_first_condition_counts() {
        let s = skill(vec![SkillCondition::Always, SkillCondition::CoinHeads]);
        assert!(s.is_available(Scenario::Min));
        let s = skill(vec![SkillCondition::CoinTails, SkillCondition::Always]);
        assert!(!s.is_available(Scenario::Min));
    }

    #[test]
    fn parses_editor_json() {
        let s: Skill = serde_json::from_str(
            r#"{
                "name": "Guard Flip",
                "cost": 0,
                "conditions": [{"type": "coin_heads"}],
                "effects": [
                    {"type": "block", "target": "self", "magnitude": 3},
                    {"type": "utility", "magnitude": 2},
                    {"type": "teleport", "magnitude": 9}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(s.leading_condition(), &SkillCondition::CoinHeads);
        assert_eq!(s.effects.len(), 3);
        assert!(matches!(
            &s.effects[0],
            SkillEffect::Block(spec) if spec.magnitude == 3 && spec.hits() == 1
        ));
        assert_eq!(s.effects[2], SkillEffect::Unknown);
    }

    #[test]
    fn scenario_is_case_insensitive() {
        let s: Scenario = serde_json::from_str("\"MAX\"").unwrap();
        assert_eq!(s, Scenario::Max);
        let s: Scenario = serde_yaml::from_str("Min").unwrap();
        assert_eq!(s, Scenario::Min);
        assert!(serde_json::from_str::<Scenario>("\"mid\"").is_err());
    }
}
