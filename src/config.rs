//! Balance sheet loading from YAML or JSON

use crate::enemy::Enemy;
use crate::optimizer::MAX_COMBO_SKILLS;
use crate::simulation::{DEFAULT_PREFERENCE_WEIGHT, DEFAULT_TURN_CAP};
use crate::skill::Skill;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn default_turn_cap() -> u32 {
    DEFAULT_TURN_CAP
}

fn default_preference_weight() -> f64 {
    DEFAULT_PREFERENCE_WEIGHT
}

fn default_option_count() -> usize {
    1
}

/// Everything needed to bracket a roster of enemies against one skill kit.
/// Top-level keys accept both snake_case and the editor's camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceConfig {
    /// Coin budget of the abundant scenario
    #[serde(alias = "maxCoin")]
    pub max_coin: u32,
    #[serde(default = "default_turn_cap", alias = "turnCap")]
    pub turn_cap: u32,
    #[serde(default = "default_preference_weight", alias = "preferenceWeight")]
    pub preference_weight: f64,
    /// Enemies offered per round
    #[serde(default = "default_option_count", alias = "optionCount")]
    pub option_count: usize,
    pub skills: Vec<Skill>,
    pub enemies: Vec<Enemy>,
}

impl BalanceConfig {
    /// Load a balance sheet; `.json` files parse as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read balance sheet at {}", path.display()))?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&content)
                .with_context(|| format!("Invalid JSON sheet {}", path.display()))
        } else {
            Self::from_yaml(&content)
                .with_context(|| format!("Invalid YAML sheet {}", path.display()))
        }
    }

    /// Parse and validate a JSON sheet
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BalanceConfig = serde_json::from_str(json).context("Failed to parse JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a YAML sheet
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: BalanceConfig = serde_yaml::from_str(yaml).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sheets the simulator would silently misread.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.turn_cap > 0, "turn_cap must be > 0");
        ensure!(
            (0.0..=1.0).contains(&self.preference_weight),
            "preference_weight must be within [0, 1], got {}",
            self.preference_weight
        );
        ensure!(!self.skills.is_empty(), "skill list is empty");
        ensure!(
            self.skills.len() <= MAX_COMBO_SKILLS,
            "{} skills exceeds the combo search limit of {}",
            self.skills.len(),
            MAX_COMBO_SKILLS
        );

        let mut seen = HashSet::new();
        for enemy in &self.enemies {
            ensure!(!enemy.id.is_empty(), "enemy with empty id");
            ensure!(seen.insert(enemy.id.as_str()), "duplicate enemy id '{}'", enemy.id);
            ensure!(!enemy.pattern.is_empty(), "enemy '{}' has an empty pattern", enemy.id);
        }
        Ok(())
    }

    /// Look up an enemy by id
    pub fn enemy(&self, id: &str) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
