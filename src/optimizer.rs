//! Per-turn combo search
//!
//! Skill lists are tiny by design (five or so), so every non-empty subset is
//! scored. The winner is the highest score, then the highest raw damage, then
//! the highest block; among full ties the first subset in mask order stays.

use crate::curve::stage_value;
use crate::skill::{Scenario, Skill, SkillEffect};
use log::{trace, warn};
use serde::Serialize;

/// Subsets are enumerated over at most this many skills; later ones are ignored.
pub const MAX_COMBO_SKILLS: usize = 16;

/// Everything the search needs to know about the current turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComboQuery {
    pub coin_budget: u32,
    pub attack_stage_shift: i32,
    pub scenario: Scenario,
    /// Added to the cost of every skill in the combo
    pub cost_penalty: i32,
    pub incoming_attack_damage: f64,
    pub poison_damage: f64,
    /// 1.0 = pure damage race, 0.0 = pure damage avoidance
    pub preference_weight: f64,
}

/// Result of a combo search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComboOutcome {
    pub damage: f64,
    pub hits: u32,
    pub block: f64,
    /// Skill names in list order
    pub combo: Vec<String>,
}

impl ComboOutcome {
    pub fn is_empty(&self) -> bool {
        self.combo.is_empty()
    }

    pub fn describe(&self) -> String {
        if self.combo.is_empty() {
            "none".to_string()
        } else {
            self.combo.join(" + ")
        }
    }
}

/// Clamp a preference weight into [0, 1]; NaN counts as a pure damage race.
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        1.0
    } else {
        weight.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Contribution {
    cost: i64,
    damage: f64,
    hits: u32,
    block: f64,
}

fn contribution(skill: &Skill, query: &ComboQuery) -> Contribution {
    let mut c = Contribution {
        cost: skill.cost as i64 + query.cost_penalty as i64,
        ..Contribution::default()
    };
    if !skill.is_available(query.scenario) {
        return c;
    }
    for effect in &skill.effects {
        match effect {
            SkillEffect::Damage(spec) => {
                let stage = spec.magnitude.saturating_add(query.attack_stage_shift).max(1);
                c.damage += stage_value(stage) * spec.hits() as f64;
                c.hits = c.hits.saturating_add(spec.hits());
            }
            SkillEffect::Block(spec) => {
                c.block += stage_value(spec.magnitude.max(1)) * spec.hits() as f64;
            }
            // No numeric effect in this model
            SkillEffect::Heal(_)
            | SkillEffect::Buff(_)
            | SkillEffect::Debuff(_)
            | SkillEffect::Utility(_)
            | SkillEffect::Unknown => {}
        }
    }
    c
}

/// Pick the best affordable subset of `skills` for this turn.
///
/// Returns an empty outcome when nothing fits the budget. Only the first
/// [`MAX_COMBO_SKILLS`] skills are searched; a longer list logs a warning.
pub fn best_combo_for_turn(skills: &[Skill], query: &ComboQuery) -> ComboOutcome {
    if skills.len() > MAX_COMBO_SKILLS {
        warn!(
            target: "oracle.combo",
            "{} skills given, only the first {} are searched",
            skills.len(),
            MAX_COMBO_SKILLS
        );
    }
    let skills = &skills[..skills.len().min(MAX_COMBO_SKILLS)];
    let parts: Vec<Contribution> = skills.iter().map(|s| contribution(s, query)).collect();
    let weight = clamp_weight(query.preference_weight);
    let budget = query.coin_budget as i64;

    // (score, damage, hits, block, mask)
    let mut best: Option<(f64, f64, u32, f64, u32)> = None;

    for mask in 1u32..(1u32 << parts.len()) {
        let mut total = Contribution::default();
        for (i, part) in parts.iter().enumerate() {
            if mask & (1u32 << i) != 0 {
                total.cost += part.cost;
                total.damage += part.damage;
                total.hits = total.hits.saturating_add(part.hits);
                total.block += part.block;
            }
        }
        if total.cost > budget {
            continue;
        }

        let taken = query.poison_damage + (query.incoming_attack_damage - total.block).max(0.0);
        let score = weight * total.damage - (1.0 - weight) * taken;

        let better = match best {
            None => true,
            Some((best_score, best_damage, _, best_block, _)) => {
                score > best_score
                    || (score == best_score && total.damage > best_damage)
                    || (score == best_score
                        && total.damage == best_damage
                        && total.block > best_block)
            }
        };
        if better {
            best = Some((score, total.damage, total.hits, total.block, mask));
        }
    }

    let Some((score, damage, hits, block, mask)) = best else {
        trace!(target: "oracle.combo", "no affordable combo within {} coins", budget);
        return ComboOutcome::default();
    };

    let combo: Vec<String> = skills
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1u32 << *i) != 0)
        .map(|(_, s)| s.name.clone())
        .collect();
    trace!(
        target: "oracle.combo",
        "best combo {:?} score={:.3} dmg={:.2} block={:.2}",
        combo, score, damage, block
    );

    ComboOutcome {
        damage,
        hits,
        block,
        combo,
    }
}
