//! Turn brackets per enemy and their aggregation into round bounds

use crate::enemy::Enemy;
use crate::simulation::{compute_range_with, ScenarioDetails};
use crate::skill::Skill;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// Optimistic/pessimistic kill-turn bracket for one enemy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRange {
    pub min_turn: u32,
    pub max_turn: u32,
    pub min_combo: String,
    pub max_combo: String,
}

impl TurnRange {
    /// Bracket from a pair of scenario traces
    pub fn from_details(details: &ScenarioDetails) -> Self {
        Self {
            min_turn: details.best.kill_turn,
            max_turn: details.worst.kill_turn,
            min_combo: details.best.last_combo.clone(),
            max_combo: details.worst.last_combo.clone(),
        }
    }

    /// Bracket with no combo labels, handy for round math
    pub fn turns(min_turn: u32, max_turn: u32) -> Self {
        Self {
            min_turn,
            max_turn,
            min_combo: String::new(),
            max_combo: String::new(),
        }
    }
}

/// A bracket tagged with the enemy it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyRange {
    pub id: String,
    pub name: String,
    pub pool: String,
    pub range: TurnRange,
}

impl EnemyRange {
    /// Tag an already simulated pair of traces with its enemy
    pub fn from_details(enemy: &Enemy, details: &ScenarioDetails) -> Self {
        Self {
            id: enemy.id.clone(),
            name: enemy.display_name().to_string(),
            pool: enemy.pool.clone(),
            range: TurnRange::from_details(details),
        }
    }
}

/// Best and worst kill-turn bound for a whole round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoundRange {
    pub round_min: u32,
    pub round_max: u32,
}

/// Call `visit` with every size-`k` index subset of `0..n`, in lexicographic order.
fn for_each_combination<F>(n: usize, k: usize, visit: &mut F)
where
    F: FnMut(&[usize]),
{
    fn recurse<F: FnMut(&[usize])>(
        start: usize,
        n: usize,
        k: usize,
        picked: &mut Vec<usize>,
        visit: &mut F,
    ) {
        if picked.len() == k {
            visit(picked);
            return;
        }
        // Not enough elements left to fill the subset
        let needed = k - picked.len();
        for i in start..=(n - needed) {
            picked.push(i);
            recurse(i + 1, n, k, picked, visit);
            picked.pop();
        }
    }

    if k == 0 || k > n {
        return;
    }
    let mut picked = Vec::with_capacity(k);
    recurse(0, n, k, &mut picked, visit);
}

/// Round bounds when a round offers `option_count` of these enemies.
///
/// For each possible offer the player takes the fastest kill, so a subset's
/// best bound is its smallest `min_turn` and its pessimistic bound its
/// smallest `max_turn`. `round_min` is the smallest best bound over all
/// offers, `round_max` the largest pessimistic bound. With one option or with
/// every enemy on offer the plain min/max across all entries is returned.
pub fn compute_round_range(ranges: &[TurnRange], option_count: usize) -> RoundRange {
    if ranges.is_empty() {
        return RoundRange::default();
    }

    if option_count <= 1 || option_count >= ranges.len() {
        return RoundRange {
            round_min: ranges.iter().map(|r| r.min_turn).min().unwrap_or(0),
            round_max: ranges.iter().map(|r| r.max_turn).max().unwrap_or(0),
        };
    }

    let mut round_min = u32::MAX;
    let mut round_max = 0;
    let mut offers = 0usize;
    for_each_combination(ranges.len(), option_count, &mut |picked| {
        let best = picked.iter().map(|&i| ranges[i].min_turn).min().unwrap_or(0);
        let pessimistic = picked.iter().map(|&i| ranges[i].max_turn).min().unwrap_or(0);
        round_min = round_min.min(best);
        round_max = round_max.max(pessimistic);
        offers += 1;
    });
    debug!(
        target: "oracle.round",
        "{} offers of {} from {}: {}..{}",
        offers,
        option_count,
        ranges.len(),
        round_min,
        round_max
    );

    RoundRange {
        round_min,
        round_max,
    }
}

/// Brackets for every enemy in a roster.
pub fn compute_roster_ranges(
    enemies: &[Enemy],
    skills: &[Skill],
    max_coin: u32,
    turn_cap: u32,
    preference_weight: f64,
) -> Vec<EnemyRange> {
    enemies
        .iter()
        .map(|enemy| EnemyRange {
            id: enemy.id.clone(),
            name: enemy.display_name().to_string(),
            pool: enemy.pool.clone(),
            range: compute_range_with(enemy, skills, max_coin, turn_cap, preference_weight),
        })
        .collect()
}

/// Round bounds across the whole roster, ignoring pools
pub fn compute_roster_round_range(ranges: &[EnemyRange], option_count: usize) -> RoundRange {
    let brackets: Vec<TurnRange> = ranges.iter().map(|r| r.range.clone()).collect();
    compute_round_range(&brackets, option_count)
}

/// Round bounds within each pool, keyed and ordered by pool tag.
pub fn compute_pool_round_ranges(
    ranges: &[EnemyRange],
    option_count: usize,
) -> BTreeMap<String, RoundRange> {
    let mut pools: BTreeMap<String, Vec<TurnRange>> = BTreeMap::new();
    for r in ranges {
        pools.entry(r.pool.clone()).or_default().push(r.range.clone());
    }
    pools
        .into_iter()
        .map(|(pool, brackets)| {
            let round = compute_round_range(&brackets, option_count);
            (pool, round)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets(pairs: &[(u32, u32)]) -> Vec<TurnRange> {
        pairs.iter().map(|&(lo, hi)| TurnRange::turns(lo, hi)).collect()
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(compute_round_range(&[], 2), RoundRange::default());
    }

    #[test]
    fn single_option_is_plain_min_max() {
        let r = brackets(&[(3, 9), (2, 5), (4, 12)]);
        assert_eq!(
            compute_round_range(&r, 1),
            RoundRange { round_min: 2, round_max: 12 }
        );
        assert_eq!(compute_round_range(&r, 0), compute_round_range(&r, 1));
    }

    #[test]
    fn all_options_is_plain_min_max() {
        let r = brackets(&[(3, 9), (2, 5), (4, 12)]);
        assert_eq!(compute_round_range(&r, 3), compute_round_range(&r, 1));
        assert_eq!(compute_round_range(&r, 7), compute_round_range(&r, 1));
    }

    #[test]
    fn pessimistic_bound_is_max_of_subset_mins() {
        // Pairs: {a,b}: min max 5, {a,c}: 9, {b,c}: 5 -> worst round is 9,
        // not the naive 12.
        let r = brackets(&[(3, 9), (2, 5), (4, 12)]);
        assert_eq!(
            compute_round_range(&r, 2),
            RoundRange { round_min: 2, round_max: 9 }
        );
    }

    #[test]
    fn larger_offers_tighten_the_worst_case() {
        let r = brackets(&[(1, 10), (2, 8), (3, 6), (4, 4), (5, 2)]);
        // Worst offer of k is the k largest max_turns, bounded by the smallest of them.
        assert_eq!(compute_round_range(&r, 2).round_max, 8);
        assert_eq!(compute_round_range(&r, 3).round_max, 6);
        assert_eq!(compute_round_range(&r, 4).round_max, 4);
        assert_eq!(compute_round_range(&r, 3).round_min, 1);
    }

    #[test]
    fn combinations_are_lexicographic_and_complete() {
        let mut seen = Vec::new();
        for_each_combination(4, 2, &mut |c| seen.push(c.to_vec()));
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );

        let mut count = 0;
        for_each_combination(6, 3, &mut |_| count += 1);
        assert_eq!(count, 20);

        let mut count = 0;
        for_each_combination(3, 4, &mut |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn pools_are_aggregated_separately() {
        let tagged = |id: &str, pool: &str, lo: u32, hi: u32| EnemyRange {
            id: id.to_string(),
            name: id.to_string(),
            pool: pool.to_string(),
            range: TurnRange::turns(lo, hi),
        };
        let ranges = vec![
            tagged("a", "early", 2, 4),
            tagged("b", "late", 6, 15),
            tagged("c", "early", 3, 7),
            tagged("d", "late", 5, 11),
            tagged("e", "late", 9, 20),
        ];
        let pools = compute_pool_round_ranges(&ranges, 2);
        assert_eq!(pools.keys().collect::<Vec<_>>(), vec!["early", "late"]);
        assert_eq!(pools["early"], RoundRange { round_min: 2, round_max: 7 });
        assert_eq!(pools["late"], RoundRange { round_min: 5, round_max: 15 });

        assert_eq!(
            compute_roster_round_range(&ranges, 2),
            RoundRange { round_min: 2, round_max: 15 }
        );
    }

    #[test]
    fn enemy_range_from_details_matches_roster_ranges() {
        use crate::enemy::Action;
        use crate::simulation::compute_scenario_details_with;
        use crate::skill::{EffectSpec, SkillEffect};

        let enemy = Enemy {
            id: "bat".to_string(),
            name: "Cave Bat".to_string(),
            hp: 20,
            damage_reduce_stage: 0,
            pool: "early".to_string(),
            pattern: vec![vec![Action::Attack { stage: 2, hits: 1 }]],
        };
        let skills = vec![Skill {
            name: "Bite".to_string(),
            cost: 1,
            conditions: vec![],
            effects: vec![SkillEffect::Damage(EffectSpec {
                target: None,
                magnitude: 6,
                hits: None,
                duration: None,
                stackable: None,
            })],
        }];

        let details = compute_scenario_details_with(&enemy, &skills, 3, 20, 1.0);
        let from_details = EnemyRange::from_details(&enemy, &details);
        let roster = compute_roster_ranges(std::slice::from_ref(&enemy), &skills, 3, 20, 1.0);
        assert_eq!(roster, vec![from_details.clone()]);
        assert_eq!(from_details.name, "Cave Bat");
        assert_eq!(from_details.pool, "early");
        // 4.0 per turn against 20 HP
        assert_eq!((from_details.range.min_turn, from_details.range.max_turn), (5, 5));
        assert_eq!(from_details.range.min_combo, "Bite");
        assert_eq!(from_details.range.max_combo, "Bite");
    }
}
