//! Debug script to print one enemy's script and both scenario traces

use std::env;
use turn_oracle::config::BalanceConfig;
use turn_oracle::curve::{damage_reduce_pct, stage_value};
use turn_oracle::simulation::{compute_scenario_details_with, SimulationResult};
use turn_oracle::skill::Scenario;

fn dump(label: &str, result: &SimulationResult) {
    println!("\n{} -> kill turn {} (killed: {})", label, result.kill_turn, result.killed);
    for row in &result.log {
        println!(
            "  T{:<3} budget {:<2} [{}] {} dealt {:.2} -> hp {:.2} | took {:.2} -> player {:.2}",
            row.turn,
            row.effective_budget,
            row.actions.join(", "),
            row.combo,
            row.damage,
            row.hp,
            row.player_damage,
            row.player_hp
        );
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: debug_enemy <SHEET> <ENEMY_ID>");
        std::process::exit(2);
    }

    let config = match BalanceConfig::from_file(&args[1]) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading sheet: {:#}", e);
            std::process::exit(1);
        }
    };
    let Some(enemy) = config.enemy(&args[2]) else {
        eprintln!("No enemy '{}' in {}", args[2], args[1]);
        std::process::exit(1);
    };

    println!("=== {} ({}) ===", enemy.display_name(), enemy.id);
    println!("  HP:        {}", enemy.hp);
    println!(
        "  DR stage:  {} ({:.0}%)",
        enemy.damage_reduce_stage,
        damage_reduce_pct(enemy.damage_reduce_stage) * 100.0
    );
    println!("  Pool:      {}", enemy.pool);
    for (i, turn) in enemy.pattern.iter().enumerate() {
        let actions: Vec<String> = turn.iter().map(|a| a.to_string()).collect();
        println!("  Pattern {}: {}", i + 1, actions.join(", "));
    }

    println!("\nSKILLS:");
    for skill in &config.skills {
        println!(
            "  {:<20} cost {}  max: {}  min: {}",
            skill.name,
            skill.cost,
            skill.is_available(Scenario::Max),
            skill.is_available(Scenario::Min)
        );
    }

    println!("\nSTAGE CURVE:");
    let curve: Vec<String> = (1..=10).map(|s| format!("{}={:.1}", s, stage_value(s))).collect();
    println!("  {}", curve.join("  "));

    let details = compute_scenario_details_with(
        enemy,
        &config.skills,
        config.max_coin,
        config.turn_cap,
        config.preference_weight,
    );
    dump("BEST (max)", &details.best);
    dump("WORST (min)", &details.worst);
}
