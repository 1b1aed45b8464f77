//! CLI entry point for the kill-turn oracle

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use turn_oracle::{
    compute_pool_round_ranges, compute_roster_ranges, compute_roster_round_range,
    compute_scenario_details_with, BalanceConfig, EnemyRange, ScenarioDetails, SimulationResult,
};

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "turn-oracle")]
#[command(version = "0.1")]
#[command(about = "Kill-turn brackets and round bounds for enemy balancing", long_about = None)]
struct Args {
    /// Path to the balance sheet (YAML or JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Override the sheet's enemies-per-round
    #[arg(long)]
    option_count: Option<usize>,

    /// Override the sheet's turn cap
    #[arg(long)]
    turn_cap: Option<u32>,

    /// Override the sheet's damage-vs-safety weight (0..=1)
    #[arg(long)]
    preference_weight: Option<f64>,

    /// Override the sheet's abundant coin budget
    #[arg(long)]
    max_coin: Option<u32>,

    /// Only report this enemy, with both scenario traces
    #[arg(long)]
    enemy: Option<String>,

    /// Print every per-turn trace and enable debug logging
    #[arg(long, default_value = "false")]
    debug_trace: bool,

    /// Show timing information
    #[arg(short, long, default_value = "false")]
    timing: bool,
}

fn print_trace(label: &str, result: &SimulationResult) {
    let outcome = if result.killed { "" } else { ", survived" };
    println!("  -- {} (kill turn {}{}) --", label, result.kill_turn, outcome);
    println!(
        "  {:>4} {:>8} {:>8} {:>8} {:>8}  {:<28} {}",
        "turn", "dealt", "hp", "taken", "player", "combo", "actions"
    );
    for row in &result.log {
        println!(
            "  {:>4} {:>8.2} {:>8.2} {:>8.2} {:>8.2}  {:<28} {}",
            row.turn,
            row.damage,
            row.hp,
            row.player_damage,
            row.player_hp,
            row.combo,
            row.actions.join(", ")
        );
    }
    if let Some(turn) = result.player_defeated_turn {
        println!("  player defeated on turn {}", turn);
    }
}

fn print_range(r: &EnemyRange) {
    println!(
        "{:<20} {:<10} {:>3} - {:<3}  best: {}  worst: {}",
        r.name, r.pool, r.range.min_turn, r.range.max_turn, r.range.min_combo, r.range.max_combo
    );
}

fn run(args: Args) -> Result<()> {
    let mut config = BalanceConfig::from_file(&args.config)?;
    if let Some(k) = args.option_count {
        config.option_count = k;
    }
    if let Some(cap) = args.turn_cap {
        config.turn_cap = cap;
    }
    if let Some(w) = args.preference_weight {
        config.preference_weight = w;
    }
    if let Some(c) = args.max_coin {
        config.max_coin = c;
    }
    config.validate().context("Invalid command-line override")?;

    if let Some(ref id) = args.enemy {
        if !config.enemies.iter().any(|e| &e.id == id) {
            anyhow::bail!("no enemy with id '{}' in {}", id, args.config.display());
        }
        config.enemies.retain(|e| &e.id == id);
    }

    let start = Instant::now();
    let show_traces = args.debug_trace || args.enemy.is_some();
    // Traces already hold both scenario runs, so brackets come from them
    let (ranges, details) = if show_traces {
        let details: Vec<(String, ScenarioDetails)> = config
            .enemies
            .iter()
            .map(|e| {
                let d = compute_scenario_details_with(
                    e,
                    &config.skills,
                    config.max_coin,
                    config.turn_cap,
                    config.preference_weight,
                );
                (e.display_name().to_string(), d)
            })
            .collect();
        let ranges: Vec<EnemyRange> = config
            .enemies
            .iter()
            .zip(&details)
            .map(|(e, (_, d))| EnemyRange::from_details(e, d))
            .collect();
        (ranges, details)
    } else {
        let ranges = compute_roster_ranges(
            &config.enemies,
            &config.skills,
            config.max_coin,
            config.turn_cap,
            config.preference_weight,
        );
        (ranges, Vec::new())
    };
    let round = compute_roster_round_range(&ranges, config.option_count);
    let pools = compute_pool_round_ranges(&ranges, config.option_count);
    let elapsed = start.elapsed();

    match args.output {
        OutputFormat::Text => {
            println!("=== Kill-Turn Brackets ===");
            println!(
                "Coins: {}  Turn cap: {}  Weight: {:.2}  Options/round: {}",
                config.max_coin, config.turn_cap, config.preference_weight, config.option_count
            );
            println!();
            for r in &ranges {
                print_range(r);
            }
            println!();
            println!("--- Round Range ---");
            println!("All enemies: {} - {}", round.round_min, round.round_max);
            for (pool, r) in &pools {
                let label = if pool.is_empty() { "(no pool)" } else { pool.as_str() };
                println!("Pool {:<12} {} - {}", label, r.round_min, r.round_max);
            }

            for (name, d) in &details {
                println!();
                println!("=== {} ===", name);
                print_trace("best (max)", &d.best);
                print_trace("worst (min)", &d.worst);
            }

            if args.timing {
                println!();
                println!("--- Performance ---");
                println!("Total time: {:.3}ms", elapsed.as_secs_f64() * 1000.0);
            }
        }
        OutputFormat::Json => {
            let traces: Vec<_> = details
                .iter()
                .map(|(name, d)| serde_json::json!({ "enemy": name, "details": d }))
                .collect();
            let output = serde_json::json!({
                "max_coin": config.max_coin,
                "turn_cap": config.turn_cap,
                "preference_weight": config.preference_weight,
                "option_count": config.option_count,
                "elapsed_seconds": elapsed.as_secs_f64(),
                "ranges": ranges,
                "round": round,
                "pools": pools,
                "traces": traces,
            });
            let text = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
            println!("{}", text);
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.debug_trace { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
