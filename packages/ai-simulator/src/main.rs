//! AI simulator CLI - fast in-memory game simulation for AI evaluation.
//!
//! Runs games entirely in memory without transport or persistence overhead,
//! allowing rapid iteration on AI strategies and tier matchups.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::Instant;

use clap::Parser;
use engine::ai::{create_ai, AiStrategy, Strategic};
use engine::domain::seeds::derive_search_seed;
use engine::search::ismcts::SearchConfig;
use metrics::build_game_metrics;
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{AiType, GameModeArg, OutputFormat};

#[derive(Parser)]
#[command(name = "ai-simulator")]
#[command(about = "Fast in-memory game simulator for AI evaluation")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Number of seats at the table
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(2..=6))]
    players: u8,

    /// AI type for all seats
    #[arg(long, conflicts_with = "seat_ais")]
    seats: Option<AiType>,

    /// Comma-separated AI type per seat (must match --players)
    #[arg(long, value_delimiter = ',')]
    seat_ais: Vec<AiType>,

    /// Base seed for deterministic games; omitted means random per game
    #[arg(long)]
    seed: Option<u64>,

    /// Dice dealing mode
    #[arg(long, default_value = "classic")]
    mode: GameModeArg,

    /// Search budget per Strategic decision, in milliseconds
    #[arg(long, default_value = "200")]
    search_budget_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress output files
    #[arg(long)]
    compress: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default; only warnings and errors.
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seat_types = seat_types(&args)?;
    let ai_types: Vec<String> = seat_types.iter().map(|t| t.name().to_string()).collect();

    if args.show_output {
        info!("Starting AI simulator");
        info!(
            "Configuration: {} games, {} players, mode {:?}",
            args.games, args.players, args.mode
        );
        info!("AI types: {:?}", ai_types);
    }

    let mut output_writer =
        OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;
    if args.show_output {
        info!("Output directory: {}", args.output_dir);
    }

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let ais: Vec<Box<dyn AiStrategy>> = seat_types
        .iter()
        .enumerate()
        .map(|(seat, &ai_type)| build_ai(ai_type, base_seed, seat as u8, args.search_budget_ms))
        .collect();

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0u32;
    let mode_name = format!("{:?}", args.mode).to_lowercase();

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = match args.seed {
            Some(_) => base_seed.wrapping_add(u64::from(game_num) - 1),
            None => rand::random(),
        };

        let simulator = Simulator::new(game_seed, args.mode.to_mode());
        match simulator.simulate_game(&ais) {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    game_seed,
                    &ai_types,
                    &mode_name,
                    args.games,
                    &result,
                    duration_ms,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        "Game {} completed: winner=seat{} rounds={}",
                        game_num, result.winner, result.rounds_played
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let jsonl_path = jsonl_path.cloned();
    let csv_path = csv_path.cloned();
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        if let Some(path) = csv_path {
            info!("Summary CSV written to: {}", path.display());
        }
        print_summary(&results, &ai_types, errors, elapsed, args.games);
    }

    Ok(())
}

/// Resolve per-seat AI types from `--seats` or `--seat-ais`, defaulting
/// every seat to Strategic.
fn seat_types(args: &Args) -> Result<Vec<AiType>, Box<dyn std::error::Error>> {
    if let Some(all) = args.seats {
        return Ok(vec![all; args.players as usize]);
    }
    if args.seat_ais.is_empty() {
        return Ok(vec![AiType::Strategic; args.players as usize]);
    }
    if args.seat_ais.len() != args.players as usize {
        return Err(format!(
            "--seat-ais lists {} seats but --players is {}",
            args.seat_ais.len(),
            args.players
        )
        .into());
    }
    Ok(args.seat_ais.clone())
}

fn build_ai(ai_type: AiType, base_seed: u64, seat: u8, budget_ms: u64) -> Box<dyn AiStrategy> {
    let seed = derive_search_seed(base_seed, 0, seat, 0);
    match ai_type {
        AiType::Strategic => Box::new(Strategic::with_config(
            Some(seed),
            SearchConfig {
                time_budget_ms: budget_ms,
                ..SearchConfig::default()
            },
        )),
        other => create_ai(other.difficulty(), Some(seed)),
    }
}

fn print_summary(
    results: &[GameResult],
    ai_types: &[String],
    errors: u32,
    elapsed: std::time::Duration,
    total: u32,
) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let seats = ai_types.len();
    let mut wins = vec![0u32; seats];
    let mut total_rounds = 0u64;
    for result in results {
        if let Some(w) = wins.get_mut(result.winner as usize) {
            *w += 1;
        }
        total_rounds += u64::from(result.rounds_played);
    }

    println!(
        "Average rounds per game: {:.1}",
        total_rounds as f64 / results.len() as f64
    );
    println!("\n=== Results by Seat ===");
    for seat in 0..seats {
        let win_rate = (wins[seat] as f64 / results.len() as f64) * 100.0;
        println!(
            "Seat {} ({}): wins={} ({:.1}%)",
            seat, ai_types[seat], wins[seat], win_rate
        );
    }
}
