//! CLI entry point for the burrow solver.
//!
//! Usage:
//!   burrow-solver solve <diagram.txt> [options]
//!   burrow-solver solve --stdin [options]
//!
//! Options:
//!   --unfold                Insert the two extra room rows before solving
//!   --no-pruning            Expand room exits even when a token can go home
//!   --max-expansions <n>    Give up after expanding n states
//!   --max-cost <c>          Give up once no solution of cost <= c remains
//!   --show-moves            Include the optimal move sequence in the output
//!
//! Set RUST_LOG=debug for search progress on stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use burrow_solver::{
    parse_diagram, solve_with, BurrowState, Move, PruningMode, SearchStats, Solution, SolveError,
    SolverConfig,
};

#[derive(Parser)]
#[command(name = "burrow-solver")]
#[command(about = "Minimum-energy solver for the amphipod burrow puzzle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the least energy needed to sort a burrow diagram
    Solve {
        /// Path to the diagram file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the diagram from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Unfold the diagram with the two extra room rows first
        #[arg(long)]
        unfold: bool,

        /// Disable forced-move pruning
        #[arg(long)]
        no_pruning: bool,

        /// Maximum number of states to expand
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Maximum solution cost worth searching for
        #[arg(long)]
        max_cost: Option<u64>,

        /// Print the optimal move sequence
        #[arg(long)]
        show_moves: bool,
    },
}

/// Output format for a solve run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<SearchStats>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    moves: Vec<Move>,
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|e| format!("failed to read {}: {}", path.display(), e))
    } else {
        Err("must provide either a file path or --stdin".to_string())
    }
}

fn load_burrow(file: Option<PathBuf>, stdin: bool, unfold: bool) -> Result<BurrowState, String> {
    let text = read_input(file, stdin)?;
    let state = parse_diagram(&text).map_err(|e| format!("invalid diagram: {}", e))?;
    if unfold {
        state
            .unfold_standard()
            .map_err(|e| format!("cannot unfold: {}", e))
    } else {
        Ok(state)
    }
}

fn format_result(result: Result<Solution, SolveError>) -> SolveOutput {
    match result {
        Ok(solution) => SolveOutput {
            solved: true,
            cost: Some(solution.cost),
            reason: None,
            stats: Some(solution.stats),
            moves: solution.moves,
        },
        Err(err) => SolveOutput {
            solved: false,
            cost: None,
            reason: Some(err.to_string()),
            stats: None,
            moves: Vec::new(),
        },
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            unfold,
            no_pruning,
            max_expansions,
            max_cost,
            show_moves,
        } => {
            let state = match load_burrow(file, stdin, unfold) {
                Ok(state) => state,
                Err(message) => {
                    eprintln!("Error: {}", message);
                    process::exit(1);
                }
            };
            info!("loaded burrow:\n{}", state);

            let config = SolverConfig {
                pruning: if no_pruning {
                    PruningMode::Disabled
                } else {
                    PruningMode::ForcedMoves
                },
                max_expansions,
                max_cost,
                record_moves: show_moves,
            };

            let output = format_result(solve_with(state, &config));
            let solved = output.solved;

            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error: failed to encode result: {}", e);
                    process::exit(1);
                }
            }

            process::exit(if solved { 0 } else { 1 });
        }
    }
}
