//! Exact TSP Solver - Command Line Interface
//!
//! Solves the built-in San Francisco instance with either exact method
//! and prints the JSON envelopes the animation front end consumes.

use clap::{Parser, Subcommand};
use tsp_exact_solver::api::{self, Method};
use tsp_exact_solver::exact::{EngineConfig, SolverEngine};
use tsp_exact_solver::instance::TspInstance;
use tsp_exact_solver::milp::BranchBoundSolver;

#[derive(Parser)]
#[command(name = "tsp-exact-solver")]
#[command(version = "1.0")]
#[command(about = "Exact TSP solver with an animated cutting-plane trace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the instance and print the result envelope as JSON
    Solve {
        /// Solution method
        #[arg(short, long, value_enum, default_value = "cutting-plane")]
        method: Method,

        /// Iteration bound for the cutting-plane method
        #[arg(long, default_value = "100")]
        max_iterations: usize,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the location/cost-matrix payload as JSON
    Data {
        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let instance = TspInstance::san_francisco();

    match cli.command {
        Commands::Solve {
            method,
            max_iterations,
            pretty,
        } => {
            let config = EngineConfig {
                max_iterations,
                ..EngineConfig::default()
            };
            let engine =
                SolverEngine::with_config(instance, Box::new(BranchBoundSolver::new()), config);

            let response = api::solve(&engine, method);
            print_json(&response, pretty);
            if !response.success {
                std::process::exit(1);
            }
        }

        Commands::Data { pretty } => {
            print_json(&api::data(&instance), pretty);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing response: {}", e);
            std::process::exit(1);
        }
    }
}
