// SPDX-FileCopyrightText: 2026 rxplan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! rxplan - pharmacy benefit card plan classifier.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod classify;
mod refresh;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// rxplan - classify pharmacy benefit cards by plan type.
#[derive(Parser, Debug)]
#[command(name = "rxplan", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load reference data and start the HTTP server.
    Serve,
    /// Classify one card from the command line.
    Classify(classify::ClassifyArgs),
    /// Download both reference sources and report the outcome.
    Refresh {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Query a running server's health endpoint.
    Status {
        /// Print structured JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => rxplan_config::load_and_validate_path(path),
        None => rxplan_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            rxplan_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Classify(args)) => classify::run_classify(&config, args).await,
        Some(Commands::Refresh { json }) => refresh::run_refresh(&config, json).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        None => {
            println!("rxplan: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
