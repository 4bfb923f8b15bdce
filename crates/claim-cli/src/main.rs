//! Admin CLI for land-claim snapshots, backed by the claim cache.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "claims",
    about = "Inspect land-claim snapshots and run village dissolutions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Claim snapshot (JSON array of claim records)
    #[arg(short, long, global = true, default_value = "claims.json")]
    snapshot: PathBuf,

    /// Log cache activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show aggregate counts for the snapshot
    Stats,

    /// Show who owns a chunk
    #[command(allow_negative_numbers = true)]
    Check {
        /// World name
        world: String,
        /// Chunk x
        x: i32,
        /// Chunk z
        z: i32,
    },

    /// List an owner's chunks and connected areas
    Owner {
        /// Owner UUID
        uuid: String,
    },

    /// List a village's chunks
    Village {
        /// Village id
        id: u32,
    },

    /// Hand every chunk of a village to one player as personal claims
    Dissolve {
        /// Village id
        id: u32,

        /// UUID of the player receiving the chunks
        #[arg(long)]
        owner: String,

        /// Display name of the player receiving the chunks
        #[arg(long)]
        name: String,

        /// Where to write the rewritten snapshot (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let snapshot = cli.snapshot.as_path();
    let result = match cli.command {
        Commands::Stats => commands::stats::run(snapshot),
        Commands::Check { world, x, z } => commands::check::run(snapshot, &world, x, z),
        Commands::Owner { uuid } => commands::owner::run(snapshot, &uuid),
        Commands::Village { id } => commands::village::run(snapshot, id),
        Commands::Dissolve {
            id,
            owner,
            name,
            output,
        } => commands::dissolve::run(snapshot, id, &owner, &name, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
