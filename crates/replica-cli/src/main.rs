//! Replica command-line tool
//!
//! Drives the deep clone engine over a built-in sample graph and manages
//! `replica.toml` engine configuration.

mod commands;
mod sample;

use clap::{Parser, Subcommand, ValueEnum};
use replica_engine::MemoPolicy;
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(name = "replica")]
#[command(about = "Identity-preserving deep clone engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone the sample graph and compare it with its source
    Demo {
        /// Engine configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Memo policy (overrides the config file)
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Recursion limit (overrides the config file)
        #[arg(long)]
        max_depth: Option<usize>,
        /// Add a back reference from the first book to its owner
        #[arg(long)]
        cyclic: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default replica.toml
    Init {
        /// Target file
        #[arg(default_value = "replica.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List the classes of the sample registry
    Classes,
}

/// Memo policy as accepted on the command line
#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    OnEntry,
    OnField,
}

impl From<PolicyArg> for MemoPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::OnEntry => MemoPolicy::OnEntry,
            PolicyArg::OnField => MemoPolicy::OnField,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            config,
            policy,
            max_depth,
            cyclic,
            json,
        } => commands::demo::execute(commands::demo::DemoArgs {
            config,
            policy: policy.map(MemoPolicy::from),
            max_depth,
            cyclic,
            json,
        }),

        Commands::Init { path, force } => commands::init::execute(&path, force),

        Commands::Classes => commands::classes::execute(),
    }
}
