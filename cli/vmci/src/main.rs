//! vmci CLI: inspect and assemble compiler backends from a runtime config file.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "vmci", version, about = "Compiler backend assembly for the host VM")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available backend architectures
    Archs,
    /// Show the target description derived from a config file
    Target {
        /// Runtime config file (TOML with a [constants] table)
        #[arg(long)]
        config: PathBuf,
        /// Architecture identifier
        #[arg(long, default_value = "loongarch64")]
        arch: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Assemble a backend and print the assembly report
    Assemble {
        /// Runtime config file (TOML with a [constants] table)
        #[arg(long)]
        config: PathBuf,
        /// Architecture identifier
        #[arg(long, default_value = "loongarch64")]
        arch: String,
    },
    /// Print a sample runtime config file
    Template,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", error_line(&e));
        process::exit(1);
    }
}

/// The single line a failed command prints to stderr.
fn error_line(e: &anyhow::Error) -> String {
    format!("error: {e:#}")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Archs => commands::archs::run(),
        Commands::Target { config, arch, json } => commands::target::run(&config, &arch, json),
        Commands::Assemble { config, arch } => commands::assemble::run(&config, &arch),
        Commands::Template => commands::template::run(),
    }
}
