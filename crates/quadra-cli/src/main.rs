//! Quadra CLI - SQ quadraphonic encoder, decoder and separation analyzer.

mod commands;

use clap::{Parser, Subcommand};
use commands::common::GlobalOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quadra")]
#[command(author, version, about = "SQ quadraphonic matrix encoder/decoder", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings file (TOML); command-line flags take precedence
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode SQ-encoded stereo (LT, RT) to quadraphonic (LF, RF, LB, RB)
    Decode(commands::decode::DecodeArgs),

    /// Encode quadraphonic (LF, RF, LB, RB) to SQ stereo (LT, RT)
    Encode(commands::encode::EncodeArgs),

    /// Measure channel separation of a quad file via encode -> decode
    Analyze(commands::analyze::AnalyzeArgs),

    /// Generate a 4-channel test file with tones and noise
    Generate(commands::generate::GenerateArgs),

    /// Display WAV file information
    Info(commands::info::InfoArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let global = GlobalOptions::load(cli.config.as_deref(), cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Decode(args) => commands::decode::run(args, &global),
        Commands::Encode(args) => commands::encode::run(args, &global),
        Commands::Analyze(args) => commands::analyze::run(args, &global),
        Commands::Generate(args) => commands::generate::run(args, &global),
        Commands::Info(args) => commands::info::run(args),
    }
}
