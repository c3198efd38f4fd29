use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "hecrypt")]
#[command(about = "Encrypt text under Paillier, CKKS and BFV")]
#[command(version)]
struct Cli {
    /// Output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./hecrypt.toml)
    #[arg(long, global = true, env = "HECRYPT_CONFIG")]
    config: Option<PathBuf>,

    /// Small, insecure parameters for quick experiments
    #[arg(long, global = true)]
    fast: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true, env = "HECRYPT_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured schemes and their parameters
    Methods,
    /// Encrypt a file and write one artifact per scheme
    Encrypt(commands::encrypt::EncryptArgs),
    /// Encrypt then decrypt in-process and compare
    Roundtrip(commands::roundtrip::RoundtripArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hecrypt={level},hecrypt_core={level},hecrypt_storage={level}"
        ))
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr)
        .init();

    let ctx = commands::Context {
        json_output: cli.json,
        config_path: cli.config,
        fast: cli.fast,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Methods => commands::methods::run(&ctx).await,
        Commands::Encrypt(args) => commands::encrypt::run(args, &ctx).await,
        Commands::Roundtrip(args) => commands::roundtrip::run(args, &ctx).await,
    };

    if let Err(e) = &result {
        output::print_error(format!("{e:#}"));
        std::process::exit(1);
    }
    Ok(())
}
