use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mpkcal::config::Config;
use mpkcal::console::{Console, Mode};

/// Scientific, programmer, converter and plotting calculator.
#[derive(Parser, Debug)]
#[command(name = "mpkcal", version, about)]
struct Args {
    /// Mode to start in
    #[arg(short, long, value_enum, default_value_t = Mode::Scientific)]
    mode: Mode,

    /// Config file (default: ~/.config/mpkcal/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print every display update as a JSON object
    #[arg(long)]
    json: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    let config =
        config.with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    init_tracing(&config, args.verbose);
    info!(path = %config_path.display(), mode = ?args.mode, "starting");

    let mut console = Console::new(&config, args.mode, args.json)?;
    console
        .run(io::stdin().lock(), io::stdout().lock())
        .context("Console I/O failed")?;
    Ok(())
}

/// Logs go to stderr so they never mix with the display on stdout.
fn init_tracing(config: &Config, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}
