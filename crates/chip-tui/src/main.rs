use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod input;
mod render;
mod tui;

use app::Seed;

#[derive(Parser)]
#[command(name = "chip-tracker")]
#[command(about = "Track poker buy-ins and reconcile final chip counts", long_about = None)]
struct Cli {
    /// Seat a player before starting, as NAME=BUYIN (repeatable)
    #[arg(short, long = "player", value_name = "NAME=BUYIN", value_parser = parse_seed)]
    players: Vec<Seed>,

    /// Open on the four-player sample table (seats 1, 4, 6, 8)
    #[arg(long)]
    demo: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Parse `NAME=BUYIN`. A missing `=BUYIN` leaves the buy-in blank so the
/// default applies.
fn parse_seed(raw: &str) -> Result<Seed, String> {
    let (name, buy_in) = match raw.split_once('=') {
        Some((name, buy_in)) => (name.trim(), buy_in.trim()),
        None => (raw.trim(), ""),
    };
    if name.is_empty() && buy_in.is_empty() {
        return Err("expected NAME=BUYIN".to_string());
    }
    Ok(Seed {
        name: name.to_string(),
        buy_in: buy_in.to_string(),
    })
}

/// Initialise tracing into a file. The terminal belongs to the TUI, so
/// without a file nothing is logged.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Cannot open log file {}: {}", path.display(), e);
        return;
    }
    tracing::info!("chip tracker started");

    if let Err(e) = app::start(cli.demo, cli.players).await {
        eprintln!("Error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parsing() {
        assert_eq!(
            parse_seed("Alice=20").unwrap(),
            Seed {
                name: "Alice".to_string(),
                buy_in: "20".to_string(),
            }
        );
        assert_eq!(parse_seed(" Bob ").unwrap().buy_in, "");
        assert_eq!(parse_seed("=15").unwrap().name, "");
        assert!(parse_seed("=").is_err());
    }

    #[test]
    fn cli_accepts_repeated_players() {
        let cli = Cli::parse_from(["chip-tracker", "-p", "Ann=5", "--player", "Ben=7.5", "--demo"]);
        assert_eq!(cli.players.len(), 2);
        assert!(cli.demo);
        assert!(cli.log_file.is_none());
    }
}
