//! Command-line front end for a game catalog database.
//!
//! Games are read as JSON (from a file or `-` for stdin) and printed as
//! pretty JSON on stdout. Logs go to stderr, or to a rolling file when
//! GAMEDATA_LOG_DIR is set, so stdout stays machine-readable.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use catalog::{config, Database, Filter, GameRepository};
use clap::{Parser, Subcommand};
use gamedata::{is_known_mode, Game};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Top-level CLI arguments.
#[derive(Parser)]
#[command(name = "gamedata-catalog", about = "Catalog of owned games and their player modes")]
struct Cli {
    /// Database file. Defaults to GAMEDATA_DB_PATH or the user config dir.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog tables if they are missing.
    Init,
    /// Add a new game from a JSON file (`-` reads stdin).
    Add { input: PathBuf },
    /// Replace an existing game's attributes and player modes.
    Update { input: PathBuf },
    /// Delete a game. Succeeds even if the id is unknown.
    Remove { id: String },
    /// Print one game.
    Get { id: String },
    /// Print games, optionally filtered.
    List {
        /// `key=value` filter, e.g. `title=halo` or `mode=local-co-op`.
        /// Repeat to combine. Unknown keys are ignored.
        #[arg(short, long = "filter", value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },
    /// Drop and recreate both tables, deleting every game.
    Rebuild {
        /// Confirm that all data should be deleted.
        #[arg(long)]
        yes: bool,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

/// Install the tracing subscriber. The returned guard flushes file logs on drop.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match config::get_log_dir() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir).ok();
            let file_appender = tracing_appender::rolling::daily(log_dir, "gamedata-catalog");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true),
                )
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn read_game(input: &Path) -> anyhow::Result<Game> {
    let json = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read game from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    let game: Game = serde_json::from_str(&json).context("invalid game JSON")?;

    for mode in &game.player_modes {
        if !is_known_mode(&mode.mode) {
            tracing::warn!(id = %game.id, mode = %mode.mode, "unrecognised player mode");
        }
    }
    Ok(game)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing();

    let db_path = config::get_db_path(cli.db);
    tracing::debug!("Using database: {}", db_path.display());
    let db = Database::open(&db_path)
        .await
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    let games = db.games();

    match cli.command {
        Commands::Init => {
            games.ensure_schema().await?;
            tracing::info!("Catalog ready at {}", db_path.display());
        }
        Commands::Add { input } => {
            let game = read_game(&input)?;
            games.add(&game).await?;
        }
        Commands::Update { input } => {
            let game = read_game(&input)?;
            games.update(&game).await?;
        }
        Commands::Remove { id } => games.remove(&id).await?,
        Commands::Get { id } => print_json(&games.get(&id).await?)?,
        Commands::List { filters } => {
            let filters = Filter::parse_pairs(filters);
            print_json(&games.query(&filters).await?)?;
        }
        Commands::Rebuild { yes } => {
            if !yes {
                bail!("rebuild deletes every game; pass --yes to confirm");
            }
            games.rebuild().await?;
            tracing::warn!("Catalog rebuilt at {}", db_path.display());
        }
    }

    Ok(())
}
