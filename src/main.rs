use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snake_ledger::game::{FoodSpawner, GameConfig, GameLoop};
use snake_ledger::modes::{PlayMode, write_history, write_leaderboard, write_run_summary};
use snake_ledger::persistence::JsonFileStore;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_ledger")]
#[command(version, about = "Snake game with saved progress and a leaderboard")]
struct Cli {
    /// What to do
    #[arg(long, default_value = "play")]
    mode: Mode,

    /// Player name used for checkpoints
    #[arg(long, default_value = "player")]
    player: String,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON ledger holding every player's checkpoints
    #[arg(long, default_value = "snake_scores.json")]
    store: PathBuf,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Where log output goes; the terminal belongs to the game
    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Number of leaderboard rows
    #[arg(long, default_value = "10")]
    limit: usize,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Play snake with keyboard controls
    Play,
    /// Show the best runs
    Leaderboard,
    /// Show a player's saved checkpoints
    History,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse config {:?}", path))?
        }
        None => GameConfig::default(),
    };

    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }

    config
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid configuration: {}", reason))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let store = JsonFileStore::open(&cli.store)
        .with_context(|| format!("Failed to open score store {:?}", cli.store))?;

    match cli.mode {
        Mode::Play => {
            let config = load_config(&cli)?;
            let spawner = match cli.seed {
                Some(seed) => FoodSpawner::seeded(&config, seed),
                None => FoodSpawner::new(&config),
            }
            .context("Failed to set up food spawner")?;

            let game = GameLoop::with_spawner(config, cli.player.clone(), store, spawner)
                .context("Failed to start game")?;
            let previous = game.previous();

            let mut play_mode = PlayMode::new(game);
            let outcome = play_mode.run().await;

            // The terminal is back on the main screen here.
            write_run_summary(
                &mut io::stdout().lock(),
                &cli.player,
                previous,
                play_mode.game().state(),
            )?;
            outcome?;
        }
        Mode::Leaderboard => {
            write_leaderboard(&mut io::stdout().lock(), store.ledger(), cli.limit)?;
        }
        Mode::History => {
            write_history(&mut io::stdout().lock(), store.ledger(), &cli.player)?;
        }
    }

    Ok(())
}
