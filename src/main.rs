//! # Wayfarer Main Entry Point
//!
//! Parses the command line, sets up logging, loads or creates the save and
//! runs the scene loop.

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use macroquad::prelude::*;
use ::rand::rngs::StdRng;
use ::rand::SeedableRng;
use std::path::PathBuf;
use wayfarer::{
    config, GameState, InputHandler, JsonSaveFile, SaveStore, SceneManager, WayfarerResult,
    WorldConfig,
};

/// Command line arguments for Wayfarer.
#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "A small town-and-map adventure with wandering monsters")]
#[command(version)]
struct Args {
    /// Random seed for map generation, monsters and combat
    #[arg(short, long)]
    seed: Option<u64>,

    /// Save file to load from and write to
    #[arg(long, default_value = config::DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Ignore any existing save and start over
    #[arg(long)]
    new_game: bool,

    /// Player name for a new game
    #[arg(short, long, default_value = "Wayfarer")]
    name: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: config::GAME_TITLE.to_string(),
        window_width: 1024,
        window_height: 768,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting {} v{}", config::GAME_TITLE, wayfarer::VERSION);

    if let Err(e) = run_game(&args).await {
        error!("Game ended with an error: {}", e);
    }
}

/// Initializes env_logger; `RUST_LOG` overrides the command line level.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

/// Loads or creates the game and runs it until the player quits.
async fn run_game(args: &Args) -> WayfarerResult<()> {
    let seed = args.seed.unwrap_or_else(::rand::random);
    info!("Using seed {}", seed);
    let rng = StdRng::seed_from_u64(seed);

    let store: Box<dyn SaveStore> = Box::new(JsonSaveFile::new(&args.save_file));
    let game_state = if args.new_game {
        info!("Starting a new game as {}", args.name);
        GameState::new(&args.name, store, WorldConfig::default(), rng)
    } else {
        GameState::load_or_new(&args.name, store, WorldConfig::default(), rng)
    };

    let mut scenes = SceneManager::new(game_state, InputHandler::new());
    scenes.run().await?;

    info!("Game loop ended");
    Ok(())
}
