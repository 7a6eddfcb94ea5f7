//! # Wayfarer
//!
//! A small turn-based adventure: a town hub with a shop, a random-encounter
//! combat resolver, and a persistent exploration map populated by wandering
//! monsters.
//!
//! ## Architecture Overview
//!
//! The heart of the crate is the exploration-and-encounter engine in [`game`]:
//!
//! - **Entity Model**: monster templates, rolled instances and their records
//! - **Grid World State**: positions, bounds, occupancy and placement
//! - **Monster Controller**: stochastic wandering with collision avoidance
//! - **Exploration Loop**: the input-driven state machine that detects encounters
//! - **Encounter Bridge**: hands an encounter to combat and reconciles the result
//!
//! Everything else is a collaborator of that engine: the [`town`] hub, the
//! [`combat`] resolver, [`persistence`] of the player record, and the
//! macroquad front end in [`input`], [`rendering`] and [`scenes`].
//!
//! All random draws go through an injected [`rand::Rng`], so every scenario
//! can be replayed from a seed.

pub mod combat;
pub mod game;
pub mod input;
pub mod persistence;
pub mod rendering;
pub mod scenes;
pub mod town;

// Core module re-exports
pub use combat::*;
pub use game::*;
pub use input::*;
pub use persistence::*;
pub use rendering::*;
pub use scenes::*;
pub use town::*;

use std::path::PathBuf;

/// Core error type for the Wayfarer game engine.
#[derive(thiserror::Error, Debug)]
pub enum WayfarerError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// No save file exists at the given path
    #[error("No saved game found at {}", .0.display())]
    SaveNotFound(PathBuf),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),
}

/// Result type used throughout the Wayfarer codebase.
pub type WayfarerResult<T> = Result<T, WayfarerError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Window and title text
    pub const GAME_TITLE: &str = "Wayfarer";

    /// Side length of the square exploration map in tiles
    pub const GRID_SIZE: i32 = 10;

    /// Random draws made when placing a monster before falling back to the corner
    pub const PLACEMENT_ATTEMPTS: usize = 200;

    /// Monsters spawned on a fresh map
    pub const INITIAL_MONSTERS: usize = 2;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: i32 = 100;

    /// Default player starting gold
    pub const DEFAULT_PLAYER_GOLD: i32 = 50;

    /// Save file used when none is given on the command line
    pub const DEFAULT_SAVE_FILE: &str = "savegame.json";
}
