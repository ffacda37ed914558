//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The driver supplies timestamps and an RNG, so every step is reproducible.

pub mod action;
pub mod config;
pub mod engine;
pub mod food;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickInfo};
pub use food::{Food, FoodKind, FoodSpec, FoodTable, Rgb};
pub use state::{GamePhase, GameState, Position, Snake};
