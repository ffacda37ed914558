use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::food::FoodTable;

/// Reasons a configuration is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("initial snake length {length} does not fit a grid {width} cells wide")]
    SnakeTooLong { length: usize, width: usize },
    #[error("food weights sum to zero")]
    NoSpawnableFood,
    #[error("points_per_level must be positive")]
    ZeroPointsPerLevel,
    #[error("base_tick_rate must be positive")]
    ZeroTickRate,
    #[error("max_spawn_attempts must be positive")]
    ZeroSpawnAttempts,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    /// Per-kind color, points, weight and expiry
    pub food: FoodTable,

    // Pacing (consumed by the driver)
    /// Ticks per second at level 1
    pub base_tick_rate: u32,
    /// Extra ticks per second gained with every level
    pub tick_rate_increment: u32,
    /// Score needed per level
    pub points_per_level: u32,

    /// Random cell draws before falling back to scanning for free cells
    pub max_spawn_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 1,
            food: FoodTable::default(),
            base_tick_rate: 8,
            tick_rate_increment: 2,
            points_per_level: 50,
            max_spawn_attempts: 1024,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Derive the grid from a window size and a cell size, both in pixels
    pub fn from_window(window_width: usize, window_height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        Self::new(window_width / cell_size, window_height / cell_size)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Load a JSON configuration file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, text)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        if self.initial_snake_length > self.grid_width {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }

        if self.food.total_weight() == 0 {
            return Err(ConfigError::NoSpawnableFood);
        }

        if self.points_per_level == 0 {
            return Err(ConfigError::ZeroPointsPerLevel);
        }

        if self.base_tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        if self.max_spawn_attempts == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }

        Ok(())
    }

    /// Level reached with the given score
    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.points_per_level.max(1) + 1
    }

    /// Ticks per second at the given level
    pub fn tick_rate(&self, level: u32) -> u32 {
        self.base_tick_rate
            .saturating_add(level.saturating_sub(1).saturating_mul(self.tick_rate_increment))
    }

    /// Time between ticks at the given level
    pub fn tick_interval(&self, level: u32) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate(level).max(1)))
    }
}
