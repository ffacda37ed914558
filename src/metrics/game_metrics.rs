use std::time::{Duration, Instant};

use crate::game::{FoodKind, TickInfo};

/// Session statistics shown in the HUD
pub struct GameMetrics {
    game_started: Instant,
    pub elapsed_time: Duration,
    /// Food eaten this game, indexed like `FoodKind::ALL`
    pub eaten: [u32; 3],
    pub expired: u32,
    pub high_score: u32,
    pub best_level: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            game_started: Instant::now(),
            elapsed_time: Duration::ZERO,
            eaten: [0; 3],
            expired: 0,
            high_score: 0,
            best_level: 1,
            games_played: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.game_started.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.game_started = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.eaten = [0; 3];
        self.expired = 0;
    }

    pub fn on_tick(&mut self, outcome: &TickInfo) {
        if let Some(kind) = outcome.eaten {
            self.eaten[kind_index(kind)] += 1;
        }
        if outcome.food_expired {
            self.expired += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32, final_level: u32) {
        self.games_played += 1;
        self.high_score = self.high_score.max(final_score);
        self.best_level = self.best_level.max(final_level);
    }

    pub fn eaten_of(&self, kind: FoodKind) -> u32 {
        self.eaten[kind_index(kind)]
    }

    /// Elapsed game time as MM:SS
    pub fn format_time(&self) -> String {
        let secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

fn kind_index(kind: FoodKind) -> usize {
    match kind {
        FoodKind::Regular => 0,
        FoodKind::Special => 1,
        FoodKind::Bonus => 2,
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
