use super::{
    action::Direction,
    config::GameConfig,
    food::{Food, FoodKind},
    state::{GamePhase, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, info};

/// Information about a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInfo {
    /// False when the phase made the tick a no-op
    pub advanced: bool,
    /// Kind of food eaten this tick
    pub eaten: Option<FoodKind>,
    /// Whether an expiring food item timed out and was replaced
    pub food_expired: bool,
    /// Whether a level threshold was crossed
    pub leveled_up: bool,
    /// Whether the snake ran into itself
    pub collided: bool,
}

/// The game engine that handles all game logic
pub struct GameEngine<R: Rng = StdRng> {
    config: GameConfig,
    rng: R,
}

impl GameEngine<StdRng> {
    /// Create a new game engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self, now_ms: u64) -> GameState {
        let (width, height) = (self.config.grid_width, self.config.grid_height);
        let center = Position::new((width / 2) as i32, (height / 2) as i32);

        let snake = Snake::new(
            center,
            Direction::Right,
            self.config.initial_snake_length,
            width,
            height,
        );

        let food = self.spawn_food(&snake, now_ms);
        info!(width, height, "new game");

        GameState::new(snake, food, width, height)
    }

    /// Queue a direction for the next tick.
    ///
    /// Ignored outside the playing phase and when it would reverse the snake
    /// onto its own neck.
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) {
        if !state.is_playing() || state.snake.direction.is_opposite(direction) {
            return;
        }
        state.pending_direction = direction;
    }

    /// Leave the level-complete banner; nothing else changes
    pub fn acknowledge_level(&self, state: &mut GameState) {
        if state.phase == GamePhase::LevelComplete {
            state.phase = GamePhase::Playing;
        }
    }

    /// Advance the simulation by one step
    pub fn tick(&mut self, state: &mut GameState, now_ms: u64) -> TickInfo {
        let mut outcome = TickInfo::default();

        if !state.is_playing() {
            return outcome;
        }
        outcome.advanced = true;

        state.snake.direction = state.pending_direction;
        let (width, height) = (state.grid_width, state.grid_height);
        let new_head = state.snake.head().stepped(state.snake.direction, width, height);

        // The tail cell still counts: it hasn't moved away yet.
        if state.snake.occupies(new_head) {
            state.phase = GamePhase::GameOver;
            outcome.collided = true;
            info!(score = state.score, level = state.level, "game over");
            return outcome;
        }

        state.snake.push_head(new_head);
        state.ticks += 1;

        // Expiry runs before the eat check, so an item timing out under the
        // head is replaced and scores nothing.
        if let Some(food) = state.food {
            if food.is_expired(&self.config.food, now_ms) {
                debug!(kind = food.kind.name(), "food expired");
                state.food = self.spawn_food(&state.snake, now_ms);
                outcome.food_expired = true;
            }
        }

        match state.food.filter(|food| food.position == new_head) {
            Some(food) => self.eat(state, food, now_ms, &mut outcome),
            None => {
                state.snake.pop_tail();
            }
        }

        outcome
    }

    fn eat(&mut self, state: &mut GameState, food: Food, now_ms: u64, outcome: &mut TickInfo) {
        let points = self.config.food.spec(food.kind).points;
        state.score = state.score.saturating_add(points);
        outcome.eaten = Some(food.kind);
        debug!(kind = food.kind.name(), points, score = state.score, "food eaten");

        let new_level = self.config.level_for_score(state.score);
        if new_level > state.level {
            state.level = new_level;
            state.phase = GamePhase::LevelComplete;
            outcome.leveled_up = true;
            info!(level = new_level, score = state.score, "level complete");
        }

        state.food = self.spawn_food(&state.snake, now_ms);
    }

    /// Ticks per second the driver should run at for this state
    pub fn tick_rate(&self, state: &GameState) -> u32 {
        self.config.tick_rate(state.level)
    }

    /// Spawn food of a weighted-random kind at a random cell off the snake.
    ///
    /// Rejection sampling is capped at `max_spawn_attempts`; past that a free
    /// cell is picked uniformly from a full scan. Returns `None` when the
    /// snake covers every cell.
    fn spawn_food(&mut self, snake: &Snake, now_ms: u64) -> Option<Food> {
        let kind = self.config.food.choose_kind(&mut self.rng);
        let (width, height) = (self.config.grid_width, self.config.grid_height);

        for _ in 0..self.config.max_spawn_attempts {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                debug!(kind = kind.name(), x, y, "food spawned");
                return Some(Food::new(pos, kind, now_ms));
            }
        }

        let free: Vec<Position> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        if free.is_empty() {
            info!("no free cell left for food");
            return None;
        }

        let pos = free[self.rng.gen_range(0..free.len())];
        debug!(kind = kind.name(), x = pos.x, y = pos.y, "food spawned after scan");
        Some(Food::new(pos, kind, now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 1)
    }

    /// 40x30 state with the given body, heading and food
    fn state_with(body: Vec<Position>, direction: Direction, food: Option<Food>) -> GameState {
        let snake = Snake { body, direction };
        GameState::new(snake, food, 40, 30)
    }

    fn regular_at(x: i32, y: i32) -> Option<Food> {
        Some(Food::new(Position::new(x, y), FoodKind::Regular, 0))
    }

    fn assert_food_off_snake(state: &GameState) {
        let food = state.food.expect("food present");
        assert!(!state.is_occupied_by_snake(food.position));
        assert!(food.position.x >= 0 && (food.position.x as usize) < state.grid_width);
        assert!(food.position.y >= 0 && (food.position.y as usize) < state.grid_height);
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset(0);

        assert!(state.is_playing());
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.body, vec![Position::new(20, 15)]);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_food_off_snake(&state);
    }

    #[test]
    fn test_reset_with_longer_snake() {
        let mut config = GameConfig::small();
        config.initial_snake_length = 3;
        let mut engine = GameEngine::with_seed(config, 3);
        let state = engine.reset(0);

        assert_eq!(
            state.snake.body,
            vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]
        );
        assert_food_off_snake(&state);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, regular_at(30, 20));

        let info = engine.tick(&mut state, 0);

        assert!(info.advanced);
        assert_eq!(info.eaten, None);
        assert_eq!(state.ticks, 1);
        assert_eq!(state.snake.body, vec![Position::new(6, 5)]);
    }

    #[test]
    fn test_wrap_on_both_axes() {
        let mut engine = engine();
        let food = regular_at(10, 10);

        let mut state = state_with(vec![Position::new(39, 7)], Direction::Right, food);
        engine.tick(&mut state, 0);
        assert_eq!(state.snake.head(), Position::new(0, 7));

        let mut state = state_with(vec![Position::new(0, 7)], Direction::Left, food);
        engine.tick(&mut state, 0);
        assert_eq!(state.snake.head(), Position::new(39, 7));

        let mut state = state_with(vec![Position::new(3, 0)], Direction::Up, food);
        engine.tick(&mut state, 0);
        assert_eq!(state.snake.head(), Position::new(3, 29));

        let mut state = state_with(vec![Position::new(3, 29)], Direction::Down, food);
        engine.tick(&mut state, 0);
        assert_eq!(state.snake.head(), Position::new(3, 0));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = state_with(vec![Position::new(20, 15)], Direction::Right, regular_at(21, 15));

        let info = engine.tick(&mut state, 0);

        assert_eq!(info.eaten, Some(FoodKind::Regular));
        assert_eq!(state.score, 10);
        assert_eq!(
            state.snake.body,
            vec![Position::new(21, 15), Position::new(20, 15)]
        );
        assert!(state.is_playing());
        assert_food_off_snake(&state);
    }

    #[test]
    fn test_points_follow_kind() {
        let mut engine = engine();
        for (kind, points) in [
            (FoodKind::Regular, 10),
            (FoodKind::Special, 25),
            (FoodKind::Bonus, 50),
        ] {
            let food = Some(Food::new(Position::new(6, 5), kind, 0));
            let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, food);
            engine.tick(&mut state, 100);
            assert_eq!(state.score, points);
        }
    }

    #[test]
    fn test_self_collision_into_tail() {
        let mut engine = engine();
        // A 2x2 loop: the head moving up lands on the tail cell.
        let body = vec![
            Position::new(5, 6),
            Position::new(6, 6),
            Position::new(6, 5),
            Position::new(5, 5),
        ];
        let mut state = state_with(body.clone(), Direction::Left, regular_at(30, 20));
        engine.set_direction(&mut state, Direction::Up);

        let info = engine.tick(&mut state, 0);

        assert!(info.collided);
        assert!(state.is_game_over());
        assert_eq!(state.snake.body, body);
        assert_eq!(state.ticks, 0);
    }

    #[test]
    fn test_self_collision_on_longer_path() {
        let mut engine = engine();
        let mut config = GameConfig::small();
        config.initial_snake_length = 5;
        let mut state = GameEngine::with_seed(config, 9).reset(0);
        state.food = None;

        engine.tick(&mut state, 0);
        engine.set_direction(&mut state, Direction::Down);
        engine.tick(&mut state, 0);
        engine.set_direction(&mut state, Direction::Left);
        engine.tick(&mut state, 0);
        engine.set_direction(&mut state, Direction::Up);
        let info = engine.tick(&mut state, 0);

        assert!(info.collided);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, None);

        engine.set_direction(&mut state, Direction::Left);
        assert_eq!(state.pending_direction, Direction::Right);

        engine.set_direction(&mut state, Direction::Up);
        assert_eq!(state.pending_direction, Direction::Up);

        // Still measured against the heading, not the queued turn
        engine.set_direction(&mut state, Direction::Left);
        assert_eq!(state.pending_direction, Direction::Up);
        engine.set_direction(&mut state, Direction::Down);
        assert_eq!(state.pending_direction, Direction::Down);
    }

    #[test]
    fn test_direction_ignored_outside_playing() {
        let engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, None);

        state.phase = GamePhase::GameOver;
        engine.set_direction(&mut state, Direction::Up);
        assert_eq!(state.pending_direction, Direction::Right);

        state.phase = GamePhase::LevelComplete;
        engine.set_direction(&mut state, Direction::Up);
        assert_eq!(state.pending_direction, Direction::Right);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = engine();
        let mut state = engine.reset(0);
        state.phase = GamePhase::GameOver;
        let before = state.clone();

        for t in 0..10 {
            let info = engine.tick(&mut state, t * 1000);
            assert!(!info.advanced);
        }

        assert_eq!(state, before);
    }

    #[test]
    fn test_level_up_pauses_until_acknowledged() {
        let mut engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, regular_at(6, 5));
        state.score = 40;

        let info = engine.tick(&mut state, 0);

        assert!(info.leveled_up);
        assert_eq!(state.score, 50);
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::LevelComplete);

        let frozen = state.clone();
        engine.tick(&mut state, 10);
        engine.tick(&mut state, 20);
        assert_eq!(state, frozen);

        engine.acknowledge_level(&mut state);
        assert!(state.is_playing());
        assert_eq!(state.level, 2);
        assert_eq!(state.score, 50);
        assert_eq!(state.snake, frozen.snake);

        engine.tick(&mut state, 30);
        assert_eq!(state.snake.head(), Position::new(7, 5));
    }

    #[test]
    fn test_acknowledge_is_noop_elsewhere() {
        let engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, None);
        state.phase = GamePhase::GameOver;

        engine.acknowledge_level(&mut state);

        assert!(state.is_game_over());
    }

    #[test]
    fn test_large_gain_can_skip_levels() {
        let mut config = GameConfig::default();
        config.food.bonus.points = 120;
        let mut engine = GameEngine::with_seed(config, 2);
        let food = Some(Food::new(Position::new(6, 5), FoodKind::Bonus, 0));
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, food);

        engine.tick(&mut state, 0);

        assert_eq!(state.level, 3);
        assert_eq!(state.phase, GamePhase::LevelComplete);
    }

    #[test]
    fn test_bonus_expires_before_eating() {
        let mut engine = engine();
        let food = Some(Food::new(Position::new(6, 5), FoodKind::Bonus, 0));
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, food);

        let info = engine.tick(&mut state, 5001);

        assert!(info.food_expired);
        assert_eq!(info.eaten, None);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.body, vec![Position::new(6, 5)]);
        let replacement = state.food.expect("replacement food");
        assert_ne!(replacement.position, Position::new(6, 5));
        assert_eq!(replacement.spawned_at_ms, 5001);
    }

    #[test]
    fn test_bonus_still_edible_at_exact_lifetime() {
        let mut engine = engine();
        let food = Some(Food::new(Position::new(6, 5), FoodKind::Bonus, 0));
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, food);

        let info = engine.tick(&mut state, 5000);

        assert!(!info.food_expired);
        assert_eq!(info.eaten, Some(FoodKind::Bonus));
        assert_eq!(state.score, 50);
    }

    #[test]
    fn test_regular_food_never_expires() {
        let mut engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, regular_at(30, 20));

        let info = engine.tick(&mut state, 1_000_000);

        assert!(!info.food_expired);
        assert_eq!(state.food, regular_at(30, 20));
    }

    #[test]
    fn test_spawn_falls_back_to_scan() {
        let mut config = GameConfig::new(3, 1);
        config.max_spawn_attempts = 1;
        let mut engine = GameEngine::with_seed(config, 5);
        let snake = Snake {
            body: vec![Position::new(0, 0), Position::new(1, 0)],
            direction: Direction::Left,
        };

        for _ in 0..20 {
            let food = engine.spawn_food(&snake, 0).expect("one free cell");
            assert_eq!(food.position, Position::new(2, 0));
        }
    }

    #[test]
    fn test_spawn_on_full_grid_yields_none() {
        let mut engine = GameEngine::with_seed(GameConfig::new(2, 1), 5);
        let snake = Snake {
            body: vec![Position::new(0, 0), Position::new(1, 0)],
            direction: Direction::Right,
        };

        assert_eq!(engine.spawn_food(&snake, 0), None);
    }

    #[test]
    fn test_invariants_hold_over_random_play() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 11);
        let mut state = engine.reset(0);
        let mut now = 0;

        for step in 0..2000u64 {
            let direction = Direction::ALL[(step * 7 % 4) as usize];
            engine.set_direction(&mut state, direction);

            let score_before = state.score;
            let len_before = state.snake.len();
            now += 125;
            let info = engine.tick(&mut state, now);

            assert!(state.score >= score_before);
            assert_eq!(state.level, engine.config().level_for_score(state.score));
            if info.advanced && !info.collided {
                let grown = info.eaten.is_some() as usize;
                assert_eq!(state.snake.len(), len_before + grown);
            }
            if let Some(food) = state.food {
                assert!(!state.is_occupied_by_snake(food.position));
            }

            match state.phase {
                GamePhase::LevelComplete => engine.acknowledge_level(&mut state),
                GamePhase::GameOver => state = engine.reset(now),
                GamePhase::Playing => {}
            }
        }
    }

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 99);
        let mut b = GameEngine::with_seed(GameConfig::default(), 99);

        for now in 0..20 {
            assert_eq!(a.reset(now), b.reset(now));
        }
    }

    #[test]
    fn test_tick_rate_follows_level() {
        let engine = engine();
        let mut state = state_with(vec![Position::new(5, 5)], Direction::Right, None);
        assert_eq!(engine.tick_rate(&state), 8);
        state.level = 3;
        assert_eq!(engine.tick_rate(&state), 12);
    }
}
