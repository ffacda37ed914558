use super::action::Direction;
use super::food::Food;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta, wrapping around a `width` x `height` grid
    pub fn wrapped_by(&self, dx: i32, dy: i32, width: usize, height: usize) -> Self {
        Self {
            x: (self.x + dx).rem_euclid(width as i32),
            y: (self.y + dy).rem_euclid(height as i32),
        }
    }

    /// Move position one cell in a direction on a wrapping grid
    pub fn stepped(&self, direction: Direction, width: usize, height: usize) -> Self {
        let (dx, dy) = direction.delta();
        self.wrapped_by(dx, dy, width, height)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction of the last completed move
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose extra segments trail behind the head, wrapping at edges
    pub fn new(
        head: Position,
        direction: Direction,
        length: usize,
        width: usize,
        height: usize,
    ) -> Self {
        let mut body = vec![head];
        let back = direction.opposite();

        for i in 1..length.max(1) {
            let prev = body[i - 1];
            body.push(prev.stepped(back, width, height));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// True if any segment, head and tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, head: Position) {
        self.body.insert(0, head);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The game's current macro-state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// A level threshold was crossed; waits for the player to continue
    LevelComplete,
    /// The snake ran into itself; only a reset leaves this phase
    GameOver,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction applied on the next tick
    pub pending_direction: Direction,
    /// `None` only when the snake covers the whole grid
    pub food: Option<Food>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    pub ticks: u32,
    pub phase: GamePhase,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Option<Food>, grid_width: usize, grid_height: usize) -> Self {
        let pending_direction = snake.direction;
        Self {
            snake,
            pending_direction,
            food,
            grid_width,
            grid_height,
            score: 0,
            level: 1,
            ticks: 0,
            phase: GamePhase::Playing,
        }
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn food_position(&self) -> Option<Position> {
        self.food.map(|food| food.position)
    }
}
