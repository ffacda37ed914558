use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction, GamePhase};

/// What a key press means before the game phase is taken into account
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    GameAction(Action),
    /// Space or Enter: restart after a game over, continue after a level
    Confirm,
    Quit,
    None,
}

impl KeyAction {
    /// Resolve into the game action this key means in `phase`.
    ///
    /// Keys that don't apply to the phase resolve to `None` and are dropped.
    pub fn for_phase(&self, phase: GamePhase) -> Option<Action> {
        let action = match self {
            KeyAction::GameAction(action) => *action,
            KeyAction::Confirm => match phase {
                GamePhase::Playing => return None,
                GamePhase::LevelComplete => Action::Continue,
                GamePhase::GameOver => Action::Restart,
            },
            KeyAction::Quit | KeyAction::None => return None,
        };

        let applies = match action {
            Action::Move(_) => phase == GamePhase::Playing,
            Action::Restart => phase == GamePhase::GameOver,
            Action::Continue => phase == GamePhase::LevelComplete,
        };
        applies.then_some(action)
    }
}

/// Arrow keys and WASD (either case)
fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        },
        _ => None,
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        if let Some(direction) = direction_for(key.code) {
            return KeyAction::GameAction(Action::Move(direction));
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => KeyAction::Confirm,
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'r' => KeyAction::GameAction(Action::Restart),
                'c' => KeyAction::GameAction(Action::Continue),
                'q' => KeyAction::Quit,
                _ => KeyAction::None,
            },
            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
