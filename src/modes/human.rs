use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    clock: Instant,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let renderer = Renderer::new(config.food.clone());
        let mut engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };
        let clock = Instant::now();
        let state = engine.reset(0);

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            clock,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        // The terminal is restored even when the loop fails
        let result = self.run_game_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session finished"
        );
        result
    }

    async fn run_game_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Tick pacing follows the level; the timer is rebuilt when it changes
        let mut tick_rate = self.engine.tick_rate(&self.state);
        let mut tick_timer = self.tick_timer();
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let rate = self.engine.tick_rate(&self.state);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics, rate);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            let rate = self.engine.tick_rate(&self.state);
            if rate != tick_rate {
                debug!(from = tick_rate, to = rate, "tick rate changed");
                tick_rate = rate;
                tick_timer = self.tick_timer();
            }
        }

        Ok(())
    }

    fn tick_timer(&self) -> Interval {
        let period = self.engine.config().tick_interval(self.state.level);
        debug!(level = self.state.level, period_ms = period.as_millis() as u64, "tick timer");
        let mut timer = interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let key_action = self.input_handler.handle_key_event(key);
            if key_action == KeyAction::Quit {
                self.should_quit = true;
                return;
            }

            if let Some(action) = key_action.for_phase(self.state.phase) {
                self.apply_action(action);
            }
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Move(direction) => self.engine.set_direction(&mut self.state, direction),
            Action::Restart => self.reset_game(),
            Action::Continue => self.engine.acknowledge_level(&mut self.state),
        }
    }

    fn update_game(&mut self) {
        let now_ms = self.now_ms();
        let outcome = self.engine.tick(&mut self.state, now_ms);
        self.metrics.on_tick(&outcome);

        if outcome.collided {
            self.metrics.on_game_over(self.state.score, self.state.level);
        }
    }

    fn reset_game(&mut self) {
        let now_ms = self.now_ms();
        self.state = self.engine.reset(now_ms);
        self.metrics.on_game_start();
    }

    /// Milliseconds since the session started
    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

}

type Tui = Terminal<CrosstermBackend<Stderr>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stderr = stderr();
    execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stderr)).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;
    terminal.clear().context("Failed to clear terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
