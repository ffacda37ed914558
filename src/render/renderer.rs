use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{FoodKind, FoodTable, GamePhase, GameState, Position, Rgb};
use crate::metrics::GameMetrics;

/// Terminal columns used per grid cell
const CELL_WIDTH: u16 = 2;

pub struct Renderer {
    food: FoodTable,
}

impl Renderer {
    pub fn new(food: FoodTable) -> Self {
        Self { food }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics, tick_rate: u32) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics, tick_rate);
        frame.render_widget(stats, chunks[0]);

        let game_area = grid_area(chunks[1], state);
        frame.render_widget(self.render_grid(state), game_area);

        // Phase banners sit on top of the frozen grid
        let banner_area = centered(chunks[1], 44, 9);
        let banner = match state.phase {
            GamePhase::Playing => None,
            GamePhase::LevelComplete => Some(self.render_level_complete(state)),
            GamePhase::GameOver => Some(self.render_game_over(state, metrics)),
        };
        if let Some(banner) = banner {
            frame.render_widget(Clear, banner_area);
            frame.render_widget(banner, banner_area);
        }

        let controls = self.render_controls(state.phase);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let mut lines = Vec::with_capacity(state.grid_height);
        let food = state.food;

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if pos == state.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("■ ", Style::default().fg(Color::Green))
                } else if let Some(food) = food.filter(|food| food.position == pos) {
                    let color = to_color(self.food.spec(food.kind).color);
                    Span::styled("● ", Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled("· ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics, tick_rate: u32) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let totals = Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(state.level.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{tick_rate}/s"), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
        ]);

        let mut eaten = vec![Span::styled("Eaten: ", label)];
        for kind in FoodKind::ALL {
            let color = to_color(self.food.spec(kind).color);
            eaten.push(Span::styled(format!("● {} ", kind.name()), Style::default().fg(color)));
            eaten.push(Span::styled(format!("{}   ", metrics.eaten_of(kind)), value));
        }
        eaten.push(Span::styled("expired ", label));
        eaten.push(Span::styled(metrics.expired.to_string(), value));

        let text = vec![totals, Line::from(eaten)];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_level_complete(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Level {} Complete!", state.level),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.score.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            press_to("SPACE", "continue"),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled("Games: ", Style::default().fg(Color::Yellow)),
                Span::styled(metrics.games_played.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            press_to("SPACE", "restart"),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'_> {
        let hint = match phase {
            GamePhase::Playing => vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
            ],
            GamePhase::LevelComplete => vec![
                Span::styled("SPACE", Style::default().fg(Color::Green)),
                Span::raw(" to continue | "),
            ],
            GamePhase::GameOver => vec![
                Span::styled("SPACE", Style::default().fg(Color::Green)),
                Span::raw(" to restart | "),
            ],
        };

        let mut spans = hint;
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

fn press_to(key: &'static str, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled(
            key,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" to {what}"), Style::default().fg(Color::Gray)),
    ])
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Bordered grid area, centered and clamped to `area`
fn grid_area(area: Rect, state: &GameState) -> Rect {
    let width = (state.grid_width as u16).saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = (state.grid_height as u16).saturating_add(2);
    centered(area, width, height)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(FoodTable::default())
    }
}
