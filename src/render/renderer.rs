use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Phase, Position, Snapshot};
use crate::metrics::{RunMetrics, SaveStatus};

/// Hue step per tick and per body segment, in degrees
const HUE_STEP: u16 = 2;
const SEGMENT_HUE_STEP: u16 = 10;

/// Draws snapshots of a run
///
/// The only state kept here is the rainbow hue, which advances once per
/// tick and never feeds back into the simulation.
pub struct Renderer {
    hue: u16,
}

impl Renderer {
    pub fn new() -> Self {
        Self { hue: 0 }
    }

    /// Shift the snake's rainbow along by one tick
    pub fn on_tick(&mut self) {
        self.hue = (self.hue + HUE_STEP) % 360;
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &RunMetrics, player: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics, player), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.phase {
            Phase::Running => frame.render_widget(self.render_grid(snapshot), game_area),
            Phase::GameOver(_) => {
                frame.render_widget(self.render_game_over(snapshot, metrics), game_area)
            }
        }

        frame.render_widget(self.render_controls(metrics), chunks[2]);
    }

    fn segment_color(&self, index: usize) -> Color {
        let offset = (index % 36) as u16 * SEGMENT_HUE_STEP;
        hue_to_color((self.hue + offset) % 360)
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let food = &snapshot.food;
        let food_color = Color::Rgb(food.color.r, food.color.g, food.color.b);
        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if let Some(index) = snapshot.snake.iter().position(|s| *s == pos) {
                    let glyph = if index == 0 { "■ " } else { "□ " };
                    Span::styled(
                        glyph,
                        Style::default()
                            .fg(self.segment_color(index))
                            .add_modifier(Modifier::BOLD),
                    )
                } else if pos == food.position {
                    Span::styled(
                        food_glyph(food.weight),
                        Style::default().fg(food_color).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot, metrics: &RunMetrics, player: &str) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Player: ", label),
            Span::styled(player.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Score: ", label),
            Span::styled(
                snapshot.state.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.state.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(snapshot.state.speed.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        if let Some(previous) = snapshot.previous {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Last run: ", label));
            spans.push(Span::styled(
                format!("{} (lvl {})", previous.score(), previous.level()),
                Style::default().fg(Color::Gray),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot, metrics: &RunMetrics) -> Paragraph<'_> {
        let reason = match snapshot.phase {
            Phase::GameOver(reason) => reason.describe(),
            Phase::Running => "",
        };

        let save_line = match &metrics.last_save {
            Some(status @ SaveStatus::Saved(_)) => {
                Span::styled(status.describe(), Style::default().fg(Color::Green))
            }
            Some(status @ SaveStatus::Failed(_)) => {
                Span::styled(status.describe(), Style::default().fg(Color::Red))
            }
            None => Span::styled("not saved", Style::default().fg(Color::Gray)),
        };

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                format!("You {}", reason),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.state.level.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(save_line),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, metrics: &RunMetrics) -> Paragraph<'_> {
        let mut spans = vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Green)),
            Span::raw(" to save | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ];

        if let Some(status) = &metrics.last_save {
            let color = match status {
                SaveStatus::Saved(_) => Color::Green,
                SaveStatus::Failed(_) => Color::Red,
            };
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(status.describe(), Style::default().fg(color)));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Heavier food gets a bigger glyph
fn food_glyph(weight: u32) -> &'static str {
    match weight {
        0 | 1 => "o ",
        2 => "O ",
        _ => "@ ",
    }
}

/// Fully saturated, full value HSV color for `hue` in degrees
fn hue_to_color(hue: u16) -> Color {
    let h = f32::from(hue % 360) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u8 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let scale = |c: f32| (c * 255.0).round() as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}
