use rand::Rng;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{App, MenuItem, NAME_INPUT_LIMIT, Screen};
use crate::game::{Difficulty, EndCause, GameEngine, Point};
use crate::leaderboard::{MAX_NAME_LEN, ScoreEntry};
use crate::metrics::GameMetrics;

/// Terminal columns used per grid cell
const CELL_WIDTH: u16 = 2;
/// Width of the panel to the right of the board
const INFO_WIDTH: u16 = 30;
/// Entries shown next to the board while playing
const SIDEBAR_TOP: usize = 3;
/// Entries shown on the game over screen
const GAME_OVER_TOP: usize = 5;

const BANNER: [&str; 6] = [
    r"  ____  _   _    _    _  _______   _____ _____ ____  ____      _    ",
    r" / ___|| \ | |  / \  | |/ / ____| |_   _| ____|  _ \|  _ \    / \   ",
    r" \___ \|  \| | / _ \ | ' /|  _|     | | |  _| | |_) | |_) |  / _ \  ",
    r"  ___) | |\  |/ ___ \| . \| |___    | | | |___|  _ <|  _ <  / ___ \ ",
    r" |____/|_| \_/_/   \_\_|\_\_____|   |_| |_____|_| \_\_| \_\/_/   \_\",
    r"",
];

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<R: Rng>(&self, frame: &mut Frame, app: &App<R>) {
        let area = frame.area();
        match app.screen() {
            Screen::Menu { selected } => {
                self.render_menu(frame, area, *selected, app.engine().difficulty())
            }
            Screen::Difficulty { selected } => self.render_difficulty(frame, area, *selected),
            Screen::Leaderboard => self.render_leaderboard(frame, area, app.leaderboard().all()),
            Screen::Playing => self.render_game(frame, area, app),
            Screen::NameEntry { input } => {
                self.render_game(frame, area, app);
                self.render_name_prompt(frame, area, app.engine().score(), input);
            }
            Screen::GameOver { name, rank } => self.render_game_over(frame, area, app, name, *rank),
        }
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect, selected: MenuItem, difficulty: Difficulty) {
        let mut lines: Vec<Line> = BANNER
            .iter()
            .map(|row| Line::styled(*row, Style::default().fg(Color::Cyan)))
            .collect();

        lines.push(Line::from(Span::styled(
            "Use Up/Down to navigate. Enter to select. Q to quit.",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Current Difficulty: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                difficulty.label(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));

        for item in MenuItem::ALL {
            let style = if item == selected {
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(format!("  {}  ", item.label()), style)));
        }

        let popup = centered_rect(76, lines.len() as u16 + 2, area);
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(titled_block(" Snake Terra ", Color::Cyan)),
            popup,
        );
    }

    fn render_difficulty(&self, frame: &mut Frame, area: Rect, selected: Difficulty) {
        let mut options = Vec::new();
        for difficulty in Difficulty::ALL {
            let style = if difficulty == selected {
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            options.push(Span::styled(format!("  {}  ", difficulty.label()), style));
            options.push(Span::raw("     "));
        }
        options.pop();

        let text = vec![
            Line::from(""),
            Line::from(options),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} ms per step at score 0", selected.base_interval_ms()),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Left/Right to change, Enter to accept, Esc to cancel",
                Style::default().fg(Color::Gray),
            )),
        ];

        let popup = centered_rect(60, text.len() as u16 + 2, area);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(titled_block(" Change Difficulty ", Color::Yellow)),
            popup,
        );
    }

    fn render_leaderboard(&self, frame: &mut Frame, area: Rect, entries: &[ScoreEntry]) {
        let popup = centered_rect(60, area.height.saturating_sub(4).min(24), area);
        // border, title gap, footer gap and footer
        let visible = popup.height.saturating_sub(5) as usize;

        let mut lines = vec![Line::from("")];
        if entries.is_empty() {
            lines.push(Line::from(Span::styled(
                "No scores yet.",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.extend(
                entries
                    .iter()
                    .take(visible)
                    .enumerate()
                    .map(|(i, entry)| ranked_line(i + 1, entry)),
            );
        }
        while lines.len() < popup.height.saturating_sub(3) as usize {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "Press any key to go back.",
            Style::default().fg(Color::Gray),
        )));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(titled_block(" Leaderboards ", Color::Yellow)),
            popup,
        );
    }

    fn render_game<R: Rng>(&self, frame: &mut Frame, area: Rect, app: &App<R>) {
        let engine = app.engine();
        let (board_width, board_height) = board_size(engine.rows(), engine.cols());
        let needed_width = board_width.saturating_add(INFO_WIDTH);

        if area.width < needed_width || area.height < board_height {
            self.render_too_small(frame, area, needed_width, board_height);
            return;
        }

        let outer = centered_rect(needed_width, board_height, area);
        let [board_area, info_area] =
            Layout::horizontal([Constraint::Length(board_width), Constraint::Length(INFO_WIDTH)])
                .areas(outer);

        frame.render_widget(self.render_grid(engine), board_area);
        frame.render_widget(
            self.render_info(engine, app.metrics(), app.leaderboard().top(SIDEBAR_TOP)),
            info_area,
        );
    }

    fn render_grid<R: Rng>(&self, engine: &GameEngine<R>) -> Paragraph<'_> {
        let snake = engine.snake();
        let head = snake.head();
        let food = engine.food();
        let dead = !engine.is_running();
        let mut lines = Vec::with_capacity(engine.rows());

        for row in 0..engine.rows() {
            let mut spans = Vec::with_capacity(engine.cols());

            for col in 0..engine.cols() {
                let pos = Point::new(row as i32, col as i32);

                let cell = if pos == head {
                    // Snake head - distinct color
                    let color = if dead { Color::Red } else { Color::Cyan };
                    Span::styled("■ ", Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else if snake.occupies(pos) {
                    // Snake body
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if food == Some(pos) {
                    Span::styled(
                        "<>",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    // Empty cell
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if engine.is_paused() {
            " PAUSED - press P to continue "
        } else {
            " Game "
        };

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
    }

    fn render_info<R: Rng>(
        &self,
        engine: &GameEngine<R>,
        metrics: &GameMetrics,
        top: &[ScoreEntry],
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(vec![
                Span::styled("Score: ", label),
                Span::styled(engine.score().to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Difficulty: ", label),
                Span::styled(engine.active_difficulty().label(), value),
            ]),
            Line::from(vec![
                Span::styled("Length: ", label),
                Span::styled(engine.snake().len().to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Time: ", label),
                Span::styled(metrics.format_time(), value),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("Top {}", SIDEBAR_TOP),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ];

        if top.is_empty() {
            text.push(Line::from(Span::styled(
                "No scores yet.",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            text.extend(top.iter().enumerate().map(|(i, entry)| {
                Line::from(format!("{}) {:<12} {:>6}", i + 1, entry.name, entry.score))
            }));
        }

        text.push(Line::from(""));
        text.extend(self.render_controls());

        Paragraph::new(text).block(titled_block(" Info ", Color::White))
    }

    fn render_controls(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move"),
            ]),
            Line::from(vec![
                Span::styled("P", Style::default().fg(Color::Yellow)),
                Span::raw(" pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" end game"),
            ]),
        ]
    }

    fn render_too_small(&self, frame: &mut Frame, area: Rect, width: u16, height: u16) {
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small for the game board.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "Required: at least {} cols x {} rows. Current: {} x {}.",
                width, height, area.width, area.height
            )),
            Line::from("Resize the terminal, or press Q to end the game."),
        ];

        let popup = centered_rect(70, text.len() as u16 + 2, area);
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(titled_block("", Color::Red)),
            popup,
        );
    }

    fn render_name_prompt(&self, frame: &mut Frame, area: Rect, score: u32, input: &str) {
        let text = vec![
            Line::from(vec![
                Span::styled(
                    "Game Over! ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("Your score: {}", score)),
            ]),
            Line::from(format!(
                "Enter your name (letters, digits, _ and -, max {}).",
                MAX_NAME_LEN
            )),
            Line::from("Press Enter to save:"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Yellow)),
                Span::raw(input.to_string()),
                Span::styled(
                    if input.chars().count() < NAME_INPUT_LIMIT { "_" } else { "" },
                    Style::default().add_modifier(Modifier::SLOW_BLINK),
                ),
            ]),
        ];

        let popup = centered_rect(60, text.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).block(titled_block(" Save Score ", Color::Yellow)),
            popup,
        );
    }

    fn render_game_over<R: Rng>(
        &self,
        frame: &mut Frame,
        area: Rect,
        app: &App<R>,
        name: &str,
        rank: Option<usize>,
    ) {
        let engine = app.engine();
        let cause = engine.end_cause().unwrap_or(EndCause::Abandoned);
        let (headline, color) = if cause.is_win() {
            ("YOU WIN", Color::Green)
        } else {
            ("GAME OVER", Color::Red)
        };
        let metrics = app.metrics();

        let mut text = vec![
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(cause.describe(), Style::default().fg(Color::Gray))),
            Line::from(""),
            Line::from(vec![
                Span::styled(format!("Final Score for {}: ", name), Style::default().fg(Color::Yellow)),
                Span::styled(
                    engine.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(match rank {
                Some(rank) => format!("Leaderboard rank: #{}", rank),
                None => "Not in the top scores this time.".to_string(),
            }),
            Line::from(format!(
                "Time {} | Games {} | Session best {}",
                metrics.format_time(),
                metrics.games_played,
                metrics.best_score
            )),
            Line::from(""),
            Line::from(Span::styled("Top Scores:", Style::default().fg(Color::Cyan))),
        ];

        text.extend(
            app.leaderboard()
                .top(GAME_OVER_TOP)
                .iter()
                .enumerate()
                .map(|(i, entry)| ranked_line(i + 1, entry)),
        );

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
            Span::styled(
                "M",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" for menu, ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        let popup = centered_rect(60, text.len() as u16 + 2, area);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            popup,
        );
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Outer size of the bordered board, saturating at `u16::MAX`
fn board_size(rows: usize, cols: usize) -> (u16, u16) {
    let side = |cells: usize, cell_width: u16| {
        u16::try_from(cells)
            .unwrap_or(u16::MAX)
            .saturating_mul(cell_width)
            .saturating_add(2)
    };
    (side(cols, CELL_WIDTH), side(rows, 1))
}

fn titled_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn ranked_line(rank: usize, entry: &ScoreEntry) -> Line<'static> {
    Line::from(format!("{:>2}. {:<16} {:>6}", rank, entry.name, entry.score))
}

/// A `width` x `height` rect centred in `area`, clipped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
