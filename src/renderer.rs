use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

use crate::config::GridSize;
use crate::game::{GameState, GameStatus};
use crate::input::Direction;
use crate::snake::Position;
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Terminal columns used per grid cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;

const GLYPH_EMPTY: &str = " ·";
const GLYPH_FRUIT: &str = "●";
const GLYPH_SNAKE_BODY: &str = "██";
const GLYPH_SNAKE_HEAD_UP: &str = "▲▲";
const GLYPH_SNAKE_HEAD_DOWN: &str = "▼▼";
const GLYPH_SNAKE_HEAD_LEFT: &str = "◀█";
const GLYPH_SNAKE_HEAD_RIGHT: &str = "█▶";

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, state: &GameState) {
    let area = frame.area();
    let bounds = state.bounds();

    let [board_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let Some(play_area) = board_rect(board_area, bounds) else {
        frame.render_widget(
            Paragraph::new(Line::from(format!(
                "Terminal too small for a {}x{} grid",
                bounds.width, bounds.height
            )))
            .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let block = Block::bordered()
        .title(" snake ")
        .border_style(Style::new().fg(Color::Gray));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    let buffer = frame.buffer_mut();
    render_grid(buffer, inner, bounds);
    if let Some(fruit) = state.fruit {
        render_fruit(buffer, inner, bounds, fruit);
    }
    render_snake(buffer, inner, state);

    frame.render_widget(
        Paragraph::new(status_line(state))
            .alignment(Alignment::Center)
            .style(Style::new().fg(Color::DarkGray)),
        status_area,
    );

    match state.status {
        GameStatus::Ready => render_start_menu(frame, play_area),
        GameStatus::Paused => render_pause_menu(frame, play_area),
        GameStatus::GameOver | GameStatus::BoardFull => render_game_over_menu(
            frame,
            play_area,
            state.snake.len(),
            state.status,
            state.death_reason,
        ),
        GameStatus::Playing => {}
    }
}

/// Returns the bordered board rectangle centered in `area`, or `None` when
/// the grid does not fit.
fn board_rect(area: Rect, bounds: GridSize) -> Option<Rect> {
    let width = bounds.width.checked_mul(CELL_WIDTH)?.checked_add(2)?;
    let height = bounds.height.checked_add(2)?;
    if width > area.width || height > area.height {
        return None;
    }

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    Some(board)
}

fn render_grid(buffer: &mut Buffer, inner: Rect, bounds: GridSize) {
    let style = Style::new().fg(Color::DarkGray);
    for y in 0..i32::from(bounds.height) {
        for x in 0..i32::from(bounds.width) {
            if let Some((column, row)) = logical_to_terminal(inner, bounds, Position { x, y }) {
                buffer.set_string(column, row, GLYPH_EMPTY, style);
            }
        }
    }
}

fn render_fruit(buffer: &mut Buffer, inner: Rect, bounds: GridSize, fruit: Position) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, fruit) else {
        return;
    };

    buffer.set_string(x, y, "  ", Style::new());
    buffer.set_string(x, y, GLYPH_FRUIT, Style::new().fg(Color::Red));
}

fn render_snake(buffer: &mut Buffer, inner: Rect, state: &GameState) {
    let bounds = state.bounds();
    let head = state.snake.head();
    let head_style = Style::new()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD);
    let body_style = Style::new().fg(Color::Green);

    // Tail first so the head is drawn last and stays visible on overlap.
    let segments: Vec<Position> = state.snake.segments().copied().collect();
    for segment in segments.iter().skip(1).rev() {
        if let Some((x, y)) = logical_to_terminal(inner, bounds, *segment) {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, body_style);
        }
    }

    if let Some((x, y)) = logical_to_terminal(inner, bounds, head) {
        buffer.set_string(x, y, head_glyph(state.direction()), head_style);
    }
}

fn head_glyph(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => GLYPH_SNAKE_HEAD_UP,
        Direction::Down => GLYPH_SNAKE_HEAD_DOWN,
        Direction::Left => GLYPH_SNAKE_HEAD_LEFT,
        Direction::Right => GLYPH_SNAKE_HEAD_RIGHT,
    }
}

fn status_line(state: &GameState) -> Line<'static> {
    let bounds = state.bounds();
    Line::from(format!(
        "Length {}  |  Grid {}x{}  |  arrows/WASD move  [P] pause  [Q] quit",
        state.snake.len(),
        bounds.width,
        bounds.height
    ))
}

/// Maps a grid cell to the top-left terminal column and row of its glyph.
fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
