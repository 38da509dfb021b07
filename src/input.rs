use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Canonical movement directions for snake input.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns the `(dx, dy)` offset of one step; y grows downwards.
    #[must_use]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// High-level input events consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameInput {
    Direction(Direction),
    Pause,
    Quit,
    Confirm,
}

/// Returns whether a direction change is legal (no immediate 180° turns).
#[must_use]
pub fn direction_change_is_valid(current: Direction, next: Direction) -> bool {
    next != current.opposite()
}

/// Maps a movement key to a direction, if it is one.
#[must_use]
pub fn direction_for_code(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w' | 'W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Some(Direction::Right),
        _ => None,
    }
}

/// Resolves the direction that results from pressing `code` while moving in
/// `current`. Unknown keys and reversals leave the direction unchanged.
#[must_use]
pub fn direction_for_key(current: Direction, code: KeyCode) -> Direction {
    match direction_for_code(code) {
        Some(next) if direction_change_is_valid(current, next) => next,
        _ => current,
    }
}

/// Translates one terminal key event into a game input while the snake is
/// heading `current`.
///
/// Movement keys resolve through [`direction_for_key`]; a reversing key yields
/// `None` so it cannot overwrite a turn already queued for the next tick.
#[must_use]
pub fn key_to_input(key: KeyEvent, current: Direction) -> Option<GameInput> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(GameInput::Quit);
    }

    if let Some(pressed) = direction_for_code(key.code) {
        let resolved = direction_for_key(current, key.code);
        return (resolved == pressed).then_some(GameInput::Direction(resolved));
    }

    match key.code {
        KeyCode::Char('p' | 'P') => Some(GameInput::Pause),
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameInput::Confirm),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(GameInput::Quit),
        _ => None,
    }
}

/// Polls crossterm for keyboard input.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for the next recognised input, resolving
    /// movement keys against the `current` heading.
    ///
    /// Non-key events and unmapped keys yield `Ok(None)`.
    pub fn poll_input(
        &mut self,
        timeout: Duration,
        current: Direction,
    ) -> io::Result<Option<GameInput>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        match event::read()? {
            Event::Key(key) => Ok(key_to_input(key, current)),
            _ => Ok(None),
        }
    }
}
