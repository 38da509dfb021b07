use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{GameConfig, GridSize};
use crate::fruit::spawn_position;
use crate::input::{Direction, GameInput};
use crate::snake::{Position, Snake};

/// Direction every new or reset snake starts with.
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    /// Initial configuration, waiting for `start`.
    Ready,
    Playing,
    Paused,
    GameOver,
    /// The snake fills the grid; no cell is left for fruit.
    BoardFull,
}

/// Why a game ended in [`GameStatus::GameOver`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
}

/// Result of checking the head after a move.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Alive,
    WallHit,
    SelfHit,
}

impl Collision {
    fn death_reason(self) -> Option<DeathReason> {
        match self {
            Self::Alive => None,
            Self::WallHit => Some(DeathReason::WallCollision),
            Self::SelfHit => Some(DeathReason::SelfCollision),
        }
    }
}

/// What one call to [`GameState::tick`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickEvent {
    /// Not running; nothing changed.
    Idle,
    Moved,
    AteFruit,
    GameOver(DeathReason),
    BoardFull,
}

impl TickEvent {
    /// Returns true for events that end the running state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver(_) | Self::BoardFull)
    }
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    /// `None` before the first `start` and once the board is full.
    pub fruit: Option<Position>,
    pub status: GameStatus,
    pub death_reason: Option<DeathReason>,
    pub tick_count: u64,
    bounds: GridSize,
    origin: Position,
    rng: StdRng,
}

impl GameState {
    /// Creates a state in the initial configuration seeded from OS entropy.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible sessions.
    #[must_use]
    pub fn new_with_seed(config: &GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Self {
        Self {
            snake: Snake::new(config.origin, INITIAL_DIRECTION),
            fruit: None,
            status: GameStatus::Ready,
            death_reason: None,
            tick_count: 0,
            bounds: config.grid,
            origin: config.origin,
            rng,
        }
    }

    /// Places the first fruit and starts play.
    ///
    /// Only acts in [`GameStatus::Ready`]; returns whether play started.
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::Ready {
            return false;
        }

        let Some(fruit) = spawn_position(&mut self.rng, self.bounds, &self.snake) else {
            // A 1x1 grid: the snake already covers the board.
            self.fruit = None;
            self.status = GameStatus::BoardFull;
            info!("board full on start");
            return false;
        };

        self.fruit = Some(fruit);
        self.status = GameStatus::Playing;
        debug!(x = fruit.x, y = fruit.y, "game started");
        true
    }

    /// Requests a turn for the next tick. Ignored unless playing or when
    /// `direction` reverses the current heading.
    pub fn set_direction(&mut self, direction: Direction) {
        if !self.is_running() {
            return;
        }

        if !self.snake.buffer_direction(direction) {
            debug!(?direction, "rejected reversing turn");
        }
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickEvent {
        if !self.is_running() {
            return TickEvent::Idle;
        }

        self.tick_count += 1;
        let next_head = self.snake.next_head_position();
        let ate_fruit = self.fruit == Some(next_head);

        self.snake.move_forward(ate_fruit);

        if ate_fruit {
            self.fruit = spawn_position(&mut self.rng, self.bounds, &self.snake);
            let Some(fruit) = self.fruit else {
                self.status = GameStatus::BoardFull;
                info!(len = self.snake.len(), ticks = self.tick_count, "board full");
                return TickEvent::BoardFull;
            };
            debug!(x = fruit.x, y = fruit.y, len = self.snake.len(), "fruit eaten");
        }

        if let Some(reason) = self.check_collision().death_reason() {
            self.status = GameStatus::GameOver;
            self.death_reason = Some(reason);
            info!(?reason, len = self.snake.len(), ticks = self.tick_count, "game over");
            return TickEvent::GameOver(reason);
        }

        if ate_fruit {
            TickEvent::AteFruit
        } else {
            TickEvent::Moved
        }
    }

    /// Classifies the current head position against walls and the body.
    ///
    /// Walls are checked first. The body check covers every non-head segment
    /// of the already-moved snake, so the cell the tail vacated this tick is free.
    #[must_use]
    pub fn check_collision(&self) -> Collision {
        if !self.snake.head().is_within_bounds(self.bounds) {
            return Collision::WallHit;
        }

        if self.snake.head_overlaps_body() {
            return Collision::SelfHit;
        }

        Collision::Alive
    }

    /// Restores the initial configuration: one segment at the origin,
    /// initial direction, no fruit, not running.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.origin, INITIAL_DIRECTION);
        self.fruit = None;
        self.status = GameStatus::Ready;
        self.death_reason = None;
        self.tick_count = 0;
        debug!("game reset");
    }

    /// Switches between playing and paused; other states are unaffected.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Playing => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Playing,
            other => other,
        };
    }

    /// Applies one external input event.
    ///
    /// `Confirm` starts from the initial configuration and restarts after a
    /// terminal state. `Quit` is left to the caller.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Direction(direction) => self.set_direction(direction),
            GameInput::Pause => self.toggle_pause(),
            GameInput::Confirm => {
                if self.is_finished() {
                    self.reset();
                }
                self.start();
            }
            GameInput::Quit => {}
        }
    }

    /// Returns true while ticks advance the snake.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Returns true once the game reached a terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::GameOver | GameStatus::BoardFull)
    }

    /// Returns the direction the snake moved on the last tick.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.snake.direction()
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::config::{GameConfig, GridSize};
    use crate::input::{Direction, GameInput};
    use crate::snake::{Position, Snake};

    use super::{Collision, DeathReason, GameState, GameStatus, TickEvent, INITIAL_DIRECTION};

    fn config(width: u16, height: u16) -> GameConfig {
        let grid = GridSize { width, height };
        GameConfig {
            grid,
            origin: grid.center(),
            ..GameConfig::default()
        }
    }

    fn playing_state(width: u16, height: u16, seed: u64) -> GameState {
        let mut state = GameState::new_with_seed(&config(width, height), seed);
        assert!(state.start());
        state
    }

    #[test]
    fn new_state_waits_for_start() {
        let state = GameState::new_with_seed(&GameConfig::default(), 1);

        assert_eq!(state.status, GameStatus::Ready);
        assert!(!state.is_running());
        assert_eq!(state.fruit, None);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), Position { x: 10, y: 10 });
        assert_eq!(state.direction(), INITIAL_DIRECTION);
    }

    #[test]
    fn start_places_fruit_off_the_snake() {
        let mut state = GameState::new_with_seed(&GameConfig::default(), 2);

        assert!(state.start());

        let fruit = state.fruit.expect("start places a fruit");
        assert!(state.is_running());
        assert!(!state.snake.occupies(fruit));
        assert!(fruit.is_within_bounds(state.bounds()));
    }

    #[test]
    fn start_is_ignored_once_running() {
        let mut state = playing_state(10, 10, 3);
        let fruit = state.fruit;

        assert!(!state.start());
        assert_eq!(state.fruit, fruit);
    }

    #[test]
    fn tick_is_idle_before_start() {
        let mut state = GameState::new_with_seed(&GameConfig::default(), 4);

        assert_eq!(state.tick(), TickEvent::Idle);
        assert_eq!(state.snake.head(), Position { x: 10, y: 10 });
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn snake_grows_after_eating_fruit() {
        let mut state = playing_state(10, 10, 5);
        state.snake = Snake::new(Position { x: 5, y: 5 }, Direction::Right);
        state.fruit = Some(Position { x: 6, y: 5 });

        assert_eq!(state.tick(), TickEvent::AteFruit);

        let segments: Vec<Position> = state.snake.segments().copied().collect();
        assert_eq!(segments, vec![Position { x: 6, y: 5 }, Position { x: 5, y: 5 }]);
        let fruit = state.fruit.expect("a new fruit is placed");
        assert!(!state.snake.occupies(fruit));
    }

    #[test]
    fn moving_without_fruit_keeps_length() {
        let mut state = playing_state(10, 10, 6);
        state.snake = Snake::from_segments(
            vec![Position { x: 3, y: 3 }, Position { x: 2, y: 3 }],
            Direction::Right,
        );
        state.fruit = Some(Position { x: 0, y: 9 });

        assert_eq!(state.tick(), TickEvent::Moved);

        let segments: Vec<Position> = state.snake.segments().copied().collect();
        assert_eq!(segments, vec![Position { x: 4, y: 3 }, Position { x: 3, y: 3 }]);
    }

    #[test]
    fn snake_collision_with_wall_sets_game_over() {
        let mut state = playing_state(20, 20, 7);
        state.snake = Snake::new(Position { x: 0, y: 5 }, Direction::Left);
        state.fruit = Some(Position { x: 10, y: 10 });

        assert_eq!(state.tick(), TickEvent::GameOver(DeathReason::WallCollision));
        assert_eq!(state.check_collision(), Collision::WallHit);
        assert_eq!(state.status, GameStatus::GameOver);
        assert!(!state.is_running());
        assert_eq!(state.death_reason, Some(DeathReason::WallCollision));
    }

    #[test]
    fn snake_collision_with_self_sets_game_over() {
        let mut state = playing_state(20, 20, 8);
        state.snake = Snake::from_segments(
            vec![
                Position { x: 5, y: 5 },
                Position { x: 5, y: 6 },
                Position { x: 5, y: 7 },
                Position { x: 6, y: 7 },
                Position { x: 6, y: 6 },
                Position { x: 6, y: 5 },
            ],
            Direction::Down,
        );
        state.fruit = Some(Position { x: 0, y: 0 });

        assert_eq!(state.tick(), TickEvent::GameOver(DeathReason::SelfCollision));
        assert_eq!(state.check_collision(), Collision::SelfHit);
        assert!(!state.is_running());
    }

    #[test]
    fn chasing_the_tail_is_not_a_collision() {
        let mut state = playing_state(10, 10, 9);
        // A 2x2 loop: the head moves into the cell the tail leaves.
        state.snake = Snake::from_segments(
            vec![
                Position { x: 1, y: 1 },
                Position { x: 2, y: 1 },
                Position { x: 2, y: 2 },
                Position { x: 1, y: 2 },
            ],
            Direction::Down,
        );
        state.fruit = Some(Position { x: 8, y: 8 });

        assert_eq!(state.tick(), TickEvent::Moved);
        assert_eq!(state.snake.head(), Position { x: 1, y: 2 });
        assert_eq!(state.check_collision(), Collision::Alive);
    }

    #[test]
    fn reversal_has_no_effect() {
        let mut state = playing_state(10, 10, 10);
        state.snake = Snake::new(Position { x: 4, y: 4 }, Direction::Right);
        state.fruit = Some(Position { x: 0, y: 0 });

        state.set_direction(Direction::Left);

        assert_eq!(state.snake.pending_direction(), Direction::Right);
        state.tick();
        assert_eq!(state.snake.head(), Position { x: 5, y: 4 });
        assert_eq!(state.direction(), Direction::Right);
    }

    #[test]
    fn set_direction_is_ignored_when_not_running() {
        let mut state = GameState::new_with_seed(&GameConfig::default(), 11);

        state.set_direction(Direction::Up);

        assert_eq!(state.snake.pending_direction(), INITIAL_DIRECTION);
    }

    #[test]
    fn turn_applies_on_next_tick() {
        let mut state = playing_state(10, 10, 12);
        state.snake = Snake::new(Position { x: 4, y: 4 }, Direction::Right);
        state.fruit = Some(Position { x: 0, y: 0 });

        state.set_direction(Direction::Up);
        assert_eq!(state.direction(), Direction::Right);

        state.tick();

        assert_eq!(state.snake.head(), Position { x: 4, y: 3 });
        assert_eq!(state.direction(), Direction::Up);
    }

    #[test]
    fn filling_the_board_ends_the_game() {
        let mut state = playing_state(3, 1, 13);
        state.snake = Snake::from_segments(
            vec![Position { x: 1, y: 0 }, Position { x: 0, y: 0 }],
            Direction::Right,
        );
        state.fruit = Some(Position { x: 2, y: 0 });

        assert_eq!(state.tick(), TickEvent::BoardFull);
        assert_eq!(state.status, GameStatus::BoardFull);
        assert_eq!(state.fruit, None);
        assert!(!state.is_running());
        assert_eq!(state.tick(), TickEvent::Idle);
    }

    #[test]
    fn single_cell_grid_is_full_on_start() {
        let mut state = GameState::new_with_seed(&config(1, 1), 14);

        assert!(!state.start());
        assert_eq!(state.status, GameStatus::BoardFull);
    }

    #[test]
    fn reset_restores_initial_configuration() {
        let mut state = playing_state(20, 20, 15);
        state.set_direction(Direction::Down);
        for _ in 0..30 {
            state.tick();
        }

        state.reset();

        let segments: Vec<Position> = state.snake.segments().copied().collect();
        assert_eq!(segments, vec![Position { x: 10, y: 10 }]);
        assert_eq!(state.status, GameStatus::Ready);
        assert!(!state.is_running());
        assert_eq!(state.direction(), INITIAL_DIRECTION);
        assert_eq!(state.death_reason, None);
        assert_eq!(state.tick_count, 0);
    }

    #[test]
    fn pause_freezes_the_snake() {
        let mut state = playing_state(10, 10, 16);
        let head = state.snake.head();

        state.apply_input(GameInput::Pause);
        assert_eq!(state.tick(), TickEvent::Idle);
        assert_eq!(state.snake.head(), head);

        state.apply_input(GameInput::Pause);
        assert!(state.is_running());
    }

    #[test]
    fn confirm_restarts_after_game_over() {
        let mut state = playing_state(20, 20, 17);
        state.snake = Snake::new(Position { x: 19, y: 0 }, Direction::Right);
        state.fruit = Some(Position { x: 0, y: 0 });
        assert!(state.tick().is_terminal());

        state.apply_input(GameInput::Confirm);

        assert!(state.is_running());
        assert_eq!(state.snake.head(), state.origin());
        assert!(state.fruit.is_some());
    }

    #[test]
    fn finished_only_after_terminal_events() {
        let mut state = playing_state(10, 10, 18);
        assert!(!state.is_finished());

        state.snake = Snake::new(Position { x: 0, y: 3 }, Direction::Left);
        state.fruit = Some(Position { x: 9, y: 9 });
        state.tick();
        assert!(state.is_finished());

        state.reset();
        assert!(!state.is_finished());
    }

    #[test]
    fn confirm_is_ignored_while_playing() {
        let mut state = playing_state(10, 10, 19);
        state.tick();
        let head = state.snake.head();

        state.apply_input(GameInput::Confirm);

        assert!(state.is_running());
        assert_eq!(state.snake.head(), head);
        assert_eq!(state.tick_count, 1);
    }

    proptest! {
        #[test]
        fn prop_length_changes_only_when_fruit_is_eaten(
            seed in any::<u64>(),
            turns in proptest::collection::vec(0u8..4, 1..200),
        ) {
            let mut state = playing_state(12, 12, seed);

            for turn in turns {
                let direction = match turn {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                state.set_direction(direction);

                let len_before = state.snake.len();
                let fruit_before = state.fruit;
                let next_head = state.snake.next_head_position();

                let event = state.tick();

                if fruit_before == Some(next_head) {
                    prop_assert_eq!(state.snake.len(), len_before + 1);
                } else {
                    prop_assert_eq!(state.snake.len(), len_before);
                }
                if let Some(fruit) = state.fruit {
                    prop_assert!(!state.snake.occupies(fruit));
                }
                if event.is_terminal() {
                    prop_assert!(!state.is_running());
                    break;
                }
            }
        }
    }
}
