use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use classic_snake::config::{ConfigOverrides, GameConfig};
use classic_snake::game::GameState;
use classic_snake::input::{GameInput, InputHandler};
use classic_snake::logging::init_file_logging;
use classic_snake::renderer;
use classic_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Classic snake in the terminal")]
struct Cli {
    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Milliseconds between simulation ticks.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Seed for fruit placement, for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append tracing output to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_file_logging(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
    }

    let overrides = ConfigOverrides {
        width: cli.width,
        height: cli.height,
        tick_ms: cli.tick_ms,
    };
    let config = GameConfig::load(cli.config.as_deref(), overrides)
        .context("failed to load configuration")?;
    info!(?config, seed = ?cli.seed, "starting session");

    let state = match cli.seed {
        Some(seed) => GameState::new_with_seed(&config, seed),
        None => GameState::new(&config),
    };

    install_panic_hook();
    let mut session = TerminalSession::enter().context("failed to set up terminal")?;
    run(&mut session, state, &config)
}

/// Drives the session: draw every frame, drain input until the next tick is
/// due, then advance the simulation once.
fn run(session: &mut TerminalSession, mut state: GameState, config: &GameConfig) -> Result<()> {
    let mut input = InputHandler::new();
    let mut next_tick = Instant::now() + config.tick_interval;

    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &state))
            .context("failed to draw frame")?;

        let timeout = next_tick.saturating_duration_since(Instant::now());
        let game_input = input
            .poll_input(timeout, state.direction())
            .context("failed to read input")?;
        if let Some(game_input) = game_input {
            if game_input == GameInput::Quit {
                info!(len = state.snake.len(), "quit requested");
                return Ok(());
            }

            state.apply_input(game_input);
        }

        let now = Instant::now();
        if now >= next_tick {
            state.tick();
            next_tick = now + config.tick_interval;
        }
    }
}
