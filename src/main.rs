//! BLOCKFALL - a falling-block puzzle for the terminal

mod board;
mod game;
mod input;
mod settings;
mod shape;
mod template;
mod ui;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Game, Phase};
use input::InputHandler;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    time::Duration,
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

fn main() -> io::Result<()> {
    // Session id so concurrent runs get separate log files
    let session_id: u32 = rand::random();
    let log_dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&log_dir);
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("blockfall=debug".parse().unwrap()),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "blockfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings);

    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        eprintln!("Warning: Could not save settings: {}", e);
    }

    if let Ok(game) = &result {
        tracing::info!(score = game.score, "session over");
        println!("Thanks for playing BLOCKFALL!");
    }

    result.map(|_| ())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Game> {
    let mut game = Game::new();
    game.set_phase(Phase::InGame);
    let mut input = InputHandler::from_settings(settings);

    loop {
        terminal.draw(|frame| ui::render(frame, &game, settings))?;

        // The poll timeout doubles as the frame pacer: wait at most one
        // frame for input, then update regardless
        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Release => input.key_up(key),
                    _ => {
                        if input.key_down(key) {
                            tracing::info!("quit requested");
                            return Ok(game);
                        }
                    }
                }
            }
        }

        let held = input.snapshot();
        game.update(&held);
    }
}
