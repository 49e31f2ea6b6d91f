use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use chrono::{Datelike, Local};
use connections_core::PuzzleDate;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::game::{Game, Overlay, Screen};
use crate::net::{server_url, PuzzleRequest};
use crate::storage::FileStorage;
use crate::ui;

pub fn run() -> anyhow::Result<()> {
    init_logging()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async_run())
}

/// The terminal is in raw mode, so logs only go to `CONNECTIONS_LOG` if set.
fn init_logging() -> anyhow::Result<()> {
    let Ok(path) = std::env::var("CONNECTIONS_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("opening log file {}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn today() -> PuzzleDate {
    let now = Local::now().date_naive();
    PuzzleDate::new(now.year(), now.month(), now.day())
}

async fn async_run() -> anyhow::Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let today = today();
    let storage = FileStorage::default_location();
    let mut game = Game::new(storage, today);
    let mut request = PuzzleRequest::spawn(server_url(), today);
    info!(date = ?today, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut game, &mut request).await;
    request.cancel();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game<FileStorage>,
    request: &mut PuzzleRequest,
) -> anyhow::Result<()> {
    let mut event_stream = EventStream::new();
    let tick_rate = Duration::from_millis(250);

    loop {
        game.tick(std::time::Instant::now());
        terminal.draw(|f| ui::draw(f, game))?;

        let deadline = game
            .timers
            .next_deadline()
            .map(tokio::time::Instant::from_std);

        tokio::select! {
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_key(game, key) {
                        return Ok(());
                    }
                }
            }
            Some(result) = request.recv(), if request.is_pending() => {
                game.on_feed(result);
            }
            _ = sleep_until(deadline) => {}
            _ = tokio::time::sleep(tick_rate) => {}
        }
    }
}

async fn sleep_until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

/// Returns true when the app should exit.
fn handle_key(game: &mut Game<FileStorage>, key: KeyEvent) -> bool {
    match game.screen() {
        Screen::Loading => matches!(key.code, KeyCode::Char('q') | KeyCode::Esc),
        Screen::Menu => handle_menu_key(game, key),
        Screen::Playing => handle_playing_key(game, key),
    }
}

fn handle_menu_key(game: &mut Game<FileStorage>, key: KeyEvent) -> bool {
    if game.overlay == Overlay::HowToPlay {
        game.overlay = Overlay::None;
        return false;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => game.start(),
        KeyCode::Char('?') => game.toggle_overlay(Overlay::HowToPlay),
        KeyCode::Char('q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_playing_key(game: &mut Game<FileStorage>, key: KeyEvent) -> bool {
    match game.overlay {
        Overlay::QuitConfirm => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return true,
                _ => game.overlay = Overlay::None,
            }
            return false;
        }
        Overlay::Hints => {
            match key.code {
                KeyCode::Char(c @ '1'..='4') => game.reveal_hint(c as usize - '1' as usize),
                _ => game.overlay = Overlay::None,
            }
            return false;
        }
        Overlay::HowToPlay => {
            game.overlay = Overlay::None;
            return false;
        }
        Overlay::None => {}
    }

    let now = std::time::Instant::now();
    match key.code {
        KeyCode::Up => game.move_cursor(-1, 0),
        KeyCode::Down => game.move_cursor(1, 0),
        KeyCode::Left => game.move_cursor(0, -1),
        KeyCode::Right => game.move_cursor(0, 1),
        KeyCode::Char(' ') => game.toggle_at_cursor(),
        KeyCode::Enter => game.submit(now),
        KeyCode::Char('s') | KeyCode::Char('S') => game.shuffle(now),
        KeyCode::Char('d') | KeyCode::Char('D') => game.deselect_all(),
        KeyCode::Char('h') | KeyCode::Char('H') => game.toggle_overlay(Overlay::Hints),
        KeyCode::Char('?') => game.toggle_overlay(Overlay::HowToPlay),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            game.overlay = Overlay::QuitConfirm
        }
        _ => {}
    }
    false
}
