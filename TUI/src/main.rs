use std::env;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Position, Terminal};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use chat_actions::app::App;
use chat_actions::cell::CellError;
use chat_actions::clock::SystemClock;
use chat_actions::config::{load_overrides, Config, ConfigError};
use chat_actions::ui::draw;
use chat_actions::ui_state::Focus;

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("message cell misconfigured: {0}")]
    Cell(#[from] CellError),
}

struct Args {
    overrides: Option<PathBuf>,
    log: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
    };
    Args {
        overrides: value_of("--overrides"),
        log: value_of("--log"),
    }
}

// stdout belongs to the terminal UI, so logs only go to a file
fn init_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), RunError> {
    let args = parse_args();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }
    let overrides = args.overrides.as_deref().map(load_overrides).transpose()?;
    tracing::info!(overrides = overrides.as_ref().map_or(0, |o| o.len()), "starting chat actions");

    let mut app = App::new(Config::default(), overrides, Rc::new(SystemClock));
    app.push_message(chat_actions::message::Role::System, "Offline demo: replies are canned.")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<(), RunError> {
    let tick = Duration::from_millis(app.config.tick_rate_ms);
    loop {
        app.tick()?;

        terminal.draw(|frame| draw(frame, app))?;

        if !event::poll(tick)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Esc => {
                    if app.ui.focus != Focus::Input {
                        app.leave_focus();
                    } else if app.ui.input.is_empty() {
                        return Ok(());
                    } else {
                        app.ui.input.clear();
                    }
                }
                KeyCode::Tab => app.focus_next_strip(),
                KeyCode::Left => app.move_focus(-1),
                KeyCode::Right => app.move_focus(1),
                KeyCode::Up => app.scroll_up(),
                KeyCode::Down => app.scroll_down(),
                KeyCode::Enter => match app.ui.focus {
                    Focus::Actions { .. } => app.activate_focused()?,
                    Focus::Input => app.submit_message()?,
                },
                KeyCode::Backspace => {
                    app.ui.input.pop();
                }
                KeyCode::Char(c) => {
                    app.leave_focus();
                    app.ui.input.push(c);
                }
                _ => {}
            },
            Event::Paste(text) => {
                // Single-line input
                let filtered: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                app.ui.input.push_str(&filtered);
            }
            Event::Mouse(mouse) => {
                let point = Position {
                    x: mouse.column,
                    y: mouse.row,
                };
                let step = app.config.strip_scroll_step;
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        if !app.click(point)? {
                            app.leave_focus();
                        }
                    }
                    MouseEventKind::ScrollLeft => {
                        app.scroll_strip_at(point, -step);
                    }
                    MouseEventKind::ScrollRight => {
                        app.scroll_strip_at(point, step);
                    }
                    MouseEventKind::ScrollUp => app.scroll_up(),
                    MouseEventKind::ScrollDown => app.scroll_down(),
                    _ => {}
                }
            }
            _ => {}
        }
    }
}
