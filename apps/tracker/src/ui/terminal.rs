//! Crossterm front end: owns the terminal, turns key presses into
//! [`InputEvent`]s and keeps the screen in sync with the session.

use std::{
    io::{self, Write},
    time::Duration,
};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use crossterm::{
    cursor::{Hide, MoveTo, MoveToNextLine, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{AppMessage, InputEvent, UiError, UiErrorContext};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{Mode, SessionState, Transition};
use crate::ui::view::{self, ViewOptions};
use shared::error::{ErrorCode, ErrorReport};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const KEY_HELP: &str = "\
Navigation keys:
  ctrl+c q - quit
  up k     - up
  down j   - down
  enter    - select
  esc      - cancel input / leave delete mode
  d        - switch on/off deleting";

/// `q` and `d` are text while the input field is open; ctrl+c always quits.
pub fn map_key(key: KeyEvent, mode: Mode) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(InputEvent::Quit),
            _ => None,
        };
    }

    match (key.code, mode) {
        (KeyCode::Up, _) => Some(InputEvent::Up),
        (KeyCode::Down, _) => Some(InputEvent::Down),
        (KeyCode::Enter, _) => Some(InputEvent::Activate),
        (KeyCode::Esc, _) => Some(InputEvent::Cancel),
        (KeyCode::Backspace, Mode::Adding) => Some(InputEvent::Backspace),
        (KeyCode::Char(c), Mode::Adding) => Some(InputEvent::Char(c)),
        (KeyCode::Char('q'), _) => Some(InputEvent::Quit),
        (KeyCode::Char('k'), _) => Some(InputEvent::Up),
        (KeyCode::Char('j'), _) => Some(InputEvent::Down),
        (KeyCode::Char('d'), _) => Some(InputEvent::ToggleDelete),
        _ => None,
    }
}

/// Runs the session until the user quits. The terminal is restored even
/// when the loop fails.
pub fn run(
    mut state: SessionState,
    cmd_tx: &Sender<BackendCommand>,
    ui_rx: &Receiver<AppMessage>,
    options: &ViewOptions,
) -> anyhow::Result<()> {
    install_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut stdout, &mut state, cmd_tx, ui_rx, options);
    let cleanup = restore_terminal(&mut stdout);

    match (result, cleanup) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(err), _) => Err(err),
        (Ok(()), Err(err)) => Err(err.into()),
    }
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        original_hook(panic_info);
    }));
}

fn restore_terminal(stdout: &mut io::Stdout) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, Show)?;
    Ok(())
}

fn event_loop(
    stdout: &mut io::Stdout,
    state: &mut SessionState,
    cmd_tx: &Sender<BackendCommand>,
    ui_rx: &Receiver<AppMessage>,
    options: &ViewOptions,
) -> anyhow::Result<()> {
    let startup = state.startup_command();
    submit(state, cmd_tx, startup);
    draw(stdout, &view::render(state, options))?;

    let mut backend_alive = true;
    loop {
        let mut dirty = false;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(input) = map_key(key, state.mode()) {
                        match state.handle_input(input) {
                            Transition::Quit => {
                                tracing::info!("user requested quit");
                                return Ok(());
                            }
                            Transition::Continue(Some(cmd)) => submit(state, cmd_tx, cmd),
                            Transition::Continue(None) => {}
                        }
                        dirty = true;
                    }
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
        }

        while backend_alive {
            match ui_rx.try_recv() {
                Ok(message) => {
                    state.fold(message);
                    dirty = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("backend worker disconnected");
                    backend_alive = false;
                    state.fold(AppMessage::Failed(worker_gone()));
                    dirty = true;
                }
            }
        }

        if dirty {
            draw(stdout, &view::render(state, options))?;
        }
    }
}

fn submit(state: &mut SessionState, cmd_tx: &Sender<BackendCommand>, cmd: BackendCommand) {
    if let Err(err) = dispatch_backend_command(cmd_tx, cmd) {
        state.fold(AppMessage::Failed(err));
    }
}

fn worker_gone() -> UiError {
    UiError::new(
        UiErrorContext::BackendStartup,
        ErrorReport::new(ErrorCode::Io, "Background worker stopped; restart the tracker"),
    )
}

fn draw(stdout: &mut io::Stdout, frame: &str) -> io::Result<()> {
    queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in frame.lines() {
        queue!(stdout, Print(line), MoveToNextLine(1))?;
    }
    stdout.flush()
}
