pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::{AppState, LeagueFilter};
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Commands the TUI sends to the refresh controller.
#[derive(Debug, Clone, PartialEq)]
pub enum TuiCommand {
    Quit,
    Refresh,
    SetFilter(LeagueFilter),
    CycleFilter { forward: bool },
    PlaceBet,
    ScrollMatches(isize),
}

/// Key bindings. `None` for keys the dashboard ignores.
pub fn command_for_key(code: KeyCode) -> Option<TuiCommand> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(TuiCommand::Quit),
        KeyCode::Char('r') => Some(TuiCommand::Refresh),
        KeyCode::Char('f') | KeyCode::Tab => Some(TuiCommand::CycleFilter { forward: true }),
        KeyCode::Char('F') | KeyCode::BackTab => Some(TuiCommand::CycleFilter { forward: false }),
        KeyCode::Char('a') => Some(TuiCommand::SetFilter(LeagueFilter::All)),
        KeyCode::Char('b') => Some(TuiCommand::PlaceBet),
        KeyCode::Char('j') | KeyCode::Down => Some(TuiCommand::ScrollMatches(1)),
        KeyCode::Char('k') | KeyCode::Up => Some(TuiCommand::ScrollMatches(-1)),
        _ => None,
    }
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut spinner = tokio::time::interval(SPINNER_TICK);
    spinner.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut spinner_frame: u8 = 0;

    loop {
        {
            let state = state_rx.borrow();
            terminal.draw(|f| render::draw(f, &state, spinner_frame))?;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(cmd) = command_for_key(key.code) {
                        let quit = cmd == TuiCommand::Quit;
                        if cmd_tx.send(cmd).await.is_err() || quit {
                            return Ok(());
                        }
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
            changed = state_rx.changed() => {
                if changed.is_err() {
                    // Controller is gone; nothing left to show.
                    return Ok(());
                }
            }
            _ = spinner.tick() => {
                spinner_frame = spinner_frame.wrapping_add(1);
            }
        }
    }
}
