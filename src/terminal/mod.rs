//! Terminal client: a ratatui page around the board synchronizer.

mod input;
mod ui;

pub use input::{KeyAction, key_action, move_cursor};
pub use ui::{TerminalSurface, draw};

use crate::config::ClientConfig;
use crate::mark::Mark;
use crate::sync::{BoardSynchronizer, SyncOutcome, SyncPhase};
use crate::transport::{HttpTransport, SessionTransport};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Resolves the session to join, asking the server for a new one if needed.
#[instrument(skip_all)]
pub async fn resolve_session(config: &ClientConfig, transport: &HttpTransport) -> Result<String> {
    match config.session_id() {
        Some(id) => Ok(id.clone()),
        None => {
            info!("No session configured, starting a new game");
            Ok(transport.start_new_game().await?)
        }
    }
}

/// Title line naming the session and both players' symbols.
pub fn session_title(session_id: &str, player_mark: Mark) -> String {
    match player_mark.opponent() {
        Some(opponent) => format!(
            "Tic-Tac-Toe - session {} - you play {} against {}",
            session_id,
            player_mark.symbol(),
            opponent.symbol()
        ),
        None => format!("Tic-Tac-Toe - session {}", session_id),
    }
}

/// Runs the interactive client until the user quits.
pub async fn run(config: ClientConfig) -> Result<()> {
    info!(base_url = %config.base_url(), "Starting terminal client");

    let transport = HttpTransport::new(config.base_url().clone(), config.request_timeout())?;
    let session_id = resolve_session(&config, &transport).await?;

    let synchronizer = BoardSynchronizer::new(
        session_id,
        *config.player_mark(),
        transport,
        TerminalSurface::new(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_session(&mut terminal, synchronizer, config.poll_interval()).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Session loop error");
    }
    res
}

/// Event loop: draw, read keys, and refresh every `poll_interval` while idle.
#[instrument(skip_all, fields(session_id = %synchronizer.session_id()))]
pub async fn run_session<B, T>(
    terminal: &mut Terminal<B>,
    mut synchronizer: BoardSynchronizer<T, TerminalSurface>,
    poll_interval: Duration,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    B::Error: Send + Sync + 'static,
    T: SessionTransport,
{
    let title = session_title(synchronizer.session_id(), synchronizer.player_mark());

    let outcome = synchronizer.refresh().await?;
    report(&mut synchronizer, outcome);
    let mut last_refresh = Instant::now();

    loop {
        terminal.draw(|f| draw(f, synchronizer.view().surface(), &title))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let cursor = synchronizer.view().surface().cursor();
                match key_action(key.code, cursor) {
                    KeyAction::Quit => {
                        info!("User quit");
                        return Ok(());
                    }
                    KeyAction::Refresh => {
                        let outcome = synchronizer.refresh().await?;
                        report(&mut synchronizer, outcome);
                        last_refresh = Instant::now();
                    }
                    KeyAction::MoveCursor(cell) => {
                        synchronizer.view_mut().surface_mut().set_cursor(cell);
                    }
                    KeyAction::Click(cell) => {
                        synchronizer.view_mut().surface_mut().set_cursor(cell);
                        if let Some(event) = synchronizer.handle_cell_clicked(cell.index())? {
                            // Show the optimistic mark before the request blocks the loop.
                            terminal.draw(|f| draw(f, synchronizer.view().surface(), &title))?;
                            let outcome = synchronizer
                                .submit_move(event.row, event.column, event.mark)
                                .await?;
                            report(&mut synchronizer, outcome);
                            last_refresh = Instant::now();
                        }
                    }
                    KeyAction::Ignore => {}
                }
            }
        }

        let idle = synchronizer.phase() != SyncPhase::AwaitingConfirmation;
        if idle && last_refresh.elapsed() >= poll_interval {
            debug!("Polling session state");
            let outcome = synchronizer.refresh().await?;
            report(&mut synchronizer, outcome);
            last_refresh = Instant::now();
        }
    }
}

fn report<T: SessionTransport>(
    synchronizer: &mut BoardSynchronizer<T, TerminalSurface>,
    outcome: SyncOutcome,
) {
    match outcome {
        SyncOutcome::Reconciled(_) => {
            let status = format!("{} blank cells left", synchronizer.board().blank_count());
            synchronizer.view_mut().surface_mut().set_status(status);
        }
        // The user only sees the board snap back.
        SyncOutcome::Reverted(err) => warn!(error = %err, "Display reverted to last known board"),
    }
}
