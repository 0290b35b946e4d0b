//! Client-side reconciliation with the session server.
//!
//! The synchronizer owns the view, the transport and the last authoritative
//! snapshot. Clicks paint an optimistic mark and post a move; the server's
//! answer replaces the local state wholesale, and a rejection restores the
//! previous snapshot.

use crate::board::{Board, Outcome};
use crate::mark::Mark;
use crate::protocol::{MoveRequest, SessionSnapshot};
use crate::surface::RenderSurface;
use crate::transport::{SessionTransport, TransportError};
use crate::view::{BoardView, MarkedEvent, ViewError};
use derive_more::{Display, Error, From};
use tracing::{debug, info, instrument, warn};

/// Where the synchronizer is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SyncPhase {
    /// Showing the last authoritative snapshot.
    Idle,
    /// Optimistic mark drawn, move request not yet answered.
    AwaitingConfirmation,
    /// Last request succeeded and its snapshot is displayed.
    Reconciled,
    /// Last request failed and the previous snapshot was restored.
    Reverted,
}

/// Result of a request cycle. Transport failures end here, not in `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Server state applied.
    Reconciled(Outcome),
    /// Request failed; display restored to the last good snapshot.
    Reverted(TransportError),
}

/// Failure the synchronizer cannot recover from locally.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SyncError {
    /// Rendering failed.
    #[display("View error: {}", _0)]
    View(ViewError),
}

/// Page controller for one game session.
#[derive(Debug)]
pub struct BoardSynchronizer<T, S> {
    session_id: String,
    player_mark: Mark,
    transport: T,
    view: BoardView<S>,
    last_good: SessionSnapshot,
    phase: SyncPhase,
    pending: Option<MarkedEvent>,
}

impl<T, S> BoardSynchronizer<T, S>
where
    T: SessionTransport,
    S: RenderSurface,
{
    /// Creates a synchronizer in the Idle phase with an empty snapshot.
    ///
    /// Call [`refresh`](Self::refresh) to load the session.
    #[instrument(skip(transport, surface))]
    pub fn new(session_id: String, player_mark: Mark, transport: T, surface: S) -> Self {
        info!(session_id = %session_id, mark = %player_mark, "Creating board synchronizer");
        Self {
            session_id,
            player_mark,
            transport,
            view: BoardView::new(surface),
            last_good: SessionSnapshot::empty(),
            phase: SyncPhase::Idle,
            pending: None,
        }
    }

    /// Fetches the session state unconditionally.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn refresh(&mut self) -> Result<SyncOutcome, SyncError> {
        debug!("Refreshing session state");
        let result = self.transport.fetch(&self.session_id).await;
        self.settle(result)
    }

    /// Handles a click on cell `index`.
    ///
    /// Returns `None` without touching the display when the game is over or
    /// a move is still awaiting confirmation. Otherwise paints the local
    /// player's mark and returns the move intent.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub fn handle_cell_clicked(&mut self, index: usize) -> Result<Option<MarkedEvent>, SyncError> {
        if self.outcome().is_over() {
            debug!(outcome = %self.outcome(), "Game over, click ignored");
            return Ok(None);
        }
        if self.phase == SyncPhase::AwaitingConfirmation {
            debug!("Move in flight, click ignored");
            return Ok(None);
        }

        let event = self.view.cell_clicked(index, self.player_mark)?;
        self.phase = SyncPhase::AwaitingConfirmation;
        self.pending = Some(event);
        info!(
            cell_index = event.cell_index,
            row = event.row,
            column = event.column,
            "Optimistic mark placed"
        );
        Ok(Some(event))
    }

    /// Posts a `set-mark` move and reconciles with the answer.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn submit_move(
        &mut self,
        row: usize,
        column: usize,
        mark: Mark,
    ) -> Result<SyncOutcome, SyncError> {
        self.phase = SyncPhase::AwaitingConfirmation;
        let request = MoveRequest::set_mark(row, column, mark);
        let result = self.transport.submit(&self.session_id, &request).await;
        self.settle(result)
    }

    /// Click then submit, as one cycle. `None` when the click was inert.
    pub async fn play_cell(&mut self, index: usize) -> Result<Option<SyncOutcome>, SyncError> {
        match self.handle_cell_clicked(index)? {
            Some(event) => Ok(Some(
                self.submit_move(event.row, event.column, event.mark).await?,
            )),
            None => Ok(None),
        }
    }

    fn settle(
        &mut self,
        result: Result<SessionSnapshot, TransportError>,
    ) -> Result<SyncOutcome, SyncError> {
        self.pending = None;
        match result {
            Ok(snapshot) => {
                if let Err(err) = self.view.render(&snapshot.board) {
                    self.phase = SyncPhase::Reverted;
                    return Err(err.into());
                }
                self.last_good = snapshot;
                let outcome = snapshot.outcome();
                self.view.show_outcome(outcome);
                self.phase = SyncPhase::Reconciled;
                info!(outcome = %outcome, "Reconciled with server");
                Ok(SyncOutcome::Reconciled(outcome))
            }
            Err(err) => {
                warn!(error = %err, "Request failed, reverting to last good board");
                self.phase = SyncPhase::Reverted;
                self.view.render(&self.last_good.board)?;
                self.view.show_outcome(self.last_good.outcome());
                Ok(SyncOutcome::Reverted(err))
            }
        }
    }

    /// Outcome of the last authoritative snapshot.
    pub fn outcome(&self) -> Outcome {
        self.last_good.outcome()
    }

    /// Winner of the last authoritative snapshot.
    pub fn winner(&self) -> Option<Mark> {
        self.last_good.winner
    }

    /// Last board confirmed by the server.
    pub fn last_good(&self) -> &SessionSnapshot {
        &self.last_good
    }

    /// Board currently confirmed by the server.
    pub fn board(&self) -> &Board {
        &self.last_good.board
    }

    /// Current phase.
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Move awaiting confirmation, if any.
    pub fn pending(&self) -> Option<MarkedEvent> {
        self.pending
    }

    /// Session this synchronizer follows.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Mark the local player places.
    pub fn player_mark(&self) -> Mark {
        self.player_mark
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The board view.
    pub fn view(&self) -> &BoardView<S> {
        &self.view
    }

    /// The board view, mutably.
    pub fn view_mut(&mut self) -> &mut BoardView<S> {
        &mut self.view
    }
}
