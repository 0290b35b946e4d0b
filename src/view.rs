//! Board view: paints marks and turns clicks into move intents.

use crate::board::{Board, CELL_COUNT, Cell, CellOutOfRange, Outcome};
use crate::mark::Mark;
use crate::surface::RenderSurface;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// View-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum ViewError {
    /// Surface does not expose exactly one slot per cell.
    #[display("Surface has {} slots, board has {}", slots, CELL_COUNT)]
    #[from(skip)]
    SlotMismatch {
        /// Slots on the surface.
        slots: usize,
    },
    /// Clicked index is not a cell.
    #[display("{}", _0)]
    OutOfRange(CellOutOfRange),
}

/// A click turned into a move intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedEvent {
    /// Row-major cell index.
    pub cell_index: usize,
    /// Row (index div 3).
    pub row: usize,
    /// Column (index mod 3).
    pub column: usize,
    /// Mark the local player placed.
    pub mark: Mark,
}

/// Paints boards into a render surface.
#[derive(Debug)]
pub struct BoardView<S> {
    surface: S,
}

impl<S: RenderSurface> BoardView<S> {
    /// Wraps a surface.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    fn check_slots(&self) -> Result<(), ViewError> {
        let slots = self.surface.slot_count();
        if slots != CELL_COUNT {
            error!(slots, "Surface slot count does not match board");
            return Err(ViewError::SlotMismatch { slots });
        }
        Ok(())
    }

    /// Paints every cell of `board`. Nothing is painted on slot mismatch.
    #[instrument(skip_all)]
    pub fn render(&mut self, board: &Board) -> Result<(), ViewError> {
        self.check_slots()?;
        for (index, mark) in board.cells().iter().enumerate() {
            self.surface.paint(index, mark.symbol());
        }
        debug!(display = %board.display(), "Rendered board");
        Ok(())
    }

    /// Shows or hides the completion banner.
    pub fn show_outcome(&mut self, outcome: Outcome) {
        let banner = outcome.is_over().then_some(outcome);
        self.surface.set_completion(banner);
    }

    /// Converts a click on `index` into a move intent and paints `mark` there.
    #[instrument(skip(self))]
    pub fn cell_clicked(&mut self, index: usize, mark: Mark) -> Result<MarkedEvent, ViewError> {
        self.check_slots()?;
        let cell = Cell::new(index)?;
        self.surface.paint(cell.index(), mark.symbol());
        let event = MarkedEvent {
            cell_index: cell.index(),
            row: cell.row(),
            column: cell.column(),
            mark,
        };
        debug!(?event, "Cell marked");
        Ok(event)
    }

    /// The underlying surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The underlying surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
