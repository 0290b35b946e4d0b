//! 3x3 board state as seen by the client.

use crate::mark::Mark;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Number of columns (and rows).
pub const COLUMNS: usize = 3;

/// Cell index outside `0..9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cell index {} out of range 0..{}", index, CELL_COUNT)]
pub struct CellOutOfRange {
    /// The offending index.
    pub index: usize,
}

/// A cell on the board, addressed row-major.
///
/// Serialized as its index; deserialization goes through [`Cell::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Cell(usize);

impl Cell {
    /// The centre cell.
    pub const CENTER: Cell = Cell(4);

    /// Creates a cell from a row-major index.
    pub fn new(index: usize) -> Result<Self, CellOutOfRange> {
        if index < CELL_COUNT {
            Ok(Self(index))
        } else {
            Err(CellOutOfRange { index })
        }
    }

    /// Creates a cell from row and column.
    pub fn from_row_column(row: usize, column: usize) -> Result<Self, CellOutOfRange> {
        if row >= COLUMNS || column >= COLUMNS {
            return Err(CellOutOfRange {
                index: row * COLUMNS + column,
            });
        }
        Self::new(row * COLUMNS + column)
    }

    /// Row-major index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Row (index div 3).
    pub fn row(self) -> usize {
        self.0 / COLUMNS
    }

    /// Column (index mod 3).
    pub fn column(self) -> usize {
        self.0 % COLUMNS
    }
}

impl TryFrom<usize> for Cell {
    type Error = CellOutOfRange;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Cell::new(index)
    }
}

impl From<Cell> for usize {
    fn from(cell: Cell) -> Self {
        cell.0
    }
}

/// Nine marks in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Mark; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a board from row-major marks.
    pub fn from_cells(cells: [Mark; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Mark at `cell`.
    pub fn get(&self, cell: Cell) -> Mark {
        self.cells[cell.index()]
    }

    /// Sets the mark at `cell`.
    pub fn set(&mut self, cell: Cell, mark: Mark) {
        self.cells[cell.index()] = mark;
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Mark; CELL_COUNT] {
        &self.cells
    }

    /// Rows of three.
    pub fn rows(&self) -> impl Iterator<Item = &[Mark]> + '_ {
        self.cells.chunks(COLUMNS)
    }

    /// Whether no blank cell remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|mark| !mark.is_blank())
    }

    /// Number of blank cells.
    pub fn blank_count(&self) -> usize {
        self.cells.iter().filter(|mark| mark.is_blank()).count()
    }

    /// Formats the board as text, blanks shown as their cell number.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (i, mark) in self.cells.iter().enumerate() {
            if i % COLUMNS == 0 && i > 0 {
                result.push_str("\n-+-+-\n");
            }
            match mark {
                Mark::Blank => result.push_str(&(i + 1).to_string()),
                other => result.push(other.symbol()),
            }
            if i % COLUMNS < COLUMNS - 1 {
                result.push('|');
            }
        }
        result
    }
}

/// Result of a game as far as the client can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    /// Game continues.
    #[display("In progress")]
    InProgress,
    /// Server reported a winner.
    #[display("{} wins", _0)]
    Won(Mark),
    /// Board full with no winner.
    #[display("Draw")]
    Draw,
}

impl Outcome {
    /// Derives the outcome from an authoritative board and winner.
    ///
    /// Win detection belongs to the server; only the draw is computed here.
    pub fn of(board: &Board, winner: Option<Mark>) -> Self {
        match winner {
            Some(mark) => Outcome::Won(mark),
            None if board.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    /// Whether the game has ended.
    pub fn is_over(self) -> bool {
        self != Outcome::InProgress
    }
}
