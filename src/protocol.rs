//! Wire shapes exchanged with the session server.
//!
//! `GET /session-data/{id}` and a successful `POST` both answer with
//! `{"board": <3x3 or 9 codes>, "winner": <code|null>}`. Moves are posted
//! form-encoded as `verb=set-mark` plus a JSON `args` object.

use crate::board::{Board, CELL_COUNT, COLUMNS, Cell, Outcome};
use crate::mark::Mark;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Verb understood by the session endpoint for placing a mark.
pub const SET_MARK_VERB: &str = "set-mark";

/// Session payload failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SnapshotError {
    /// Body is not JSON.
    #[display("Invalid JSON: {}", message)]
    InvalidJson {
        /// Parser message.
        message: String,
    },
    /// Body is JSON but not an object.
    #[display("Expected a JSON object")]
    NotAnObject,
    /// Required key absent.
    #[display("Missing field '{}'", field)]
    MissingField {
        /// Field name.
        field: &'static str,
    },
    /// Board is neither 3x3 nor 9 flat cells.
    #[display("Board must be 3x3 or 9 cells: {}", detail)]
    BoardShape {
        /// What was wrong.
        detail: String,
    },
    /// A cell holds a code that is not a mark.
    #[display("Cell {} has unknown code {}", cell, code)]
    UnknownCellCode {
        /// Row-major cell index.
        cell: usize,
        /// Raw value.
        code: String,
    },
    /// Winner is neither null nor a player's mark code.
    #[display("Unknown winner code {}", code)]
    UnknownWinner {
        /// Raw value.
        code: String,
    },
}

/// Authoritative board and winner for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    /// Board as the server sees it.
    pub board: Board,
    /// Winner, if the game is won.
    pub winner: Option<Mark>,
}

impl SessionSnapshot {
    /// Snapshot of a fresh session.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses and validates a session payload.
    #[instrument(skip(body), fields(len = body.len()))]
    pub fn parse(body: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(body).map_err(|e| {
            warn!(error = %e, "Session payload is not JSON");
            SnapshotError::InvalidJson {
                message: e.to_string(),
            }
        })?;
        Self::from_value(&value)
    }

    /// Validates an already-decoded payload.
    pub fn from_value(value: &Value) -> Result<Self, SnapshotError> {
        let object = value.as_object().ok_or(SnapshotError::NotAnObject)?;
        let board = object
            .get("board")
            .ok_or(SnapshotError::MissingField { field: "board" })?;
        let winner = object
            .get("winner")
            .ok_or(SnapshotError::MissingField { field: "winner" })?;

        let snapshot = Self {
            board: parse_board(board)?,
            winner: parse_winner(winner)?,
        };
        debug!(
            winner = ?snapshot.winner,
            blanks = snapshot.board.blank_count(),
            "Parsed session snapshot"
        );
        Ok(snapshot)
    }

    /// Outcome implied by this snapshot.
    pub fn outcome(&self) -> Outcome {
        Outcome::of(&self.board, self.winner)
    }
}

fn parse_board(value: &Value) -> Result<Board, SnapshotError> {
    let outer = value.as_array().ok_or_else(|| SnapshotError::BoardShape {
        detail: "not an array".to_string(),
    })?;

    let flat: Vec<&Value> = if outer.iter().all(Value::is_array) && !outer.is_empty() {
        if outer.len() != COLUMNS {
            return Err(SnapshotError::BoardShape {
                detail: format!("{} rows", outer.len()),
            });
        }
        let mut flat = Vec::with_capacity(CELL_COUNT);
        for (row, cells) in outer.iter().enumerate() {
            let cells = cells.as_array().ok_or_else(|| SnapshotError::BoardShape {
                detail: format!("row {} is not an array", row),
            })?;
            if cells.len() != COLUMNS {
                return Err(SnapshotError::BoardShape {
                    detail: format!("row {} has {} cells", row, cells.len()),
                });
            }
            flat.extend(cells.iter());
        }
        flat
    } else {
        outer.iter().collect()
    };

    if flat.len() != CELL_COUNT {
        return Err(SnapshotError::BoardShape {
            detail: format!("{} cells", flat.len()),
        });
    }

    let mut board = Board::new();
    for (index, raw) in flat.into_iter().enumerate() {
        let mark = code_to_mark(raw).ok_or_else(|| SnapshotError::UnknownCellCode {
            cell: index,
            code: raw.to_string(),
        })?;
        let cell = Cell::new(index).map_err(|e| SnapshotError::BoardShape {
            detail: e.to_string(),
        })?;
        board.set(cell, mark);
    }
    Ok(board)
}

fn parse_winner(value: &Value) -> Result<Option<Mark>, SnapshotError> {
    if value.is_null() {
        return Ok(None);
    }
    // Blank is a cell state, never a winner.
    match code_to_mark(value) {
        Some(mark) if !mark.is_blank() => Ok(Some(mark)),
        _ => Err(SnapshotError::UnknownWinner {
            code: value.to_string(),
        }),
    }
}

fn code_to_mark(value: &Value) -> Option<Mark> {
    let code = u8::try_from(value.as_u64()?).ok()?;
    Mark::from_code(code).ok()
}

/// Arguments of a `set-mark` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMarkArgs {
    /// Row, 0-2.
    pub row: usize,
    /// Column, 0-2.
    pub column: usize,
    /// Mark to place.
    pub mark: Mark,
}

/// Tagged move request posted to the session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// Move arguments.
    pub args: SetMarkArgs,
}

impl MoveRequest {
    /// Builds a `set-mark` request.
    pub fn set_mark(row: usize, column: usize, mark: Mark) -> Self {
        Self {
            args: SetMarkArgs { row, column, mark },
        }
    }

    /// Request verb.
    pub fn verb(&self) -> &'static str {
        SET_MARK_VERB
    }

    /// Form fields `verb` and `args` (JSON text).
    pub fn form_fields(&self) -> Result<[(&'static str, String); 2], serde_json::Error> {
        Ok([
            ("verb", self.verb().to_string()),
            ("args", serde_json::to_string(&self.args)?),
        ])
    }
}
