//! Keyboard handling for the terminal client.

use crate::board::{COLUMNS, Cell};
use crossterm::event::KeyCode;

/// What a key press asks the client to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the client.
    Quit,
    /// Re-fetch the session now.
    Refresh,
    /// Click the given cell.
    Click(Cell),
    /// Move the highlight.
    MoveCursor(Cell),
    /// Key has no binding.
    Ignore,
}

/// Maps a key to an action. Digits 1-9 click cells directly, arrows move
/// the cursor and Enter/Space click the cursor cell.
pub fn key_action(key: KeyCode, cursor: Cell) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Click(cursor),
        KeyCode::Char(c) => c
            .to_digit(10)
            .and_then(|digit| (digit as usize).checked_sub(1))
            .and_then(|index| Cell::new(index).ok())
            .map_or(KeyAction::Ignore, KeyAction::Click),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            KeyAction::MoveCursor(move_cursor(cursor, key))
        }
        _ => KeyAction::Ignore,
    }
}

/// Moves the cursor one cell, stopping at the board edge.
pub fn move_cursor(cursor: Cell, key: KeyCode) -> Cell {
    let (row, column) = (cursor.row(), cursor.column());
    let last = COLUMNS - 1;
    let (row, column) = match key {
        KeyCode::Up => (row.saturating_sub(1), column),
        KeyCode::Down => ((row + 1).min(last), column),
        KeyCode::Left => (row, column.saturating_sub(1)),
        KeyCode::Right => (row, (column + 1).min(last)),
        _ => (row, column),
    };
    Cell::from_row_column(row, column).unwrap_or(cursor)
}
