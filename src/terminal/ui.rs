//! ratatui rendering for the terminal client.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::board::{CELL_COUNT, COLUMNS, Cell, Outcome};
use crate::surface::RenderSurface;

/// Render surface backed by the terminal.
///
/// Painting only records symbols; [`draw`] puts them on screen.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    slots: [char; CELL_COUNT],
    completion: Option<Outcome>,
    cursor: Cell,
    status: String,
}

impl TerminalSurface {
    /// Creates a blank surface with the cursor in the centre.
    pub fn new() -> Self {
        Self {
            slots: [' '; CELL_COUNT],
            completion: None,
            cursor: Cell::CENTER,
            status: String::new(),
        }
    }

    /// Highlighted cell.
    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    /// Moves the highlight.
    pub fn set_cursor(&mut self, cursor: Cell) {
        self.cursor = cursor;
    }

    /// Sets the status line.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Painted symbol at `index`.
    pub fn symbol(&self, index: usize) -> char {
        self.slots.get(index).copied().unwrap_or(' ')
    }

    /// Completion banner text, if the game is over.
    pub fn banner(&self) -> Option<String> {
        self.completion.map(|outcome| match outcome {
            Outcome::Won(mark) => format!("Game over: {} wins", mark.symbol()),
            other => format!("Game over: {}", other),
        })
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for TerminalSurface {
    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn paint(&mut self, index: usize, symbol: char) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = symbol;
        }
    }

    fn set_completion(&mut self, outcome: Option<Outcome>) {
        self.completion = outcome;
    }
}

/// Draws the whole screen.
pub fn draw(frame: &mut Frame, surface: &TerminalSurface, title: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(9),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new(title.to_string())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_board(frame, chunks[1], surface);

    let (status, style) = match surface.banner() {
        Some(banner) => (banner, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        None => (surface.status.clone(), Style::default().fg(Color::Yellow)),
    };
    let status = Paragraph::new(status)
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("1-9 or arrows+Enter: mark   r: refresh   q: quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_board(frame: &mut Frame, area: Rect, surface: &TerminalSurface) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for row in 0..COLUMNS {
        draw_row(frame, rows[row * 2], surface, row);
        if row < COLUMNS - 1 {
            let sep = Paragraph::new("─".repeat(40)).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, rows[row * 2 + 1]);
        }
    }
}

fn draw_row(frame: &mut Frame, area: Rect, surface: &TerminalSurface, row: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for column in 0..COLUMNS {
        let index = row * COLUMNS + column;
        draw_cell(frame, cols[column * 2], surface, index);
        if column < COLUMNS - 1 {
            let sep = Paragraph::new("│").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(sep, cols[column * 2 + 1]);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, surface: &TerminalSurface, index: usize) {
    let symbol = surface.symbol(index);
    let base_style = match symbol {
        'X' => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        'O' => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(Color::DarkGray),
    };
    let text = if symbol == ' ' {
        format!(" {} ", index + 1)
    } else {
        format!(" {} ", symbol)
    };

    let style = if surface.cursor.index() == index && surface.completion.is_none() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    let paragraph =
        Paragraph::new(Line::from(Span::styled(text, style))).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
