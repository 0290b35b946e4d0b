//! Render surfaces the board view paints into.

use crate::board::{CELL_COUNT, Outcome};

/// Somewhere to draw the nine cells and the end-of-game banner.
///
/// Slots are addressed row-major, matching cell indices.
pub trait RenderSurface {
    /// Number of display slots this surface exposes.
    fn slot_count(&self) -> usize;

    /// Writes `symbol` into slot `index`.
    fn paint(&mut self, index: usize, symbol: char);

    /// Shows the completion banner, or hides it with `None`.
    fn set_completion(&mut self, outcome: Option<Outcome>);
}

/// Surface that keeps painted symbols in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    slots: Vec<char>,
    completion: Option<Outcome>,
}

impl MemorySurface {
    /// A surface with the standard nine blank slots.
    pub fn new() -> Self {
        Self::with_slots(CELL_COUNT)
    }

    /// A surface with an arbitrary slot count.
    pub fn with_slots(count: usize) -> Self {
        Self {
            slots: vec![' '; count],
            completion: None,
        }
    }

    /// Current slot contents.
    pub fn slots(&self) -> &[char] {
        &self.slots
    }

    /// Slots as a string, row-major.
    pub fn text(&self) -> String {
        self.slots.iter().collect()
    }

    /// Banner currently shown, if any.
    pub fn completion(&self) -> Option<Outcome> {
        self.completion
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for MemorySurface {
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
