//! Cell marks and their display symbols.

use crate::registry::{LabelRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::EnumProperty;

/// Content of a board cell.
///
/// Discriminants are the wire codes used by the session server.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::IntoStaticStr,
    strum::EnumString,
    strum::EnumProperty,
)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Mark {
    /// Empty cell.
    #[default]
    #[strum(serialize = "BLANK", props(symbol = " "))]
    Blank = 0,
    /// Cell taken by O.
    #[strum(serialize = "OMARK", props(symbol = "O"))]
    OMark = 1,
    /// Cell taken by X.
    #[strum(serialize = "XMARK", props(symbol = "X"))]
    XMark = 2,
}

static MARKS: LazyLock<LabelRegistry<u8>> = LazyLock::new(LabelRegistry::from_enum::<Mark>);

/// Display symbols keyed by wire code.
static SYMBOLS: LazyLock<LabelRegistry<u8>> = LazyLock::new(|| {
    LabelRegistry::from_enum_with(|mark: Mark| mark.get_str("symbol").unwrap_or(" "))
});

impl Mark {
    /// Registry of mark labels keyed by wire code.
    pub fn registry() -> &'static LabelRegistry<u8> {
        &MARKS
    }

    /// Resolves a wire code.
    pub fn from_code(code: u8) -> Result<Self, RegistryError> {
        let label = MARKS.label_of(code)?;
        label.parse().map_err(|_| RegistryError::NoSuchLabel {
            label: label.to_string(),
        })
    }

    /// Wire code of this mark.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Registry label (`BLANK`, `OMARK`, `XMARK`).
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// Symbol table used when painting display slots.
    pub fn symbols() -> &'static LabelRegistry<u8> {
        &SYMBOLS
    }

    /// Character painted into a display slot.
    pub fn symbol(self) -> char {
        SYMBOLS
            .label_of(self.code())
            .ok()
            .and_then(|symbol| symbol.chars().next())
            .unwrap_or(' ')
    }

    /// The other player's mark. Blank has no opponent.
    pub fn opponent(self) -> Option<Self> {
        match self {
            Mark::OMark => Some(Mark::XMark),
            Mark::XMark => Some(Mark::OMark),
            Mark::Blank => None,
        }
    }

    /// Whether the cell is empty.
    pub fn is_blank(self) -> bool {
        self == Mark::Blank
    }
}

impl From<Mark> for u8 {
    fn from(mark: Mark) -> Self {
        mark.code()
    }
}

impl TryFrom<u8> for Mark {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Mark::from_code(code)
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_wire_values() {
        assert_eq!(Mark::Blank.code(), 0);
        assert_eq!(Mark::OMark.code(), 1);
        assert_eq!(Mark::XMark.code(), 2);
    }

    #[test]
    fn test_registry_round_trip() {
        for (label, code) in Mark::registry().iter() {
            assert_eq!(Mark::registry().label_of(code).unwrap(), label);
            assert_eq!(Mark::from_code(code).unwrap().label(), label);
        }
        assert_eq!(Mark::registry().len(), 3);
    }

    #[test]
    fn test_blank_code_is_not_missing() {
        assert_eq!(Mark::registry().label_of(0).unwrap(), "BLANK");
        assert_eq!(Mark::from_code(0).unwrap(), Mark::Blank);
    }

    #[test]
    fn test_unknown_code_fails() {
        assert!(matches!(
            Mark::from_code(3),
            Err(RegistryError::NoSuchValue { .. })
        ));
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Mark::XMark).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Mark>("1").unwrap(), Mark::OMark);
        assert!(serde_json::from_str::<Mark>("9").is_err());
    }

    #[test]
    fn test_symbols() {
        assert_eq!(Mark::Blank.symbol(), ' ');
        assert_eq!(Mark::OMark.symbol(), 'O');
        assert_eq!(Mark::XMark.symbol(), 'X');
    }

    #[test]
    fn test_symbol_table_covers_every_code() {
        assert_eq!(Mark::symbols().len(), Mark::registry().len());
        for (_, code) in Mark::registry().iter() {
            let symbol = Mark::symbols().label_of(code).unwrap();
            assert_eq!(symbol.chars().next(), Some(Mark::from_code(code).unwrap().symbol()));
        }
        assert_eq!(Mark::symbols().code_of("X").unwrap(), 2);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Mark::OMark.opponent(), Some(Mark::XMark));
        assert_eq!(Mark::XMark.opponent(), Some(Mark::OMark));
        assert_eq!(Mark::Blank.opponent(), None);
    }
}
