//! Bidirectional label/code registry for small enumerations.

use derive_more::{Display, Error};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, instrument};

/// Registry lookup or construction failure.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum RegistryError {
    /// Reverse lookup of a code that was never registered.
    #[display("Registry has no defined '{}' value", code)]
    NoSuchValue {
        /// Debug rendering of the missing code.
        code: String,
    },
    /// Forward lookup of a label that was never registered.
    #[display("Registry has no label '{}'", label)]
    NoSuchLabel {
        /// The missing label.
        label: String,
    },
    /// Two labels were given the same code.
    #[display("Code '{}' registered for both '{}' and '{}'", code, first, second)]
    DuplicateCode {
        /// Debug rendering of the shared code.
        code: String,
        /// Label registered first.
        first: String,
        /// Label that collided.
        second: String,
    },
    /// The same label was registered twice.
    #[display("Label '{}' registered twice", label)]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
}

/// Frozen bijection between text labels and codes.
///
/// Built once from `(label, code)` pairs; no mutation is exposed afterwards.
/// Reverse lookups check key presence, so a code equal to `0` resolves like
/// any other registered code.
#[derive(Debug, Clone)]
pub struct LabelRegistry<C> {
    entries: Vec<(String, C)>,
    by_label: HashMap<String, C>,
    by_code: HashMap<C, String>,
}

impl<C> LabelRegistry<C>
where
    C: Copy + Eq + Hash + Debug,
{
    /// Builds a registry, rejecting duplicate labels or codes.
    #[instrument(skip(pairs))]
    pub fn new<L, I>(pairs: I) -> Result<Self, RegistryError>
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, C)>,
    {
        let mut entries = Vec::new();
        let mut by_label = HashMap::new();
        let mut by_code: HashMap<C, String> = HashMap::new();

        for (label, code) in pairs {
            let label = label.into();
            if by_label.contains_key(&label) {
                return Err(RegistryError::DuplicateLabel { label });
            }
            if let Some(first) = by_code.get(&code) {
                return Err(RegistryError::DuplicateCode {
                    code: format!("{:?}", code),
                    first: first.clone(),
                    second: label,
                });
            }
            by_label.insert(label.clone(), code);
            by_code.insert(code, label.clone());
            entries.push((label, code));
        }

        debug!(count = entries.len(), "Label registry built");
        Ok(Self {
            entries,
            by_label,
            by_code,
        })
    }

    /// Builds a registry from a fieldless enum whose variant names are the
    /// labels and whose discriminants are the codes.
    ///
    /// Discriminants are unique by construction, so this cannot fail.
    pub fn from_enum<E>() -> Self
    where
        E: strum::IntoEnumIterator + Into<&'static str> + Into<C> + Copy,
    {
        Self::from_enum_with::<E, _>(Into::<&'static str>::into)
    }

    /// Builds a registry from a fieldless enum, labelling each variant with
    /// `label`. Codes are the discriminants.
    ///
    /// `label` must give every variant a distinct text.
    pub fn from_enum_with<E, F>(label: F) -> Self
    where
        E: strum::IntoEnumIterator + Into<C> + Copy,
        F: Fn(E) -> &'static str,
    {
        let mut entries = Vec::new();
        let mut by_label = HashMap::new();
        let mut by_code = HashMap::new();
        for variant in E::iter() {
            let text = label(variant);
            let code = Into::<C>::into(variant);
            by_label.insert(text.to_string(), code);
            by_code.insert(code, text.to_string());
            entries.push((text.to_string(), code));
        }
        debug_assert_eq!(by_code.len(), entries.len());
        debug_assert_eq!(by_label.len(), entries.len());
        Self {
            entries,
            by_label,
            by_code,
        }
    }

    /// Returns the code registered for `label`.
    pub fn code_of(&self, label: &str) -> Result<C, RegistryError> {
        self.by_label
            .get(label)
            .copied()
            .ok_or_else(|| RegistryError::NoSuchLabel {
                label: label.to_string(),
            })
    }

    /// Returns the label registered for `code`.
    pub fn label_of(&self, code: C) -> Result<&str, RegistryError> {
        match self.by_code.get(&code) {
            Some(label) => Ok(label.as_str()),
            None => Err(RegistryError::NoSuchValue {
                code: format!("{:?}", code),
            }),
        }
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, C)> + '_ {
        self.entries.iter().map(|(label, code)| (label.as_str(), *code))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> LabelRegistry<u8> {
        LabelRegistry::new([("RED", 0u8), ("GREEN", 1), ("BLUE", 7)]).unwrap()
    }

    #[test]
    fn test_round_trip_every_label() {
        let registry = colors();
        for (label, code) in registry.iter() {
            assert_eq!(registry.label_of(registry.code_of(label).unwrap()).unwrap(), label);
            assert_eq!(registry.code_of(label).unwrap(), code);
        }
    }

    #[test]
    fn test_zero_code_resolves() {
        assert_eq!(colors().label_of(0).unwrap(), "RED");
    }

    #[test]
    fn test_unknown_code_fails() {
        let err = colors().label_of(3).unwrap_err();
        assert_eq!(err, RegistryError::NoSuchValue { code: "3".to_string() });
        assert_eq!(err.to_string(), "Registry has no defined '3' value");
    }

    #[test]
    fn test_unknown_label_fails() {
        assert!(matches!(
            colors().code_of("PURPLE"),
            Err(RegistryError::NoSuchLabel { .. })
        ));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let err = LabelRegistry::new([("A", 1u8), ("B", 1)]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode { .. }));
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = LabelRegistry::new([("A", 1u8), ("A", 2)]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateLabel { label: "A".to_string() });
    }

    #[test]
    fn test_iteration_keeps_registration_order() {
        let registry = colors();
        let labels: Vec<&str> = registry.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, ["RED", "GREEN", "BLUE"]);
        assert_eq!(colors().len(), 3);
    }
}
