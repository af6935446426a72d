use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::types::Type;

/// Program-wide type information for every map identifier.
///
/// Both tables follow the same contract: the first entry for an identifier is
/// recorded, every later one is compared against it, and a recorded entry is
/// never replaced. A `Type::None` value is never recorded, since its real type
/// is either still unknown or already reported. Key signatures are recorded on
/// first use even with `Type::None` keys, which then match any key type in the
/// same position.
#[derive(Debug, Default, Clone)]
pub struct MapRegistry {
    keys: HashMap<String, Vec<Type>>,
    values: HashMap<String, Type>,
    /// Every map that appears on the left of an assignment, typed or not
    targets: HashSet<String>,
}

impl MapRegistry {
    pub fn new() -> Self {
        MapRegistry::default()
    }

    /// Records or checks the key signature used to access `ident`.
    ///
    /// On a mismatch the recorded signature is returned.
    pub fn check_keys(&mut self, ident: &str, keys: &[Type]) -> Result<(), Vec<Type>> {
        match self.keys.get(ident) {
            Some(recorded) if !signatures_match(recorded, keys) => Err(recorded.clone()),
            Some(_) => Ok(()),
            None => {
                debug!(map = ident, keys = ?keys, "recorded map key signature");
                self.keys.insert(ident.to_string(), keys.to_vec());
                Ok(())
            }
        }
    }

    /// Records or checks the value type assigned to `ident`.
    ///
    /// On a mismatch the recorded type is returned.
    pub fn assign(&mut self, ident: &str, value: Type) -> Result<(), Type> {
        self.targets.insert(ident.to_string());
        if !value.is_known() {
            return Ok(());
        }

        match self.values.get(ident) {
            Some(&recorded) if recorded != value => Err(recorded),
            Some(_) => Ok(()),
            None => {
                debug!(map = ident, value = %value, "recorded map value type");
                self.values.insert(ident.to_string(), value);
                Ok(())
            }
        }
    }

    pub fn value_of(&self, ident: &str) -> Option<Type> {
        self.values.get(ident).copied()
    }

    /// Whether `ident` is assigned anywhere seen so far, even if the type of
    /// that assignment is not known yet.
    pub fn is_assigned(&self, ident: &str) -> bool {
        self.targets.contains(ident)
    }

    pub fn keys_of(&self, ident: &str) -> Option<&[Type]> {
        self.keys.get(ident).map(Vec::as_slice)
    }

    /// Number of maps with a recorded value type.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Same length, and equal types wherever both sides are known.
fn signatures_match(recorded: &[Type], keys: &[Type]) -> bool {
    recorded.len() == keys.len()
        && recorded
            .iter()
            .zip(keys)
            .all(|(a, b)| !a.is_known() || !b.is_known() || a == b)
}
