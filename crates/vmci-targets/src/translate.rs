//! Generic translation of runtime constants into closed capability sets.

use std::collections::{BTreeMap, BTreeSet};

use vmci_config::ConfigStore;

/// A member of a closed enumeration that is backed by a named constant.
pub trait ConfigKey: Copy + Ord + 'static {
    /// Every member of the enumeration.
    const ALL: &'static [Self];

    /// Canonical constant name for this member.
    fn config_name(self) -> &'static str;

    /// Look up a member by its canonical constant name.
    fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.config_name() == name)
    }
}

/// Legacy spellings under which the runtime may publish a capability.
///
/// Maps a canonical capability name to an additional constant name that
/// also enables it. The canonical name keeps counting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aliases {
    renamed: BTreeMap<String, String>,
}

impl Aliases {
    /// No legacy names: every capability is looked up under its canonical name only.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(mut self, canonical: impl Into<String>, published: impl Into<String>) -> Self {
        self.renamed.insert(canonical.into(), published.into());
        self
    }

    /// Legacy name registered for `canonical`, if any.
    pub fn get(&self, canonical: &str) -> Option<&str> {
        self.renamed.get(canonical).map(String::as_str)
    }
}

/// Translate store constants into the set of enabled capabilities.
///
/// A capability is included iff its canonical constant, or the legacy
/// constant aliased to it, is present and truthy. Store entries that
/// name no capability are ignored, and missing constants simply leave
/// the capability out.
pub fn translate_capabilities<T: ConfigKey>(
    store: &dyn ConfigStore,
    aliases: &Aliases,
) -> BTreeSet<T> {
    T::ALL
        .iter()
        .copied()
        .filter(|key| {
            let name = key.config_name();
            store.is_set(name) || aliases.get(name).is_some_and(|legacy| store.is_set(legacy))
        })
        .collect()
}
