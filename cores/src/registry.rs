//! Core registry for automatic host discovery.
//!
//! Each core self-registers via [`inventory::submit!`] with a [`CoreEntry`]
//! containing its CLI name, a one-line description and a factory function.
//! Hosts discover available cores at runtime without any central list.

use harness_core::core::machine::EmulationCore;
use harness_core::error::CoreError;

/// Factory: construct a core from a raw ROM image.
pub type CoreFactory = fn(&[u8]) -> Result<Box<dyn EmulationCore>, CoreError>;

/// Describes a host-selectable emulation core.
pub struct CoreEntry {
    /// Name used to select this core (e.g., "test-pattern").
    pub name: &'static str,
    /// Shown by `--list-cores`.
    pub description: &'static str,
    pub create: CoreFactory,
}

impl CoreEntry {
    pub const fn new(name: &'static str, description: &'static str, create: CoreFactory) -> Self {
        Self {
            name,
            description,
            create,
        }
    }
}

inventory::collect!(CoreEntry);

/// Return all registered cores, sorted by name.
pub fn all() -> Vec<&'static CoreEntry> {
    let mut entries: Vec<_> = inventory::iter::<CoreEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a core by its name.
pub fn find(name: &str) -> Option<&'static CoreEntry> {
    inventory::iter::<CoreEntry>
        .into_iter()
        .find(|e| e.name == name)
}

/// Build the named core from `rom`.
pub fn create(name: &str, rom: &[u8]) -> Result<Box<dyn EmulationCore>, CoreError> {
    let entry = find(name).ok_or_else(|| CoreError::UnknownCore(name.to_string()))?;
    tracing::info!(core = entry.name, rom_bytes = rom.len(), "constructing core");
    (entry.create)(rom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_registered() {
        let entry = find("test-pattern").expect("test-pattern core registered");
        assert!(!entry.description.is_empty());
        assert!(all().iter().any(|e| e.name == "test-pattern"));
    }

    #[test]
    fn all_is_sorted() {
        let names: Vec<_> = all().iter().map(|e| e.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn unknown_core_is_an_error() {
        assert!(matches!(
            create("famicom-deluxe", &[]),
            Err(CoreError::UnknownCore(name)) if name == "famicom-deluxe"
        ));
    }
}
