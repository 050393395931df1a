//! Persistence port - storage backends live outside the core.
//!
//! A character's sheet is loaded, mutated through the pure rules functions,
//! and written back as one logical unit per player turn. The core assumes at
//! most one in-flight mutation per character; backends that allow concurrent
//! turns for the same character must serialize load-mutate-save around the
//! sheet themselves (last-writer-wins is not acceptable).

use std::collections::HashMap;
use thiserror::Error;

use domain_rules::{CharacterId, CharacterSheet, DomainLedger, ShadowProfile, TagSet};

/// Failures of the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Load/save port for character progression state.
///
/// A missing sheet is `Ok(None)`, never an error: the engine lazily
/// initializes an all-zero sheet on first touch.
pub trait CharacterStore: Send + Sync {
    fn load(&self, id: CharacterId) -> Result<Option<CharacterSheet>, StoreError>;
    fn save(&mut self, id: CharacterId, sheet: &CharacterSheet) -> Result<(), StoreError>;

    /// Load only the shadow profile.
    fn load_profile(&self, id: CharacterId) -> Result<Option<ShadowProfile>, StoreError> {
        Ok(self.load(id)?.map(|sheet| sheet.profile))
    }

    /// Load only the growth ledger.
    fn load_ledger(&self, id: CharacterId) -> Result<Option<DomainLedger>, StoreError> {
        Ok(self.load(id)?.map(|sheet| sheet.ledger))
    }

    /// Load only the owned tag set.
    fn load_tags(&self, id: CharacterId) -> Result<Option<TagSet>, StoreError> {
        Ok(self.load(id)?.map(|sheet| sheet.tags))
    }
}

/// In-memory store for tests and local play.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sheets: HashMap<CharacterId, CharacterSheet>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the store holds no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn load(&self, id: CharacterId) -> Result<Option<CharacterSheet>, StoreError> {
        Ok(self.sheets.get(&id).cloned())
    }

    fn save(&mut self, id: CharacterId, sheet: &CharacterSheet) -> Result<(), StoreError> {
        self.sheets.insert(id, sheet.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_rules::{Domain, GrowthConfig};

    #[test]
    fn test_missing_sheet_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(CharacterId::new()).unwrap().is_none());
        assert!(store.load_profile(CharacterId::new()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut store = MemoryStore::new();
        let id = CharacterId::new();
        let config = GrowthConfig::default();

        let mut sheet = CharacterSheet::new(id, &config);
        sheet.profile = sheet.profile.apply_action(Domain::Spirit, 7);
        store.save(id, &sheet).unwrap();

        let loaded = store.load(id).unwrap().unwrap();
        assert_eq!(loaded, sheet);

        let profile = store.load_profile(id).unwrap().unwrap();
        assert_eq!(profile.domain_usage[Domain::Spirit], 7);
    }
}
