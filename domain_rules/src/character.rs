//! Character identity and the per-character save record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domains::{Domain, GrowthTier};
use crate::ledger::{DomainLedger, GrowthConfig};
use crate::profile::ShadowProfile;
use crate::tags::TagSet;

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    /// Create a new random character ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a character ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty character ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One character's complete progression record.
///
/// This is the single logical unit the persistence layer loads before a
/// player turn and writes back after it. Character identity beyond the ID
/// (display name, account, appearance) lives outside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub id: CharacterId,
    pub profile: ShadowProfile,
    pub ledger: DomainLedger,
    pub tags: TagSet,

    /// NPC names this character has already spoken with, for first-encounter
    /// framing in dialogue.
    pub met_npcs: BTreeSet<String>,
}

impl CharacterSheet {
    /// Create a fresh sheet with an all-zero profile and ledger.
    pub fn new(id: CharacterId, config: &GrowthConfig) -> Self {
        Self {
            id,
            profile: ShadowProfile::new(),
            ledger: DomainLedger::new(config),
            tags: TagSet::new(),
            met_npcs: BTreeSet::new(),
        }
    }

    /// Tier banding of one domain's current value.
    pub fn tier(&self, domain: Domain) -> GrowthTier {
        self.ledger.entry(domain).tier()
    }

    /// Whether this character has already met the named NPC.
    pub fn has_met(&self, npc: &str) -> bool {
        self.met_npcs.contains(npc)
    }
}
