//! Skill tags - named descriptors linking player actions to domains.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domains::Domain;
use crate::errors::RulesError;

/// Unique identifier for tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(pub Uuid);

impl TagId {
    /// Create a new random tag ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a nil/empty tag ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Categories a skill tag can belong to. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagCategory {
    Combat,
    Crafting,
    Social,
    Magic,
    Survival,
    Kingdom,
    General,
}

impl TagCategory {
    /// Human-readable name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            TagCategory::Combat => "Combat",
            TagCategory::Crafting => "Crafting",
            TagCategory::Social => "Social",
            TagCategory::Magic => "Magic",
            TagCategory::Survival => "Survival",
            TagCategory::Kingdom => "Kingdom",
            TagCategory::General => "General",
        }
    }
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A named skill descriptor owned by a character.
///
/// Tags contribute to one or more domains whenever they fire, and carry their
/// own rank/xp track. Ranks are cosmetic flavor for dialogue and UI; domain
/// values are the mechanical stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub category: TagCategory,
    pub description: String,
    /// Domains exercised whenever this tag fires. Always at least one.
    pub domains: Vec<Domain>,
    pub rank: u32,
    pub xp: u32,
    pub xp_required: u32,
}

impl Tag {
    /// Create a new rank-zero tag.
    pub fn new(
        name: impl Into<String>,
        category: TagCategory,
        domains: impl IntoIterator<Item = Domain>,
    ) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            category,
            description: String::new(),
            domains: domains.into_iter().collect(),
            rank: 0,
            xp: 0,
            xp_required: Self::xp_required_for(0),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// XP needed to advance past the given rank. Non-decreasing in rank.
    pub fn xp_required_for(rank: u32) -> u32 {
        10 + rank * 5
    }

    /// Grant xp, advancing rank on each threshold crossing. Overflow carries
    /// into the next rank rather than being discarded. Pure; returns the
    /// updated tag.
    pub fn grant_xp(&self, amount: u32) -> Tag {
        let mut next = self.clone();
        next.xp += amount;
        while next.xp >= next.xp_required {
            next.xp -= next.xp_required;
            next.rank += 1;
            next.xp_required = Self::xp_required_for(next.rank);
        }
        next
    }
}

/// A character's owned tags, keyed by name. Names are unique per character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TagSet {
    tags: BTreeMap<String, Tag>,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag. Fails if the character already owns a tag with this name.
    pub fn adopt(&mut self, tag: Tag) -> Result<(), RulesError> {
        if self.tags.contains_key(&tag.name) {
            return Err(RulesError::DuplicateTag(tag.name));
        }
        self.tags.insert(tag.name.clone(), tag);
        Ok(())
    }

    /// Get a tag by name.
    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Check whether a tag with this name is owned.
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Grant xp to a named tag. No-op if the tag is not owned.
    pub fn grant_xp(&mut self, name: &str, amount: u32) {
        if let Some(tag) = self.tags.get_mut(name) {
            *tag = tag.grant_xp(amount);
        }
    }

    /// Iterate over owned tags in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.values()
    }

    /// Number of owned tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the character owns no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
