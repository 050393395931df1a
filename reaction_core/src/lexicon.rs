//! Keyword tag lexicon - the static table behind tag detection.
//!
//! The lexicon maps tag names to trigger keywords and domain contributions.
//! It is immutable configuration: built once at process start (from TOML or
//! the built-in table) and passed by reference into the detector, never
//! consulted as ambient global state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::errors::CoreError;
use domain_rules::{Domain, TagCategory};

/// One lexicon entry: a tag, the keywords that trigger it, and the domains
/// it exercises.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub tag: String,
    pub category: TagCategory,
    /// Matched as lowercase substrings of the action text.
    pub keywords: Vec<String>,
    /// Domains this tag contributes to. Always at least one.
    pub domains: Vec<Domain>,
}

/// On-disk shape of a lexicon TOML file.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    tags: Vec<LexiconEntry>,
}

/// An ordered collection of lexicon entries with name-indexed lookup.
///
/// Declaration order is meaningful: detection scores that tie resolve to the
/// earlier entry.
#[derive(Debug, Clone)]
pub struct TagLexicon {
    entries: Vec<LexiconEntry>,
    by_name: HashMap<String, usize>,
}

impl TagLexicon {
    /// Build a lexicon from entries, preserving order.
    ///
    /// Keywords are normalized to lowercase. If two entries share a tag name
    /// the first one wins; later duplicates are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = LexiconEntry>) -> Self {
        let mut kept: Vec<LexiconEntry> = Vec::new();
        let mut by_name = HashMap::new();

        for mut entry in entries {
            if by_name.contains_key(&entry.tag) {
                continue;
            }
            for keyword in &mut entry.keywords {
                *keyword = keyword.to_lowercase();
            }
            by_name.insert(entry.tag.clone(), kept.len());
            kept.push(entry);
        }

        Self {
            entries: kept,
            by_name,
        }
    }

    /// Parse a lexicon from TOML configuration.
    pub fn from_toml_str(toml: &str) -> Result<Self, CoreError> {
        let file: LexiconFile = toml::from_str(toml)?;
        Ok(Self::from_entries(file.tags))
    }

    /// The built-in keyword table. Covers every domain and tag category, so
    /// the engine runs with zero external configuration.
    pub fn standard() -> Self {
        fn entry(
            tag: &str,
            category: TagCategory,
            keywords: &[&str],
            domains: &[Domain],
        ) -> LexiconEntry {
            LexiconEntry {
                tag: tag.to_string(),
                category,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                domains: domains.to_vec(),
            }
        }

        use Domain::*;

        Self::from_entries([
            entry(
                "strike",
                TagCategory::Combat,
                &["attack", "strike", "fight", "swing", "slash", "stab"],
                &[Body],
            ),
            entry(
                "archery",
                TagCategory::Combat,
                &["bow", "arrow", "shoot", "aim"],
                &[Body, Awareness],
            ),
            entry(
                "defense",
                TagCategory::Combat,
                &["block", "parry", "shield", "guard", "brace"],
                &[Body, Awareness],
            ),
            entry(
                "smithing",
                TagCategory::Crafting,
                &["forge", "smith", "anvil", "hammer", "temper"],
                &[Craft, Body],
            ),
            entry(
                "alchemy",
                TagCategory::Crafting,
                &["brew", "potion", "distill", "elixir", "herb"],
                &[Craft, Mind],
            ),
            entry(
                "cooking",
                TagCategory::Crafting,
                &["cook", "bake", "roast", "stew", "season"],
                &[Craft],
            ),
            entry(
                "persuasion",
                TagCategory::Social,
                &["persuade", "convince", "charm", "flatter", "negotiate"],
                &[Social],
            ),
            entry(
                "intimidation",
                TagCategory::Social,
                &["intimidate", "threaten", "menace", "loom"],
                &[Social, Authority],
            ),
            entry(
                "deception",
                TagCategory::Social,
                &["lie", "deceive", "bluff", "disguise", "feign"],
                &[Social, Mind],
            ),
            entry(
                "spellcraft",
                TagCategory::Magic,
                &["cast", "spell", "incant", "ritual", "rune"],
                &[Spirit, Mind],
            ),
            entry(
                "warding",
                TagCategory::Magic,
                &["ward", "banish", "cleanse", "bless"],
                &[Spirit],
            ),
            entry(
                "tracking",
                TagCategory::Survival,
                &["track", "trail", "hunt", "forage", "scout"],
                &[Awareness, Body],
            ),
            entry(
                "wilderness",
                TagCategory::Survival,
                &["camp", "shelter", "climb", "swim", "wade"],
                &[Body, Awareness],
            ),
            entry(
                "governance",
                TagCategory::Kingdom,
                &["decree", "law", "court", "command", "govern"],
                &[Authority, Mind],
            ),
            entry(
                "logistics",
                TagCategory::Kingdom,
                &["supply", "trade", "caravan", "tally", "provision"],
                &[Authority, Craft],
            ),
            entry(
                "study",
                TagCategory::General,
                &["read", "study", "research", "examine", "ponder"],
                &[Mind],
            ),
            entry(
                "meditation",
                TagCategory::General,
                &["meditate", "pray", "reflect", "commune"],
                &[Spirit, Mind],
            ),
            entry(
                "observation",
                TagCategory::General,
                &["watch", "listen", "notice", "search", "inspect"],
                &[Awareness],
            ),
        ])
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    /// Look up an entry by tag name.
    pub fn get(&self, tag: &str) -> Option<&LexiconEntry> {
        self.by_name.get(tag).map(|&i| &self.entries[i])
    }

    /// Check whether a tag name is declared.
    pub fn contains(&self, tag: &str) -> bool {
        self.by_name.contains_key(tag)
    }

    /// Union of all domains declared anywhere in the lexicon.
    pub fn all_domains(&self) -> BTreeSet<Domain> {
        self.entries
            .iter()
            .flat_map(|e| e.domains.iter().copied())
            .collect()
    }

    /// Number of declared tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon declares no tags.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
