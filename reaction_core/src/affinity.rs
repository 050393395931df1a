//! NPC bias tables and affinity scoring.
//!
//! An NPC's bias table is a partial set of signed domain weights. Affinity
//! combines those weights with a character's accumulated domain usage:
//! every 10 uses of a domain shift the NPC's opinion by one bias step, so a
//! single action never swings a reaction. Scores are only comparable between
//! the same NPC and profile pair.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use domain_rules::{Domain, ShadowProfile};

/// How many uses of a domain shift affinity by one bias step.
pub const AFFINITY_BUCKET: u32 = 10;

/// On-disk shape of a bias-table TOML file.
#[derive(Debug, Deserialize)]
struct BiasFile {
    npcs: BTreeMap<String, BTreeMap<Domain, i32>>,
}

/// Per-NPC domain preference weights.
///
/// The mapping is partial at both levels: an absent NPC and an absent domain
/// both mean neutral, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpcBiasTable {
    npcs: BTreeMap<String, BTreeMap<Domain, i32>>,
}

impl NpcBiasTable {
    /// Create an empty table (every NPC neutral).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a bias table from TOML configuration.
    pub fn from_toml_str(toml: &str) -> Result<Self, CoreError> {
        let file: BiasFile = toml::from_str(toml)?;
        Ok(Self { npcs: file.npcs })
    }

    /// The built-in sample cast used for tests and local play.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.set_bias("Captain Aldric", Domain::Body, 2);
        table.set_bias("Captain Aldric", Domain::Authority, 1);
        table.set_bias("Captain Aldric", Domain::Mind, -1);

        table.set_bias("Archivist Lyra", Domain::Mind, 2);
        table.set_bias("Archivist Lyra", Domain::Awareness, 1);
        table.set_bias("Archivist Lyra", Domain::Body, -1);

        table.set_bias("Mother Wren", Domain::Spirit, 2);
        table.set_bias("Mother Wren", Domain::Social, 1);
        table.set_bias("Mother Wren", Domain::Authority, -2);

        table.set_bias("Guildmaster Odo", Domain::Craft, 2);
        table.set_bias("Guildmaster Odo", Domain::Authority, 1);
        table
    }

    /// Set one NPC's weight for one domain.
    pub fn set_bias(&mut self, npc: impl Into<String>, domain: Domain, weight: i32) {
        self.npcs.entry(npc.into()).or_default().insert(domain, weight);
    }

    /// Get an NPC's weights, if any are declared.
    pub fn bias_for(&self, npc: &str) -> Option<&BTreeMap<Domain, i32>> {
        self.npcs.get(npc)
    }

    /// Human-readable summary of an NPC's leanings, for prompt assembly.
    /// Deterministic: domains are listed in canonical order.
    pub fn describe(&self, npc: &str) -> String {
        let Some(biases) = self.bias_for(npc) else {
            return format!("{npc} has no particular leanings");
        };

        let favors: Vec<&str> = biases
            .iter()
            .filter(|(_, w)| **w > 0)
            .map(|(d, _)| d.name())
            .collect();
        let dislikes: Vec<&str> = biases
            .iter()
            .filter(|(_, w)| **w < 0)
            .map(|(d, _)| d.name())
            .collect();

        match (favors.is_empty(), dislikes.is_empty()) {
            (true, true) => format!("{npc} has no particular leanings"),
            (false, true) => format!("{npc} favors {}", favors.join(" and ")),
            (true, false) => format!("{npc} distrusts {}", dislikes.join(" and ")),
            (false, false) => format!(
                "{npc} favors {} but distrusts {}",
                favors.join(" and "),
                dislikes.join(" and ")
            ),
        }
    }
}

/// Top-N domains by lifetime usage, ties resolved by [`Domain::ALL`] order.
pub fn dominant_domains(profile: &ShadowProfile, top_n: usize) -> Vec<Domain> {
    let mut ranked: Vec<(Domain, u32)> = profile.domain_usage.iter().map(|(d, v)| (d, *v)).collect();
    // Stable sort over canonical order: ties keep enumeration order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(top_n).map(|(d, _)| d).collect()
}

/// Signed affinity of an NPC toward the play style recorded in a profile.
///
/// Each domain the NPC has an opinion about contributes
/// `weight * floor(usage / AFFINITY_BUCKET)`; all other domains contribute
/// nothing. Unclamped; callers interpret sign and magnitude contextually.
/// Pure and side-effect-free.
pub fn affinity(table: &NpcBiasTable, npc: &str, profile: &ShadowProfile) -> i64 {
    let Some(biases) = table.bias_for(npc) else {
        return 0;
    };

    biases
        .iter()
        .map(|(domain, weight)| {
            let buckets = (profile.domain_usage[*domain] / AFFINITY_BUCKET) as i64;
            *weight as i64 * buckets
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with(pairs: &[(Domain, u32)]) -> ShadowProfile {
        let mut profile = ShadowProfile::new();
        for (domain, amount) in pairs {
            profile = profile.apply_action(*domain, *amount);
        }
        profile
    }

    #[test]
    fn test_affinity_example_scenario() {
        // usage = {MIND:30, SOCIAL:20, BODY:5}, bias = {MIND:+2, SOCIAL:-1}
        // affinity = 2*3 + (-1)*2 = 4
        let profile = profile_with(&[(Domain::Mind, 30), (Domain::Social, 20), (Domain::Body, 5)]);
        let mut table = NpcBiasTable::new();
        table.set_bias("Scribe", Domain::Mind, 2);
        table.set_bias("Scribe", Domain::Social, -1);

        assert_eq!(affinity(&table, "Scribe", &profile), 4);
        assert_eq!(dominant_domains(&profile, 2), vec![Domain::Mind, Domain::Social]);
    }

    #[test]
    fn test_affinity_buckets_floor() {
        let profile = profile_with(&[(Domain::Mind, 25)]);
        let mut table = NpcBiasTable::new();
        table.set_bias("Scribe", Domain::Mind, 2);

        // floor(25 / 10) = 2 buckets.
        assert_eq!(affinity(&table, "Scribe", &profile), 4);

        // Nine uses is still zero buckets.
        let sparse = profile_with(&[(Domain::Mind, 9)]);
        assert_eq!(affinity(&table, "Scribe", &sparse), 0);
    }

    #[test]
    fn test_unbiased_domains_contribute_nothing() {
        let profile = profile_with(&[(Domain::Body, 500)]);
        let mut table = NpcBiasTable::new();
        table.set_bias("Scribe", Domain::Mind, 2);

        assert_eq!(affinity(&table, "Scribe", &profile), 0);
    }

    #[test]
    fn test_unknown_npc_is_neutral() {
        let profile = profile_with(&[(Domain::Mind, 100)]);
        let table = NpcBiasTable::new();

        assert_eq!(affinity(&table, "Stranger", &profile), 0);
    }

    #[test]
    fn test_affinity_can_be_negative() {
        let profile = profile_with(&[(Domain::Authority, 40)]);
        let table = NpcBiasTable::standard();

        // Mother Wren weights Authority at -2: 4 buckets * -2 = -8.
        assert_eq!(affinity(&table, "Mother Wren", &profile), -8);
    }

    #[test]
    fn test_affinity_does_not_mutate_profile() {
        let profile = profile_with(&[(Domain::Mind, 30)]);
        let table = NpcBiasTable::standard();

        let before = profile.clone();
        let _ = affinity(&table, "Archivist Lyra", &profile);
        let _ = affinity(&table, "Archivist Lyra", &profile);
        assert_eq!(profile, before);
    }

    #[test]
    fn test_dominant_domains_exactly_top_n() {
        let profile = profile_with(&[(Domain::Craft, 9), (Domain::Spirit, 14), (Domain::Body, 2)]);

        let top = dominant_domains(&profile, 2);
        assert_eq!(top, vec![Domain::Spirit, Domain::Craft]);
    }

    #[test]
    fn test_dominant_domains_tie_order() {
        // All zero: ties across the board resolve to enumeration order.
        let profile = ShadowProfile::new();
        assert_eq!(dominant_domains(&profile, 2), vec![Domain::Body, Domain::Mind]);

        // A two-way tie below the leader.
        let tied = profile_with(&[(Domain::Social, 5), (Domain::Craft, 3), (Domain::Mind, 3)]);
        assert_eq!(
            dominant_domains(&tied, 3),
            vec![Domain::Social, Domain::Mind, Domain::Craft]
        );
    }

    #[test]
    fn test_describe_is_deterministic() {
        let table = NpcBiasTable::standard();

        let summary = table.describe("Captain Aldric");
        assert_eq!(summary, "Captain Aldric favors Body and Authority but distrusts Mind");
        assert_eq!(table.describe("Stranger"), "Stranger has no particular leanings");
    }

    #[test]
    fn test_bias_table_from_toml() {
        let toml = r#"
            [npcs."Captain Aldric"]
            Body = 2
            Mind = -1
        "#;

        let table = NpcBiasTable::from_toml_str(toml).unwrap();
        let biases = table.bias_for("Captain Aldric").unwrap();
        assert_eq!(biases.get(&Domain::Body), Some(&2));
        assert_eq!(biases.get(&Domain::Mind), Some(&-1));
    }
}
