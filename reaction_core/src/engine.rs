//! Reaction engine - the facade the API layer calls once per player turn.
//!
//! One call to [`ReactionEngine::process_player_action`] runs the whole
//! pipeline: detect tags from the action text, infer the domains they
//! exercise, accumulate the shadow profile and growth ledger, score NPC
//! affinity, and ask the narrative bridge for dialogue. The character sheet
//! is loaded once at the start and saved once at the end.

use chrono::Utc;
use serde::Serialize;

use crate::affinity::{affinity, dominant_domains, NpcBiasTable};
use crate::bridge::{EncounterContext, NarrativeBridge};
use crate::detector::{detect_tags, infer_domains};
use crate::errors::CoreError;
use crate::lexicon::TagLexicon;
use crate::store::CharacterStore;
use domain_rules::{
    CharacterId, CharacterSheet, Domain, DomainLedgerEntry, GrowthConfig, ShadowProfile, Tag,
};

/// How many dominant domains an encounter reports to the bridge.
const ENCOUNTER_TOP_DOMAINS: usize = 2;

/// What one processed player action produced, shaped for the API layer.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub detected_tags: Vec<String>,
    pub inferred_domains: Vec<Domain>,
    pub dominant_domains: Vec<Domain>,
    pub first_encounter: bool,
    pub affinity: i64,
    pub npc_response: String,
}

/// The engine: immutable configuration plus a persistence port and the
/// narrative bridge.
pub struct ReactionEngine<S: CharacterStore> {
    lexicon: TagLexicon,
    biases: NpcBiasTable,
    growth: GrowthConfig,
    bridge: NarrativeBridge,
    store: S,
}

impl<S: CharacterStore> ReactionEngine<S> {
    /// Create an engine. Growth tuning is validated up front so a bad config
    /// fails at startup rather than mid-turn.
    pub fn new(
        lexicon: TagLexicon,
        biases: NpcBiasTable,
        growth: GrowthConfig,
        bridge: NarrativeBridge,
        store: S,
    ) -> Result<Self, CoreError> {
        growth.validate()?;
        Ok(Self {
            lexicon,
            biases,
            growth,
            bridge,
            store,
        })
    }

    /// Load a character's sheet, lazily creating an all-zero one.
    fn load_or_init(&self, character: CharacterId) -> Result<CharacterSheet, CoreError> {
        Ok(self
            .store
            .load(character)?
            .unwrap_or_else(|| CharacterSheet::new(character, &self.growth)))
    }

    /// Process one free-text player action aimed at an NPC.
    ///
    /// The narrated action counts as a successful usage of every inferred
    /// domain; callers that resolve success separately (e.g. combat) feed the
    /// ledger through [`ReactionEngine::record_domain_usage`] instead.
    pub fn process_player_action(
        &mut self,
        character: CharacterId,
        npc: &str,
        action_text: &str,
    ) -> Result<ActionOutcome, CoreError> {
        let mut sheet = self.load_or_init(character)?;
        let now = Utc::now();

        let detected = detect_tags(&self.lexicon, action_text);
        let domains = infer_domains(&self.lexicon, &detected);

        sheet.profile = sheet.profile.record_tags(&detected);
        for &domain in &domains {
            sheet.profile = sheet
                .profile
                .apply_action(domain, 1)
                .record_time_usage(domain, 1);
            sheet.ledger = sheet
                .ledger
                .record_usage(domain, action_text, true, &self.growth, now);
        }

        // Adopt newly exercised tags from the lexicon and feed their xp track.
        for name in &detected {
            if let Some(entry) = self.lexicon.get(name) {
                if !sheet.tags.contains(name) {
                    sheet.tags.adopt(
                        Tag::new(name.clone(), entry.category, entry.domains.iter().copied())
                            .with_description(format!("Learned by doing: {name}")),
                    )?;
                }
                sheet.tags.grant_xp(name, 1);
            }
        }

        let first_encounter = !sheet.has_met(npc);
        let dominant = dominant_domains(&sheet.profile, ENCOUNTER_TOP_DOMAINS);
        let affinity_score = affinity(&self.biases, npc, &sheet.profile);

        let context = EncounterContext {
            npc_name: npc.to_string(),
            first_encounter,
            detected_tags: detected.clone(),
            dominant_domains: dominant.clone(),
            affinity: affinity_score,
            bias_summary: self.biases.describe(npc),
            action_text: action_text.to_string(),
        };
        let npc_response = self.bridge.npc_response(&context);

        sheet.met_npcs.insert(npc.to_string());
        self.store.save(character, &sheet)?;

        Ok(ActionOutcome {
            detected_tags: detected,
            inferred_domains: domains.into_iter().collect(),
            dominant_domains: dominant,
            first_encounter,
            affinity: affinity_score,
            npc_response,
        })
    }

    /// Top-N domains by usage for a character. A character with no sheet yet
    /// reads as all-zero.
    pub fn dominant_domains(
        &self,
        character: CharacterId,
        top_n: usize,
    ) -> Result<Vec<Domain>, CoreError> {
        let profile = self
            .store
            .load_profile(character)?
            .unwrap_or_else(ShadowProfile::new);
        Ok(dominant_domains(&profile, top_n))
    }

    /// Signed affinity of an NPC toward a character.
    pub fn affinity(&self, character: CharacterId, npc: &str) -> Result<i64, CoreError> {
        let profile = self
            .store
            .load_profile(character)?
            .unwrap_or_else(ShadowProfile::new);
        Ok(affinity(&self.biases, npc, &profile))
    }

    /// Feed the growth ledger directly, bypassing text detection. Returns the
    /// updated entry so the caller can check for pending level-ups.
    pub fn record_domain_usage(
        &mut self,
        character: CharacterId,
        domain: Domain,
        action: &str,
        success: bool,
    ) -> Result<DomainLedgerEntry, CoreError> {
        let mut sheet = self.load_or_init(character)?;

        sheet.ledger = sheet
            .ledger
            .record_usage(domain, action, success, &self.growth, Utc::now());
        sheet.profile = sheet.profile.apply_action(domain, 1).record_time_usage(domain, 1);

        let entry = sheet.ledger.entry(domain).clone();
        self.store.save(character, &sheet)?;
        Ok(entry)
    }

    /// Apply banked level-ups for one domain - the moment the visible stat
    /// actually changes. Returns the updated entry.
    pub fn apply_pending_level_ups(
        &mut self,
        character: CharacterId,
        domain: Domain,
    ) -> Result<DomainLedgerEntry, CoreError> {
        let mut sheet = self.load_or_init(character)?;

        sheet.ledger = sheet.ledger.apply_pending_level_ups(domain, &self.growth);

        let entry = sheet.ledger.entry(domain).clone();
        self.store.save(character, &sheet)?;
        Ok(entry)
    }

    /// The explicit "new game" action: discard the shadow profile and start
    /// accumulating from zero. The ledger and owned tags persist for the life
    /// of the character.
    pub fn reset_profile(&mut self, character: CharacterId) -> Result<(), CoreError> {
        let mut sheet = self.load_or_init(character)?;
        sheet.profile = ShadowProfile::new();
        self.store.save(character, &sheet)?;
        Ok(())
    }

    /// The lexicon this engine detects against.
    pub fn lexicon(&self) -> &TagLexicon {
        &self.lexicon
    }

    /// The bias table this engine scores against.
    pub fn bias_table(&self) -> &NpcBiasTable {
        &self.biases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::TextGenerator;
    use crate::errors::RemoteServiceError;
    use crate::store::MemoryStore;
    use std::time::Duration;

    struct ScriptedGenerator(&'static str);

    impl TextGenerator for ScriptedGenerator {
        fn generate(&self, _prompt: &str, _timeout: Duration) -> Result<String, RemoteServiceError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn generate(&self, _prompt: &str, timeout: Duration) -> Result<String, RemoteServiceError> {
            Err(RemoteServiceError::Timeout(timeout))
        }
    }

    fn engine_with(generator: Box<dyn TextGenerator>) -> ReactionEngine<MemoryStore> {
        ReactionEngine::new(
            TagLexicon::standard(),
            NpcBiasTable::standard(),
            GrowthConfig::default(),
            NarrativeBridge::new(generator),
            MemoryStore::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_growth_config_rejected_at_startup() {
        let bad = GrowthConfig {
            points_per_success: 0,
            ..GrowthConfig::default()
        };
        let result = ReactionEngine::new(
            TagLexicon::standard(),
            NpcBiasTable::standard(),
            bad,
            NarrativeBridge::new(Box::new(ScriptedGenerator("hello"))),
            MemoryStore::new(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_process_action_accumulates_profile() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("\"Well struck,\" he says.")));
        let character = CharacterId::new();

        let outcome = engine
            .process_player_action(character, "Captain Aldric", "I strike at the training dummy")
            .unwrap();

        assert!(outcome.detected_tags.contains(&"strike".to_string()));
        assert!(outcome.inferred_domains.contains(&Domain::Body));
        assert_eq!(outcome.npc_response, "\"Well struck,\" he says.");

        let profile = engine.store.load_profile(character).unwrap().unwrap();
        assert_eq!(profile.domain_usage[Domain::Body], 1);
        assert_eq!(profile.recent_tags[0], "strike");

        let sheet = engine.store.load(character).unwrap().unwrap();
        assert_eq!(sheet.ledger.entry(Domain::Body).usage_count, 1);
        assert!(sheet.tags.contains("strike"));
    }

    #[test]
    fn test_first_encounter_flips_after_meeting() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("...")));
        let character = CharacterId::new();

        let first = engine
            .process_player_action(character, "Mother Wren", "I pray at the shrine")
            .unwrap();
        assert!(first.first_encounter);

        let second = engine
            .process_player_action(character, "Mother Wren", "I pray again")
            .unwrap();
        assert!(!second.first_encounter);
    }

    #[test]
    fn test_action_with_no_tags_still_answers() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("\"Hm,\" she says.")));
        let character = CharacterId::new();

        let outcome = engine
            .process_player_action(character, "Archivist Lyra", "zzz qqq")
            .unwrap();

        assert!(outcome.detected_tags.is_empty());
        assert!(outcome.inferred_domains.is_empty());
        assert!(!outcome.npc_response.is_empty());
        // Dominant domains still report: all-zero ties resolve canonically.
        assert_eq!(outcome.dominant_domains, vec![Domain::Body, Domain::Mind]);
    }

    #[test]
    fn test_remote_failure_never_escapes() {
        let mut engine = engine_with(Box::new(FailingGenerator));
        let character = CharacterId::new();

        let outcome = engine
            .process_player_action(character, "Guildmaster Odo", "I hammer the blade at the forge")
            .unwrap();

        assert!(!outcome.npc_response.is_empty());
        assert!(outcome.npc_response.contains("Guildmaster Odo"));
    }

    #[test]
    fn test_affinity_builds_over_repeated_play() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("...")));
        let character = CharacterId::new();

        // Ten study actions: Mind usage 10, one affinity bucket.
        for _ in 0..10 {
            engine
                .process_player_action(character, "Archivist Lyra", "I study the archives")
                .unwrap();
        }

        // Lyra weights Mind at +2.
        assert_eq!(engine.affinity(character, "Archivist Lyra").unwrap(), 2);
        assert_eq!(
            engine.dominant_domains(character, 1).unwrap(),
            vec![Domain::Mind]
        );
    }

    #[test]
    fn test_two_phase_level_up_through_engine() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("...")));
        let character = CharacterId::new();

        for i in 0..10 {
            let entry = engine
                .record_domain_usage(character, Domain::Craft, &format!("forge {i}"), true)
                .unwrap();
            assert_eq!(entry.value, 0);
        }

        let sheet = engine.store.load(character).unwrap().unwrap();
        assert!(sheet.ledger.entry(Domain::Craft).has_pending_level_ups());

        let entry = engine
            .apply_pending_level_ups(character, Domain::Craft)
            .unwrap();
        assert_eq!(entry.value, 1);
        assert!(!entry.has_pending_level_ups());
    }

    #[test]
    fn test_failed_usage_grows_nothing() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("...")));
        let character = CharacterId::new();

        let entry = engine
            .record_domain_usage(character, Domain::Body, "slip off the wall", false)
            .unwrap();

        assert_eq!(entry.usage_count, 1);
        assert_eq!(entry.growth_points, 0);
    }

    #[test]
    fn test_reset_profile_keeps_ledger_and_tags() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("...")));
        let character = CharacterId::new();

        engine
            .process_player_action(character, "Guildmaster Odo", "I temper the blade at the anvil")
            .unwrap();
        engine.reset_profile(character).unwrap();

        let sheet = engine.store.load(character).unwrap().unwrap();
        assert_eq!(sheet.profile.total_usage(), 0);
        assert!(sheet.profile.recent_tags.is_empty());
        // Lifetime progression survives the profile reset.
        assert_eq!(sheet.ledger.entry(Domain::Craft).usage_count, 1);
        assert!(sheet.tags.contains("smithing"));
    }

    #[test]
    fn test_missing_character_reads_as_zero() {
        let engine = engine_with(Box::new(ScriptedGenerator("...")));
        let nobody = CharacterId::new();

        assert_eq!(engine.affinity(nobody, "Mother Wren").unwrap(), 0);
        assert_eq!(
            engine.dominant_domains(nobody, 2).unwrap(),
            vec![Domain::Body, Domain::Mind]
        );
    }

    #[test]
    fn test_outcome_serializes_for_api_layer() {
        let mut engine = engine_with(Box::new(ScriptedGenerator("\"Good form.\"")));
        let character = CharacterId::new();

        let outcome = engine
            .process_player_action(character, "Captain Aldric", "I parry and strike")
            .unwrap();

        let json: serde_json::Value = serde_json::to_value(&outcome).unwrap();
        assert!(json["detected_tags"].is_array());
        assert_eq!(json["npc_response"], "\"Good form.\"");
    }
}
