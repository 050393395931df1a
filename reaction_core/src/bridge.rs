//! Narrative bridge - the one boundary that talks to the outside world.
//!
//! The core never generates prose itself. It hands an [`EncounterContext`] to
//! the external text-completion service and expects free-form dialogue back.
//! The remote call is bounded by a timeout, and any failure degrades to a
//! deterministic local fallback assembled from the same context, so a dead
//! service can never crash a player turn.

use std::time::Duration;

use crate::errors::RemoteServiceError;
use domain_rules::Domain;

/// Abstraction over the remote text-completion service.
///
/// Implementations must respect the timeout: return within it or fail with
/// [`RemoteServiceError::Timeout`]. The host owns transport, retries, and
/// async plumbing; the core only sees this synchronous seam.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str, timeout: Duration) -> Result<String, RemoteServiceError>;
}

/// Everything the bridge knows about the moment it narrates.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EncounterContext {
    pub npc_name: String,
    pub first_encounter: bool,
    pub detected_tags: Vec<String>,
    pub dominant_domains: Vec<Domain>,
    pub affinity: i64,
    /// Summary of the NPC's leanings, from [`crate::NpcBiasTable::describe`].
    pub bias_summary: String,
    pub action_text: String,
}

impl EncounterContext {
    /// Format the context as a prompt for the text-generation service.
    pub fn to_prompt_string(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Player Action\n");
        prompt.push_str(&self.action_text);
        prompt.push_str("\n\n");

        prompt.push_str("## Encounter\n");
        prompt.push_str(&format!(
            "NPC: {}{}\n",
            self.npc_name,
            if self.first_encounter {
                " (first meeting)"
            } else {
                ""
            }
        ));
        prompt.push_str(&format!("Disposition: {}\n", self.bias_summary));
        prompt.push_str(&format!("Affinity score: {}\n", self.affinity));
        prompt.push('\n');

        prompt.push_str("## Character Read\n");
        prompt.push_str(&format!(
            "Dominant domains: {}\n",
            self.dominant_domains
                .iter()
                .map(|d| d.name())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        if !self.detected_tags.is_empty() {
            prompt.push_str(&format!("Action tags: {}\n", self.detected_tags.join(", ")));
        }
        prompt.push('\n');

        prompt.push_str(&format!(
            "Respond with {}'s in-character dialogue only.\n",
            self.npc_name
        ));
        prompt
    }
}

/// Flavor phrase an NPC would use to describe a domain-heavy play style.
fn style_phrase(domain: Domain) -> &'static str {
    match domain {
        Domain::Body => "a fighter's directness",
        Domain::Mind => "a scholar's calculation",
        Domain::Spirit => "a quiet devotion",
        Domain::Social => "an easy charm",
        Domain::Craft => "a maker's patience",
        Domain::Authority => "a commander's bearing",
        Domain::Awareness => "a watcher's caution",
    }
}

/// Deterministic local response derived only from the encounter context.
///
/// Always non-empty; this is the guarantee that keeps remote failures
/// invisible to the player.
pub fn fallback_response(context: &EncounterContext) -> String {
    let tone = if context.affinity > 0 {
        "warmly"
    } else if context.affinity < 0 {
        "coolly"
    } else {
        "evenly"
    };

    let style = context
        .dominant_domains
        .first()
        .map(|d| style_phrase(*d))
        .unwrap_or("an unreadable air");

    if context.first_encounter {
        format!(
            "{} studies you {}. \"I don't believe we've met. You carry yourself with {}.\"",
            context.npc_name, tone, style
        )
    } else {
        format!(
            "{} nods {}. \"Back again, and still leading with {}, I see.\"",
            context.npc_name, tone, style
        )
    }
}

/// The bridge: prompt assembly, the bounded remote call, and the fallback.
pub struct NarrativeBridge {
    generator: Box<dyn TextGenerator>,
    timeout: Duration,
}

impl NarrativeBridge {
    /// Default bound on the remote call.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a bridge over a generator with the default timeout.
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self::with_timeout(generator, Self::DEFAULT_TIMEOUT)
    }

    /// Create a bridge with an explicit timeout bound.
    pub fn with_timeout(generator: Box<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Produce the NPC's dialogue for an encounter. Never fails: remote
    /// errors and unusable responses are logged and replaced by the local
    /// fallback.
    pub fn npc_response(&self, context: &EncounterContext) -> String {
        let prompt = context.to_prompt_string();

        match self.generator.generate(&prompt, self.timeout) {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::warn!(
                    "narrative service returned empty dialogue for {}, using fallback",
                    context.npc_name
                );
                fallback_response(context)
            }
            Err(err) => {
                log::warn!(
                    "narrative service failed for {}: {err}, using fallback",
                    context.npc_name
                );
                fallback_response(context)
            }
        }
    }
}
