//! Error types for the rules crate.

use thiserror::Error;

/// Errors raised by the progression rules.
///
/// These indicate a programming or data-integrity bug upstream and propagate
/// to the immediate caller; they are never silently patched over.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A string did not name one of the seven domains.
    #[error("unknown domain name: {0}")]
    UnknownDomain(String),

    /// A tag with this name already exists for the character.
    #[error("tag '{0}' already exists for this character")]
    DuplicateTag(String),

    /// Growth tuning values violate an invariant (e.g. thresholds that
    /// decrease as value rises).
    #[error("invalid growth configuration: {0}")]
    InvalidGrowthConfig(String),

    /// A serialized shadow profile was missing domain keys or otherwise
    /// unreadable.
    #[error("malformed shadow profile: {0}")]
    MalformedProfile(String),
}
