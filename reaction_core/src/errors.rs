//! Error types for the reaction engine.

use std::time::Duration;
use thiserror::Error;

use crate::store::StoreError;
use domain_rules::RulesError;

/// Failures of the external text-generation service.
///
/// These are environmental: the bridge absorbs them and degrades to the
/// local fallback, so they never surface to the player-facing flow.
#[derive(Debug, Error)]
pub enum RemoteServiceError {
    /// The service did not answer within the bounded timeout.
    #[error("narrative service timed out after {0:?}")]
    Timeout(Duration),

    /// The service could not be reached.
    #[error("narrative service unreachable: {0}")]
    Unreachable(String),

    /// The service answered with content the bridge cannot use.
    #[error("narrative service returned malformed content: {0}")]
    MalformedResponse(String),
}

/// Top-level error for engine operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A progression-rules invariant was violated.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The persistence backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A lexicon or bias-table configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}
