//! Shadow profile - a rolling record of how a character actually plays.
//!
//! The profile is never reset outside an explicit "new game" action, and is
//! mutated only through the pure accumulation functions here. The
//! all-seven-domains invariant is carried by [`DomainMap`] at the type level.

use serde::{Deserialize, Serialize};

use crate::domains::{Domain, DomainMap};
use crate::errors::RulesError;

/// Maximum number of entries kept in [`ShadowProfile::recent_tags`].
pub const RECENT_TAG_CAP: usize = 10;

/// Time-bucketed usage counters.
///
/// Each bucket accumulates independently. Decay and periodic reset belong to
/// an external scheduler; this core only ever increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TimeTracking {
    pub recent: DomainMap<u32>,
    pub weekly: DomainMap<u32>,
    pub monthly: DomainMap<u32>,
}

/// A character's accumulated domain usage and recent tag history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShadowProfile {
    /// Lifetime usage counter per domain.
    pub domain_usage: DomainMap<u32>,

    /// Detected tag names, most recent first, capped at [`RECENT_TAG_CAP`].
    /// Duplicates are kept: repetition is a legitimate specialization signal.
    pub recent_tags: Vec<String>,

    /// Time-bucketed usage, reset externally.
    pub time_tracking: TimeTracking,

    /// Slower-moving affinity signal, distinct from raw usage. Player-declared
    /// or inferred by the host; this core only stores and adjusts it.
    pub preferences: DomainMap<i32>,
}

impl ShadowProfile {
    /// Create an all-zero profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a domain's usage counter. Pure; every other counter and
    /// field is carried over unchanged.
    pub fn apply_action(&self, domain: Domain, amount: u32) -> ShadowProfile {
        let mut next = self.clone();
        next.domain_usage[domain] += amount;
        next
    }

    /// Increment the recent/weekly/monthly buckets for a domain. Pure.
    pub fn record_time_usage(&self, domain: Domain, amount: u32) -> ShadowProfile {
        let mut next = self.clone();
        next.time_tracking.recent[domain] += amount;
        next.time_tracking.weekly[domain] += amount;
        next.time_tracking.monthly[domain] += amount;
        next
    }

    /// Prepend newly detected tags (best-first order preserved) and truncate
    /// to the cap. Pure.
    pub fn record_tags(&self, detected: &[String]) -> ShadowProfile {
        let mut next = self.clone();
        let mut recent = Vec::with_capacity(RECENT_TAG_CAP);
        recent.extend(detected.iter().cloned());
        recent.extend(next.recent_tags.drain(..));
        recent.truncate(RECENT_TAG_CAP);
        next.recent_tags = recent;
        next
    }

    /// Shift a preference weight. Pure.
    pub fn adjust_preference(&self, domain: Domain, delta: i32) -> ShadowProfile {
        let mut next = self.clone();
        next.preferences[domain] += delta;
        next
    }

    /// Lifetime usage summed across all domains.
    pub fn total_usage(&self) -> u64 {
        self.domain_usage.iter().map(|(_, v)| *v as u64).sum()
    }

    /// Parse a serialized profile, rejecting input that violates the
    /// all-seven-domains invariant instead of silently coercing it.
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        serde_json::from_str(json).map_err(|e| RulesError::MalformedProfile(e.to_string()))
    }
}
