//! Growth ledger - per-domain progression as a two-phase state machine.
//!
//! Phase one ([`DomainLedgerEntry::record_usage`]) accumulates growth points
//! and banks threshold crossings as pending level-ups. Phase two
//! ([`DomainLedgerEntry::apply_pending_level_ups`]) raises the visible value.
//! The split lets the caller choose the narrative moment at which a level-up
//! is revealed to the player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::{Domain, DomainMap, GrowthTier};
use crate::errors::RulesError;

/// Tuning for domain growth. Balance numbers live here, not in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Growth points granted per successful action.
    pub points_per_success: u32,

    /// Points needed to gain a level while in each tier, in
    /// Novice..Paragon order. Must be non-decreasing.
    pub tier_thresholds: [u32; 5],
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            points_per_success: 1,
            tier_thresholds: [10, 20, 35, 60, 100],
        }
    }
}

impl GrowthConfig {
    /// Check the configuration invariants: a positive per-success grant and
    /// thresholds that never decrease from one tier to the next.
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.points_per_success == 0 {
            return Err(RulesError::InvalidGrowthConfig(
                "points_per_success must be at least 1".to_string(),
            ));
        }
        if self.tier_thresholds.iter().any(|&t| t == 0) {
            return Err(RulesError::InvalidGrowthConfig(
                "tier thresholds must be at least 1".to_string(),
            ));
        }
        if self.tier_thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(RulesError::InvalidGrowthConfig(
                "tier thresholds must be non-decreasing".to_string(),
            ));
        }
        Ok(())
    }

    /// Points required to level up from the given domain value.
    /// Non-decreasing in `value` whenever [`GrowthConfig::validate`] passes.
    pub fn required_for(&self, value: u32) -> u32 {
        self.tier_thresholds[GrowthTier::from_value(value) as usize]
    }
}

/// One entry in a domain's append-only growth audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthLogEntry {
    pub date: DateTime<Utc>,
    pub domain: Domain,
    pub action: String,
    pub success: bool,
}

/// Lifetime progression state for one character in one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLedgerEntry {
    pub domain: Domain,

    /// Current proficiency. Only ever incremented, and only by
    /// [`DomainLedgerEntry::apply_pending_level_ups`].
    pub value: u32,

    /// Progress toward the next value.
    pub growth_points: u32,

    /// Threshold for the next value, derived from [`GrowthConfig`].
    pub growth_required: u32,

    /// Lifetime uses, successful or not.
    pub usage_count: u64,

    /// Threshold crossings banked but not yet applied to `value`.
    pub level_ups_required: u32,

    /// Append-only audit trail. Never mutated after insertion; retention is
    /// the persistence layer's concern.
    pub growth_log: Vec<GrowthLogEntry>,
}

impl DomainLedgerEntry {
    /// Create a fresh entry at value zero.
    pub fn new(domain: Domain, config: &GrowthConfig) -> Self {
        Self {
            domain,
            value: 0,
            growth_points: 0,
            growth_required: config.required_for(0),
            usage_count: 0,
            level_ups_required: 0,
            growth_log: Vec::new(),
        }
    }

    /// Record one action against this domain. Pure; returns the updated entry.
    ///
    /// Usage always counts; growth points are only granted on success.
    /// Threshold crossings are banked with carry-over: overflow points roll
    /// into progress toward the next level instead of being discarded.
    pub fn record_usage(
        &self,
        action: impl Into<String>,
        success: bool,
        config: &GrowthConfig,
        date: DateTime<Utc>,
    ) -> DomainLedgerEntry {
        let mut next = self.clone();
        next.usage_count += 1;
        next.growth_log.push(GrowthLogEntry {
            date,
            domain: self.domain,
            action: action.into(),
            success,
        });

        if success {
            next.growth_points += config.points_per_success;
            while next.growth_points >= next.growth_required {
                next.growth_points -= next.growth_required;
                next.level_ups_required += 1;
                // The next threshold is priced at the value the domain will
                // reach once pending level-ups are applied.
                next.growth_required = config.required_for(next.value + next.level_ups_required);
            }
        }

        next
    }

    /// Apply all banked level-ups, raising the visible value. Pure; returns
    /// the updated entry.
    pub fn apply_pending_level_ups(&self, config: &GrowthConfig) -> DomainLedgerEntry {
        let mut next = self.clone();
        next.value += next.level_ups_required;
        next.level_ups_required = 0;
        next.growth_required = config.required_for(next.value);
        next
    }

    /// Whether a level-up is banked and waiting to be revealed.
    pub fn has_pending_level_ups(&self) -> bool {
        self.level_ups_required > 0
    }

    /// Tier banding of the current value.
    pub fn tier(&self) -> GrowthTier {
        GrowthTier::from_value(self.value)
    }
}

/// All seven per-domain ledger entries for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainLedger {
    entries: DomainMap<DomainLedgerEntry>,
}

impl DomainLedger {
    /// Create a fresh ledger with all domains at value zero.
    pub fn new(config: &GrowthConfig) -> Self {
        Self {
            entries: DomainMap::from_fn(|domain| DomainLedgerEntry::new(domain, config)),
        }
    }

    /// Get the entry for a domain.
    pub fn entry(&self, domain: Domain) -> &DomainLedgerEntry {
        self.entries.get(domain)
    }

    /// Record one action against a domain. Pure; returns the updated ledger.
    pub fn record_usage(
        &self,
        domain: Domain,
        action: impl Into<String>,
        success: bool,
        config: &GrowthConfig,
        date: DateTime<Utc>,
    ) -> DomainLedger {
        let mut next = self.clone();
        let updated = next.entries.get(domain).record_usage(action, success, config, date);
        next.entries.set(domain, updated);
        next
    }

    /// Apply banked level-ups for one domain. Pure; returns the updated ledger.
    pub fn apply_pending_level_ups(&self, domain: Domain, config: &GrowthConfig) -> DomainLedger {
        let mut next = self.clone();
        let updated = next.entries.get(domain).apply_pending_level_ups(config);
        next.entries.set(domain, updated);
        next
    }

    /// Iterate over `(Domain, entry)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Domain, &DomainLedgerEntry)> {
        self.entries.iter()
    }
}
