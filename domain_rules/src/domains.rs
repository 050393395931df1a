//! Domain definitions - the seven capability axes of a character.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::errors::RulesError;

/// The seven capability axes every character is measured along.
///
/// This set is closed: it is never extended at runtime, and every
/// domain-keyed map carries exactly one entry per variant. Rankings that tie
/// resolve to the order of [`Domain::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Body,
    Mind,
    Spirit,
    Social,
    Craft,
    Authority,
    Awareness,
}

impl Domain {
    /// All domains in canonical enumeration order.
    pub const ALL: [Domain; 7] = [
        Domain::Body,
        Domain::Mind,
        Domain::Spirit,
        Domain::Social,
        Domain::Craft,
        Domain::Authority,
        Domain::Awareness,
    ];

    /// Human-readable name of the domain.
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Body => "Body",
            Domain::Mind => "Mind",
            Domain::Spirit => "Spirit",
            Domain::Social => "Social",
            Domain::Craft => "Craft",
            Domain::Authority => "Authority",
            Domain::Awareness => "Awareness",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Domain {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| RulesError::UnknownDomain(s.to_string()))
    }
}

/// Human-readable banding of a domain value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthTier {
    Novice,
    Skilled,
    Expert,
    Master,
    Paragon,
}

impl GrowthTier {
    /// Band a raw domain value into its tier.
    pub fn from_value(value: u32) -> Self {
        match value {
            0..=2 => GrowthTier::Novice,
            3..=4 => GrowthTier::Skilled,
            5..=7 => GrowthTier::Expert,
            8..=9 => GrowthTier::Master,
            _ => GrowthTier::Paragon,
        }
    }

    /// Human-readable name of the tier.
    pub fn name(&self) -> &'static str {
        match self {
            GrowthTier::Novice => "Novice",
            GrowthTier::Skilled => "Skilled",
            GrowthTier::Expert => "Expert",
            GrowthTier::Master => "Master",
            GrowthTier::Paragon => "Paragon",
        }
    }
}

impl std::fmt::Display for GrowthTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A map with exactly one value per [`Domain`].
///
/// Backing storage is a fixed array indexed by variant order, so keys can
/// never be missing, duplicated, or sparse. It serializes as a mapping with
/// all seven keys present, and deserialization rejects input that omits or
/// repeats a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainMap<T> {
    values: [T; 7],
}

impl<T> DomainMap<T> {
    /// Build a map by evaluating `f` once per domain, in canonical order.
    pub fn from_fn(mut f: impl FnMut(Domain) -> T) -> Self {
        Self {
            values: Domain::ALL.map(|d| f(d)),
        }
    }

    /// Get the value for a domain.
    pub fn get(&self, domain: Domain) -> &T {
        &self.values[domain as usize]
    }

    /// Get the value for a domain mutably.
    pub fn get_mut(&mut self, domain: Domain) -> &mut T {
        &mut self.values[domain as usize]
    }

    /// Replace the value for a domain, returning the old value.
    pub fn set(&mut self, domain: Domain, value: T) -> T {
        std::mem::replace(self.get_mut(domain), value)
    }

    /// Iterate over `(Domain, &T)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Domain, &T)> {
        Domain::ALL.iter().copied().zip(self.values.iter())
    }
}

impl<T: Copy> DomainMap<T> {
    /// Build a map holding the same value for every domain.
    pub fn uniform(value: T) -> Self {
        Self { values: [value; 7] }
    }
}

impl<T: Default> Default for DomainMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> Index<Domain> for DomainMap<T> {
    type Output = T;

    fn index(&self, domain: Domain) -> &T {
        self.get(domain)
    }
}

impl<T> IndexMut<Domain> for DomainMap<T> {
    fn index_mut(&mut self, domain: Domain) -> &mut T {
        self.get_mut(domain)
    }
}

impl<T: Serialize> Serialize for DomainMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (domain, value) in self.iter() {
            map.serialize_entry(&domain, value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DomainMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DomainMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for DomainMapVisitor<T> {
            type Value = DomainMap<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map with one entry per domain")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut slots: [Option<T>; 7] = std::array::from_fn(|_| None);

                while let Some(domain) = access.next_key::<Domain>()? {
                    let slot = &mut slots[domain as usize];
                    if slot.is_some() {
                        return Err(de::Error::custom(format!("duplicate domain key {domain}")));
                    }
                    *slot = Some(access.next_value()?);
                }

                let mut values = Vec::with_capacity(7);
                for (slot, domain) in slots.into_iter().zip(Domain::ALL) {
                    match slot {
                        Some(value) => values.push(value),
                        None => {
                            return Err(de::Error::custom(format!("missing domain key {domain}")))
                        }
                    }
                }

                let values: [T; 7] = values
                    .try_into()
                    .map_err(|_| de::Error::custom("expected exactly seven domain entries"))?;
                Ok(DomainMap { values })
            }
        }

        deserializer.deserialize_map(DomainMapVisitor(PhantomData))
    }
}
