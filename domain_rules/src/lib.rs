//! # Domain Rules
//!
//! The "Character Bible" crate - domains, growth tiers, skill tags, the
//! growth ledger, and the shadow profile. This crate is the single source of
//! truth for character progression state and contains no engine or I/O logic.
//!
//! Everything here is a pure, synchronous transformation over in-memory
//! values: accumulation functions take state by reference and return updated
//! state, so the host can serialize load-mutate-save around a character
//! without any locking inside the core.

pub mod character;
pub mod domains;
pub mod errors;
pub mod ledger;
pub mod profile;
pub mod tags;

pub use character::*;
pub use domains::*;
pub use errors::*;
pub use ledger::*;
pub use profile::*;
pub use tags::*;
