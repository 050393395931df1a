//! # Reaction Core (Undercurrent)
//!
//! The engine that turns free-text player actions into progression signals
//! and NPC reactions. This crate interfaces with `domain_rules`, detects
//! skill tags from action text, infers the domains they exercise, scores NPC
//! affinity against a character's shadow profile, and assembles dialogue
//! through the narrative bridge.
//!
//! ## Core Components
//!
//! - **lexicon**: static keyword tag lexicon, loaded once at startup
//! - **detector**: free-text tag detection and domain inference
//! - **affinity**: NPC bias tables, dominant domains, affinity scoring
//! - **bridge**: boundary to the external text-generation service, with a
//!   deterministic local fallback
//! - **store**: persistence port for character sheets
//! - **engine**: the facade the API layer calls per player turn
//!
//! ## Design Philosophy
//!
//! - **Pure pipeline**: text -> tags -> domains -> profile -> affinity is a
//!   chain of deterministic functions over in-memory values
//! - **One fallible edge**: only the narrative bridge talks to the network,
//!   and its failures never escape as player-visible errors
//! - **Explicit configuration**: lexicons, bias tables, and growth tuning are
//!   data passed in at construction, never ambient global state

pub mod affinity;
pub mod bridge;
pub mod detector;
pub mod engine;
pub mod errors;
pub mod lexicon;
pub mod store;

pub use affinity::*;
pub use bridge::*;
pub use detector::*;
pub use engine::*;
pub use errors::*;
pub use lexicon::*;
pub use store::*;
