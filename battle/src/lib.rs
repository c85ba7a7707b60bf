//! Creature identity resolution and battle simulation for Pokemon Showdown replays.
//!
//! # Overview
//!
//! `scout-battle` sits between `scout-protocol` (line format) and the replay
//! pipeline:
//!
//! ```text
//! scout-protocol (commands + typed events)
//!        │
//!        ▼
//! scout-battle (identity + simulation + report) ← THIS CRATE
//!        │
//!        ├─> scout-replay (source normalization, full pipeline)
//!        └─> scout-calc (damage calculator input)
//! ```
//!
//! # Main Types
//!
//! - [`Simulation`] - Replays a command stream, one command at a time
//! - [`StateStore`] - Arena of [`CreatureState`]s and [`TeamRoster`]s for one run
//! - [`BattleMetadata`] - Format, players, rating and outcome
//! - [`BattleReport`] - Serializable result keyed by "p1:Nickname"
//!
//! # Example Usage
//!
//! ```ignore
//! use scout_battle::simulate;
//! use scout_protocol::parse_log;
//!
//! let stream = parse_log(log.lines());
//! let report = simulate(&stream)?;
//!
//! for (key, record) in &report.pokemon {
//!     println!("{key}: {} KOs, {} deaths", record.knockouts, record.deaths);
//! }
//! ```

mod error;
pub mod metadata;
pub mod report;
pub mod tracking;
pub mod types;

pub use error::SimulationError;
pub use metadata::{BattleMetadata, extract_metadata};
pub use report::{Anomaly, BattleReport, PokemonRecord};
pub use tracking::{Flow, Simulation, StateStore, simulate};
pub use types::{
    CreatureId, CreatureState, FieldLog, FieldMention, FieldScope, LastDamage, Profile, TeamRoster,
};

// Re-export commonly used protocol types
pub use scout_protocol::{Gender, Outcome, Player};
