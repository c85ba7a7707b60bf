//! State store types for battle tracking

mod creature;
mod field;
mod roster;

pub use creature::{CreatureId, CreatureState, LastDamage, Profile, same_base_species};
pub use field::{FieldLog, FieldMention, FieldScope};
pub use roster::TeamRoster;
