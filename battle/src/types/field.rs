//! Field condition mentions
//!
//! Weather, terrain and side conditions are not simulated. The log's
//! announcements of them are kept in order so a reader can see what was up
//! during which turn.

use scout_protocol::Player;
use serde::Serialize;

/// Where a condition applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldScope {
    Weather,
    Field,
    Side(Player),
}

/// One announcement of a field condition starting or ending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMention {
    pub turn: u32,
    pub scope: FieldScope,
    pub condition: String,
    pub started: bool,
}

/// Ordered list of field mentions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldLog {
    mentions: Vec<FieldMention>,
}

impl FieldLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a weather announcement; "none" ends the weather
    ///
    /// Upkeep reminders repeat the current weather and are not recorded.
    pub fn weather(&mut self, turn: u32, weather: &str, upkeep: bool) {
        if upkeep {
            return;
        }

        let started = !weather.eq_ignore_ascii_case("none") && !weather.is_empty();
        self.push(turn, FieldScope::Weather, weather, started);
    }

    pub fn field(&mut self, turn: u32, condition: &str, started: bool) {
        self.push(turn, FieldScope::Field, condition, started);
    }

    pub fn side(&mut self, turn: u32, side: Player, condition: &str, started: bool) {
        self.push(turn, FieldScope::Side(side), condition, started);
    }

    fn push(&mut self, turn: u32, scope: FieldScope, condition: &str, started: bool) {
        // Strip common prefixes
        let condition = condition.strip_prefix("move: ").unwrap_or(condition);

        self.mentions.push(FieldMention {
            turn,
            scope,
            condition: condition.to_string(),
            started,
        });
    }

    pub fn mentions(&self) -> &[FieldMention] {
        &self.mentions
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }
}
