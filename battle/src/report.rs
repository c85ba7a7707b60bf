//! Battle report assembly

use indexmap::IndexMap;
use scout_protocol::{Gender, Player};
use serde::Serialize;

use crate::metadata::BattleMetadata;
use crate::tracking::StateStore;
use crate::types::{CreatureState, FieldMention};

/// Something in the log that contradicts the tracked state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub turn: u32,
    pub message: String,
}

/// Per-creature summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonRecord {
    pub name: String,
    pub species: String,
    pub level: u8,
    pub gender: Gender,
    pub moves: Vec<String>,
    pub ability: Option<String>,
    pub item: Option<String>,
    pub last_known_item: Option<String>,
    pub hp_current: Option<u32>,
    pub hp_max: Option<u32>,
    pub knockouts: u32,
    pub deaths: u32,
    pub kd_ratio: f64,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub move_kills: IndexMap<String, u32>,
}

impl PokemonRecord {
    pub fn from_state(creature: &CreatureState) -> Self {
        Self {
            name: creature.name().to_string(),
            species: creature.profile.species.clone(),
            level: creature.profile.level,
            gender: creature.profile.gender,
            moves: creature.known_moves.clone(),
            ability: creature.known_ability.clone(),
            item: creature.known_item.clone(),
            last_known_item: creature.last_known_item.clone(),
            hp_current: creature.hp_current,
            hp_max: creature.hp_max,
            knockouts: creature.knockouts,
            deaths: creature.deaths,
            kd_ratio: round2(creature.kd_ratio()),
            damage_dealt: creature.damage_dealt,
            damage_taken: creature.damage_taken,
            move_kills: creature.move_kills.clone(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Everything reconstructed from one battle log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    /// Keyed "p1:Nickname"; repeated keys get a "#2", "#3"... suffix
    pub pokemon: IndexMap<String, PokemonRecord>,

    /// Species per player, in roster order
    pub teams: IndexMap<String, Vec<String>>,

    pub metadata: BattleMetadata,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field: Vec<FieldMention>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<Anomaly>,
}

impl BattleReport {
    /// Build a report from the final state; nothing is mutated
    pub fn assemble(
        store: &StateStore,
        metadata: BattleMetadata,
        field: &[FieldMention],
        anomalies: &[Anomaly],
    ) -> Self {
        let mut pokemon = IndexMap::new();
        let mut teams = IndexMap::new();

        for player in Player::ALL {
            let Some(roster) = store.roster(player) else {
                continue;
            };

            let mut species = Vec::with_capacity(roster.members.len());
            for (_, creature) in store.team(player) {
                let base = format!("{}:{}", player.as_str(), creature.name());
                let mut key = base.clone();
                let mut n = 2;
                while pokemon.contains_key(&key) {
                    key = format!("{base}#{n}");
                    n += 1;
                }

                pokemon.insert(key, PokemonRecord::from_state(creature));
                species.push(creature.profile.species.clone());
            }

            teams.insert(player.as_str().to_string(), species);
        }

        Self {
            pokemon,
            teams,
            metadata,
            field: field.to_vec(),
            anomalies: anomalies.to_vec(),
        }
    }

    /// Look up a record by player and display name
    pub fn get(&self, player: Player, name: &str) -> Option<&PokemonRecord> {
        self.pokemon.get(&format!("{}:{}", player.as_str(), name))
    }
}
