//! Calculator input and output

use scout_battle::CreatureState;
use scout_protocol::Gender;
use serde::{Deserialize, Serialize};

/// Nature with no stat modifiers
pub const NEUTRAL_NATURE: &str = "Serious";

/// One value per stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSpread {
    pub hp: u8,
    pub atk: u8,
    pub def: u8,
    pub spa: u8,
    pub spd: u8,
    pub spe: u8,
}

impl StatSpread {
    pub const fn uniform(value: u8) -> Self {
        Self {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    /// No EV investment
    pub const fn default_evs() -> Self {
        Self::uniform(0)
    }

    /// Perfect IVs
    pub const fn default_ivs() -> Self {
        Self::uniform(31)
    }
}

/// A creature as the calculator sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcPokemon {
    pub species: String,
    pub level: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    pub nature: String,
    pub evs: StatSpread,
    pub ivs: StatSpread,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<String>,
}

impl CalcPokemon {
    /// Bare creature with a neutral nature and default spreads
    pub fn new(species: impl Into<String>, level: u8) -> Self {
        Self {
            species: species.into(),
            level,
            gender: None,
            ability: None,
            item: None,
            nature: NEUTRAL_NATURE.to_string(),
            evs: StatSpread::default_evs(),
            ivs: StatSpread::default_ivs(),
            moves: Vec::new(),
        }
    }

    /// Everything the log revealed about a tracked creature
    ///
    /// The held item is used when known; otherwise the last item it was seen with.
    pub fn from_creature(creature: &CreatureState) -> Self {
        let gender = match creature.profile.gender {
            Gender::Male => Some("M".to_string()),
            Gender::Female => Some("F".to_string()),
            Gender::Unknown => None,
        };

        Self {
            gender,
            ability: creature.known_ability.clone(),
            item: creature
                .known_item
                .clone()
                .or_else(|| creature.last_known_item.clone()),
            moves: creature.known_moves.clone(),
            ..Self::new(creature.profile.species.clone(), creature.profile.level)
        }
    }
}

/// Field conditions relevant to one calculation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcField {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<String>,
}

/// One attack to evaluate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageRequest {
    pub generation: u8,
    pub attacker: CalcPokemon,
    pub defender: CalcPokemon,
    #[serde(rename = "move")]
    pub move_name: String,
    pub field: CalcField,
}

/// Calculator verdict for one attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageResult {
    /// Every damage roll
    pub damage: Vec<u32>,
    pub damage_range: [u32; 2],
    pub description: String,
    pub ko_chance: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_battle::Profile;
    use scout_protocol::{Player, PokemonDetails};

    #[test]
    fn test_from_creature() {
        let details = PokemonDetails::parse("Garchomp, L50, F");
        let mut creature = CreatureState::new(
            Player::P1,
            Profile::from_details(&details, Some("Chompy")),
        );
        creature.known_ability = Some("Rough Skin".to_string());
        creature.last_known_item = Some("Choice Scarf".to_string());
        creature.known_moves = vec!["Earthquake".to_string()];

        let pokemon = CalcPokemon::from_creature(&creature);

        assert_eq!(pokemon.species, "Garchomp");
        assert_eq!(pokemon.level, 50);
        assert_eq!(pokemon.gender.as_deref(), Some("F"));
        assert_eq!(pokemon.ability.as_deref(), Some("Rough Skin"));
        assert_eq!(pokemon.item.as_deref(), Some("Choice Scarf"));
        assert_eq!(pokemon.nature, NEUTRAL_NATURE);
        assert_eq!(pokemon.evs, StatSpread::uniform(0));
        assert_eq!(pokemon.ivs, StatSpread::uniform(31));
    }

    #[test]
    fn test_request_json() {
        let request = DamageRequest {
            generation: 9,
            attacker: CalcPokemon::new("Garchomp", 100),
            defender: CalcPokemon::new("Rotom-Wash", 100),
            move_name: "Earthquake".to_string(),
            field: CalcField::default(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["move"], "Earthquake");
        assert_eq!(value["attacker"]["nature"], "Serious");
        assert_eq!(value["defender"]["ivs"]["spe"], 31);
        assert_eq!(value["field"], serde_json::json!({}));
    }
}
