//! Creature state types

use indexmap::IndexMap;
use scout_protocol::{Gender, HpStatus, Player, PokemonDetails};

/// Stable handle for one creature within one simulation run
///
/// Ids index the state store's arena and are never reused or removed, so a
/// fainted creature keeps its record until the report is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureId(pub(crate) usize);

impl CreatureId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What is known about who a creature is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Species name (including forme, e.g., "Rotom-Wash")
    pub species: String,

    /// Displayed name; `None` until the creature is actually sent out
    pub nickname: Option<String>,

    /// Level (1-100)
    pub level: u8,

    pub gender: Gender,

    pub shiny: bool,
}

impl Profile {
    /// Create from protocol details
    pub fn from_details(details: &PokemonDetails, nickname: Option<&str>) -> Self {
        Self {
            species: details.species.clone(),
            nickname: nickname.map(str::to_string),
            level: details.level.unwrap_or(100),
            gender: details.gender,
            shiny: details.shiny,
        }
    }

    /// Get the display name (nickname if known, otherwise species)
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.species)
    }

    /// Whether the creature has been seen in battle rather than only in team preview
    pub fn is_sighted(&self) -> bool {
        self.nickname.is_some()
    }
}

/// Whether two species names refer to the same base creature
///
/// "Urshifu-*" (team preview) matches "Urshifu-Rapid-Strike", and "Charizard"
/// matches "Charizard-Mega-X".
pub fn same_base_species(a: &str, b: &str) -> bool {
    let a = a.strip_suffix("-*").unwrap_or(a);
    let b = b.strip_suffix("-*").unwrap_or(b);

    a == b || is_forme_of(a, b) || is_forme_of(b, a)
}

fn is_forme_of(forme: &str, base: &str) -> bool {
    forme
        .strip_prefix(base)
        .is_some_and(|rest| rest.starts_with('-'))
}

/// Most recent HP loss in a creature's current life-span
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LastDamage {
    /// Damage paired with a move by an identified attacker
    Attributed { attacker: CreatureId, move_name: String },
    /// Hazards, status, weather, recoil and anything else without an attacker
    Unattributed,
}

/// One creature's state over the whole battle
#[derive(Debug, Clone)]
pub struct CreatureState {
    pub player: Player,

    pub profile: Profile,

    // === HP ===
    /// Current HP (percentage or absolute, as announced)
    pub hp_current: Option<u32>,

    /// Maximum HP, fixed once observed except on a forme change
    pub hp_max: Option<u32>,

    // === Revealed information ===
    /// Moves that have been revealed, in reveal order
    pub known_moves: Vec<String>,

    /// Ability that has been revealed
    pub known_ability: Option<String>,

    /// Item currently held, if known
    pub known_item: Option<String>,

    /// Last item seen on this creature, kept after it is consumed or removed
    pub last_known_item: Option<String>,

    // === Battle statistics ===
    pub knockouts: u32,

    /// 0 or 1; a creature faints at most once
    pub deaths: u32,

    pub damage_dealt: u32,

    pub damage_taken: u32,

    /// Knockouts credited per move
    pub move_kills: IndexMap<String, u32>,

    pub(crate) last_damage: Option<LastDamage>,
}

impl CreatureState {
    /// Create a new creature
    pub fn new(player: Player, profile: Profile) -> Self {
        Self {
            player,
            profile,
            hp_current: None,
            hp_max: None,
            known_moves: Vec::new(),
            known_ability: None,
            known_item: None,
            last_known_item: None,
            knockouts: 0,
            deaths: 0,
            damage_dealt: 0,
            damage_taken: 0,
            move_kills: IndexMap::new(),
            last_damage: None,
        }
    }

    /// Get display name (nickname or species)
    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn is_fainted(&self) -> bool {
        self.deaths > 0
    }

    /// Kills divided by deaths; equals kills when the creature never fainted
    pub fn kd_ratio(&self) -> f64 {
        if self.deaths == 0 {
            self.knockouts as f64
        } else {
            self.knockouts as f64 / self.deaths as f64
        }
    }

    /// Record a revealed move
    pub fn record_move(&mut self, move_name: &str) {
        if !self.known_moves.iter().any(|m| m == move_name) {
            self.known_moves.push(move_name.to_string());
        }
    }

    /// Record a revealed ability
    pub fn record_ability(&mut self, ability: &str) {
        self.known_ability = Some(ability.to_string());
    }

    /// Record a revealed item
    pub fn record_item(&mut self, item: &str) {
        self.known_item = Some(item.to_string());
        self.last_known_item = Some(item.to_string());
    }

    /// Mark the held item as gone; what it was stays in `last_known_item`
    pub fn consume_item(&mut self, item: &str) {
        if !item.is_empty() {
            self.last_known_item = Some(item.to_string());
        }
        self.known_item = None;
    }

    /// Replace the species with a more specific forme of the same creature
    ///
    /// Returns true if the species changed.
    pub fn refine_species(&mut self, species: &str) -> bool {
        let current = &self.profile.species;
        if species.is_empty() || species == current || species.ends_with("-*") {
            return false;
        }

        let preview = current
            .strip_suffix("-*")
            .is_some_and(|base| species == base || is_forme_of(species, base));

        if preview || is_forme_of(species, current) {
            self.profile.species = species.to_string();
            true
        } else {
            false
        }
    }

    /// Apply an announced HP value
    ///
    /// Returns how much HP was lost, in the scale of the stored maximum, when
    /// both the old and new values are known. A differing maximum is only
    /// adopted when `allow_max_change` is set (forme changes).
    pub fn apply_hp_status(&mut self, hp_status: &HpStatus, allow_max_change: bool) -> u32 {
        let mut current = hp_status.current;

        match (self.hp_max, hp_status.max) {
            (None, Some(max)) => self.hp_max = Some(max),
            (Some(_), Some(max)) if allow_max_change => self.hp_max = Some(max),
            (Some(known), Some(max)) if known != max && max > 0 => {
                current = ((current as u64 * known as u64) / max as u64) as u32;
            }
            _ => {}
        }

        let lost = self
            .hp_current
            .map(|previous| previous.saturating_sub(current))
            .unwrap_or(0);

        self.hp_current = Some(current);
        lost
    }

    /// Record a faint; returns false if this creature had already fainted
    pub fn record_faint(&mut self) -> bool {
        self.hp_current = Some(0);
        if self.deaths > 0 {
            return false;
        }
        self.deaths = 1;
        true
    }

    /// Credit a knockout made with `move_name`
    pub fn record_knockout(&mut self, move_name: &str) {
        self.knockouts += 1;
        *self.move_kills.entry(move_name.to_string()).or_insert(0) += 1;
    }

    /// Called when this creature enters the field; starts a new life-span
    pub fn on_switch_in(&mut self) {
        self.last_damage = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_creature(species: &str) -> CreatureState {
        let details = PokemonDetails::parse(species);
        CreatureState::new(Player::P1, Profile::from_details(&details, Some(species)))
    }

    #[test]
    fn test_profile_name() {
        let details = PokemonDetails::parse("Pikachu, L50, M");
        let preview = Profile::from_details(&details, None);
        assert_eq!(preview.name(), "Pikachu");
        assert_eq!(preview.level, 50);
        assert_eq!(preview.gender, Gender::Male);
        assert!(!preview.is_sighted());

        let sighted = Profile::from_details(&details, Some("Sparky"));
        assert_eq!(sighted.name(), "Sparky");
        assert!(sighted.is_sighted());
    }

    #[test]
    fn test_default_level() {
        let creature = create_test_creature("Rotom");
        assert_eq!(creature.profile.level, 100);
    }

    #[test]
    fn test_same_base_species() {
        assert!(same_base_species("Urshifu-*", "Urshifu-Rapid-Strike"));
        assert!(same_base_species("Charizard", "Charizard-Mega-X"));
        assert!(same_base_species("Ho-Oh", "Ho-Oh"));
        assert!(!same_base_species("Porygon", "Porygon2"));
        assert!(!same_base_species("Rotom", "Garchomp"));
    }

    #[test]
    fn test_record_move_deduplicates() {
        let mut creature = create_test_creature("Pikachu");

        creature.record_move("Thunderbolt");
        creature.record_move("Quick Attack");
        creature.record_move("Thunderbolt");

        assert_eq!(creature.known_moves, vec!["Thunderbolt", "Quick Attack"]);
    }

    #[test]
    fn test_item_consumption_keeps_last_known() {
        let mut creature = create_test_creature("Garchomp");

        creature.record_item("Sitrus Berry");
        creature.consume_item("Sitrus Berry");

        assert_eq!(creature.known_item, None);
        assert_eq!(creature.last_known_item.as_deref(), Some("Sitrus Berry"));

        // First reveal can come from the removal itself
        let mut other = create_test_creature("Rotom");
        other.consume_item("Air Balloon");
        assert_eq!(other.last_known_item.as_deref(), Some("Air Balloon"));
    }

    #[test]
    fn test_apply_hp_status_returns_loss() {
        let mut creature = create_test_creature("Rotom");

        let lost = creature.apply_hp_status(&HpStatus::parse("100/100").unwrap(), false);
        assert_eq!(lost, 0);
        assert_eq!(creature.hp_max, Some(100));

        let lost = creature.apply_hp_status(&HpStatus::parse("64/100").unwrap(), false);
        assert_eq!(lost, 36);

        let lost = creature.apply_hp_status(&HpStatus::parse("0 fnt").unwrap(), false);
        assert_eq!(lost, 64);
        assert_eq!(creature.hp_current, Some(0));
        assert_eq!(creature.hp_max, Some(100));
    }

    #[test]
    fn test_hp_max_is_fixed_without_forme_change() {
        let mut creature = create_test_creature("Garchomp");

        creature.apply_hp_status(&HpStatus::parse("357/357").unwrap(), false);
        creature.apply_hp_status(&HpStatus::parse("50/100").unwrap(), false);
        assert_eq!(creature.hp_max, Some(357));
        assert_eq!(creature.hp_current, Some(178));

        creature.apply_hp_status(&HpStatus::parse("100/100").unwrap(), true);
        assert_eq!(creature.hp_max, Some(100));
    }

    #[test]
    fn test_refine_species() {
        let mut creature = create_test_creature("Urshifu-*");

        assert!(creature.refine_species("Urshifu-Rapid-Strike"));
        assert_eq!(creature.profile.species, "Urshifu-Rapid-Strike");

        // Never downgraded or replaced by an unrelated species
        assert!(!creature.refine_species("Urshifu"));
        assert!(!creature.refine_species("Zoroark"));
    }

    #[test]
    fn test_faint_only_once() {
        let mut creature = create_test_creature("Rotom");

        assert!(creature.record_faint());
        assert!(!creature.record_faint());
        assert_eq!(creature.deaths, 1);
    }

    #[test]
    fn test_kd_ratio() {
        let mut creature = create_test_creature("Garchomp");
        assert_eq!(creature.kd_ratio(), 0.0);

        creature.record_knockout("Earthquake");
        creature.record_knockout("Earthquake");
        assert_eq!(creature.kd_ratio(), 2.0);

        creature.record_faint();
        assert_eq!(creature.kd_ratio(), 2.0);
        assert_eq!(creature.move_kills.get("Earthquake"), Some(&2));
    }
}
