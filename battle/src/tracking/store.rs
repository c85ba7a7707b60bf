//! Arena of creature states and per-player rosters for one run

use scout_protocol::Player;

use crate::types::{CreatureId, CreatureState, TeamRoster};

/// All creature and roster state of one simulation run
///
/// Creatures live in an arena addressed by [`CreatureId`]; rosters only hold
/// ids. Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    creatures: Vec<CreatureState>,

    /// Rosters (indexed by Player enum)
    rosters: [Option<TeamRoster>; 4],
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a creature to the arena and to its player's roster
    pub fn insert(&mut self, creature: CreatureState) -> CreatureId {
        let id = CreatureId(self.creatures.len());
        let player = creature.player;
        self.creatures.push(creature);
        self.roster_mut(player).push(id);
        id
    }

    pub fn get(&self, id: CreatureId) -> Option<&CreatureState> {
        self.creatures.get(id.0)
    }

    pub fn get_mut(&mut self, id: CreatureId) -> Option<&mut CreatureState> {
        self.creatures.get_mut(id.0)
    }

    /// Iterate over every creature with its id, in creation order
    pub fn creatures(&self) -> impl Iterator<Item = (CreatureId, &CreatureState)> {
        self.creatures
            .iter()
            .enumerate()
            .map(|(index, creature)| (CreatureId(index), creature))
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Get a roster by player
    pub fn roster(&self, player: Player) -> Option<&TeamRoster> {
        self.rosters[player.index()].as_ref()
    }

    /// Get or create the roster for a player
    pub fn roster_mut(&mut self, player: Player) -> &mut TeamRoster {
        self.rosters[player.index()].get_or_insert_with(|| TeamRoster::new(player))
    }

    /// Iterate over all initialized rosters
    pub fn rosters(&self) -> impl Iterator<Item = &TeamRoster> {
        self.rosters.iter().filter_map(|r| r.as_ref())
    }

    /// Members of a player's team with their states
    pub fn team(&self, player: Player) -> impl Iterator<Item = (CreatureId, &CreatureState)> {
        self.roster(player)
            .into_iter()
            .flat_map(|roster| roster.members.iter())
            .filter_map(|&id| self.get(id).map(|creature| (id, creature)))
    }
}
