//! Identity resolution
//!
//! Slot tokens address whoever currently occupies a position. These rules map
//! them onto stable [`CreatureId`]s across withdrawals, nickname reveals and
//! forme changes.

use scout_protocol::{Player, PokemonDetails, SlotToken};
use tracing::debug;

use super::store::StateStore;
use crate::types::{CreatureId, CreatureState, Profile, same_base_species};

impl StateStore {
    /// Pick the identity for a creature entering `slot`
    ///
    /// 1. The slot's current occupant continues if it has the same name and
    ///    has not fainted (re-announcement or cosmetic forme change).
    /// 2. Otherwise an unoccupied, non-fainted team member is reused, matched
    ///    by nickname first and then by base species for preview seeds and
    ///    creatures that go by their species name.
    /// 3. Otherwise a new identity is minted and appended to the roster.
    ///
    /// A fainted identity is never reused.
    pub fn resolve_switch(
        &mut self,
        player: Player,
        slot: usize,
        name: &str,
        details: &PokemonDetails,
    ) -> CreatureId {
        let occupant = self.roster(player).and_then(|roster| roster.occupant(slot));

        if let Some(id) = occupant
            && let Some(creature) = self.get_mut(id)
            && !creature.is_fainted()
            && creature.name() == name
        {
            creature.refine_species(&details.species);
            return id;
        }

        if let Some(id) = self.find_reusable(player, name, &details.species) {
            if let Some(creature) = self.get_mut(id) {
                if !creature.profile.is_sighted() {
                    // First sighting of a preview seed
                    creature.profile = Profile {
                        species: creature.profile.species.clone(),
                        ..Profile::from_details(details, Some(name))
                    };
                }
                creature.refine_species(&details.species);
            }
            debug!(player = player.as_str(), nickname = name, id = id.index(), "reused identity");
            return id;
        }

        let id = self.insert(CreatureState::new(
            player,
            Profile::from_details(details, Some(name)),
        ));
        debug!(player = player.as_str(), nickname = name, id = id.index(), "new identity");
        id
    }

    /// Add a team-preview entry to the roster
    ///
    /// Seeds carry only species details until a switch claims them.
    pub fn seed(&mut self, player: Player, details: &PokemonDetails) -> CreatureId {
        self.insert(CreatureState::new(player, Profile::from_details(details, None)))
    }

    fn find_reusable(&self, player: Player, name: &str, species: &str) -> Option<CreatureId> {
        let roster = self.roster(player)?;

        let candidates: Vec<(CreatureId, &CreatureState)> = self
            .team(player)
            .filter(|(id, creature)| !creature.is_fainted() && !roster.is_active(*id))
            .collect();

        if let Some((id, _)) = candidates
            .iter()
            .find(|(_, creature)| creature.profile.nickname.as_deref() == Some(name))
        {
            return Some(*id);
        }

        candidates
            .iter()
            .find(|(_, creature)| {
                let goes_by_species = match &creature.profile.nickname {
                    None => true,
                    Some(nickname) => nickname == &creature.profile.species,
                };
                goes_by_species && same_base_species(&creature.profile.species, species)
            })
            .map(|(id, _)| *id)
    }

    /// Find the creature a slot token refers to
    ///
    /// A positioned token resolves to the slot's current occupant. Tokens
    /// without a position, or naming an empty slot, fall back to the team
    /// member with that name, preferring one that has not fainted.
    pub fn find_ref(&self, token: &SlotToken) -> Option<CreatureId> {
        if let Some(slot) = token.slot()
            && let Some(id) = self.roster(token.player).and_then(|r| r.occupant(slot))
        {
            return Some(id);
        }

        let named: Vec<CreatureId> = self
            .team(token.player)
            .filter(|(_, creature)| creature.name() == token.name)
            .map(|(id, _)| id)
            .collect();

        named
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|c| !c.is_fainted()))
            .or_else(|| named.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn details(s: &str) -> PokemonDetails {
        PokemonDetails::parse(s)
    }

    fn switch_in(store: &mut StateStore, player: Player, name: &str, species: &str) -> CreatureId {
        let id = store.resolve_switch(player, 0, name, &details(species));
        store.roster_mut(player).set_active(0, id);
        id
    }

    fn seed(store: &mut StateStore, player: Player, species: &str) -> CreatureId {
        store.insert(CreatureState::new(
            player,
            Profile::from_details(&details(species), None),
        ))
    }

    #[test]
    fn test_same_occupant_continues() {
        let mut store = StateStore::new();

        let first = switch_in(&mut store, Player::P1, "Chomp", "Garchomp, L100");
        let again = switch_in(&mut store, Player::P1, "Chomp", "Garchomp, L100");

        assert_eq!(first, again);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_returning_creature_is_reused() {
        let mut store = StateStore::new();

        let garchomp = switch_in(&mut store, Player::P1, "Garchomp", "Garchomp");
        let toxapex = switch_in(&mut store, Player::P1, "Toxapex", "Toxapex");
        let back = switch_in(&mut store, Player::P1, "Garchomp", "Garchomp");

        assert_ne!(garchomp, toxapex);
        assert_eq!(garchomp, back);
        assert_eq!(store.roster(Player::P1).unwrap().members.len(), 2);
    }

    #[test]
    fn test_fainted_identity_is_never_reused() {
        let mut store = StateStore::new();

        let first = switch_in(&mut store, Player::P2, "Rotom", "Rotom-Wash");
        store.get_mut(first).unwrap().record_faint();

        let second = switch_in(&mut store, Player::P2, "Rotom", "Rotom-Wash");
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_preview_seed_claimed_by_species() {
        let mut store = StateStore::new();

        let seeded = seed(&mut store, Player::P1, "Urshifu-*");
        let other = seed(&mut store, Player::P1, "Amoonguss");

        let sighted = switch_in(&mut store, Player::P1, "Fist", "Urshifu-Rapid-Strike, L50, M");

        assert_eq!(seeded, sighted);
        assert_ne!(other, sighted);

        let creature = store.get(sighted).unwrap();
        assert_eq!(creature.name(), "Fist");
        assert_eq!(creature.profile.species, "Urshifu-Rapid-Strike");
        assert_eq!(creature.profile.level, 50);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_nicknamed_creature_not_claimed_by_species() {
        let mut store = StateStore::new();

        let sparky = switch_in(&mut store, Player::P1, "Sparky", "Pikachu");
        switch_in(&mut store, Player::P1, "Garchomp", "Garchomp");

        // A different Pikachu under another nickname is a new identity
        let other = switch_in(&mut store, Player::P1, "Volt", "Pikachu");
        assert_ne!(sparky, other);
    }

    #[test]
    fn test_find_ref_uses_slot_occupant() {
        let mut store = StateStore::new();

        let id = switch_in(&mut store, Player::P1, "Chomp", "Garchomp");

        let token = SlotToken::parse("p1a: Chomp").unwrap();
        assert_eq!(store.find_ref(&token), Some(id));

        let positionless = SlotToken::parse("p1: Chomp").unwrap();
        assert_eq!(store.find_ref(&positionless), Some(id));

        let unknown = SlotToken::parse("p2a: Rotom").unwrap();
        assert_eq!(store.find_ref(&unknown), None);
    }
}
