//! Update logic for applying commands to simulation state

use scout_protocol::{BattleEvent, Command, HpStatus, PokemonDetails, SlotToken};
use tracing::{debug, warn};

use super::simulation::{Flow, PendingMove, Simulation};
use crate::report::Anomaly;
use crate::types::{CreatureId, LastDamage};

impl Simulation {
    pub(crate) fn dispatch(&mut self, command: &Command) -> Result<Flow, crate::SimulationError> {
        if command.kind.is_terminal() {
            self.end(command.outcome());
            return Ok(Flow::Stop);
        }

        let event = match BattleEvent::parse(command) {
            Ok(event) => event,
            Err(error) => {
                debug!(%error, line = %command.raw, "skipping command");
                return Ok(Flow::Continue);
            }
        };

        match event {
            // === Battle Initialization ===
            BattleEvent::Player {
                player, username, ..
            } => {
                if !username.is_empty() {
                    self.store.roster_mut(player).username = Some(username);
                }
            }

            BattleEvent::TeamSize { player, size } => {
                self.store.roster_mut(player).team_size = Some(size);
            }

            BattleEvent::Poke {
                player, details, ..
            } => {
                self.store.seed(player, &details);
            }

            // Metadata is read by the extractor
            BattleEvent::GameType(_)
            | BattleEvent::Gen(_)
            | BattleEvent::Tier(_)
            | BattleEvent::Rated(_)
            | BattleEvent::ClearPoke
            | BattleEvent::TeamPreview(_)
            | BattleEvent::Start => {}

            // === Progress ===
            BattleEvent::Turn(turn) => {
                self.turn = turn;
                self.pending_move = None;
            }

            BattleEvent::Upkeep => {
                self.pending_move = None;
            }

            BattleEvent::Win(_) | BattleEvent::Tie | BattleEvent::Forfeit(_) => {
                self.end(command.outcome());
                return Ok(Flow::Stop);
            }

            // === Major Actions ===
            BattleEvent::Switch {
                pokemon,
                details,
                hp_status,
            }
            | BattleEvent::Drag {
                pokemon,
                details,
                hp_status,
            }
            | BattleEvent::Replace {
                pokemon,
                details,
                hp_status,
            } => {
                self.handle_switch(&pokemon, &details, hp_status.as_ref());
            }

            BattleEvent::DetailsChange {
                pokemon,
                details,
                hp_status,
            } => {
                if let Some(creature) = self.find_mut(&pokemon) {
                    if !details.species.is_empty() {
                        creature.profile.species = details.species.clone();
                    }
                    if let Some(hp) = &hp_status {
                        creature.apply_hp_status(hp, true);
                    }
                }
            }

            BattleEvent::FormeChange {
                pokemon,
                species,
                hp_status,
            } => {
                if let Some(creature) = self.find_mut(&pokemon) {
                    creature.refine_species(&species);
                    if let Some(hp) = &hp_status {
                        creature.apply_hp_status(hp, true);
                    }
                }
            }

            BattleEvent::Swap { pokemon, position } => {
                if let Some(id) = self.store.find_ref(&pokemon) {
                    let roster = self.store.roster_mut(pokemon.player);
                    if let Some(from) = roster.slot_of(id) {
                        roster.swap(from, position as usize);
                    }
                }
            }

            BattleEvent::Move {
                pokemon,
                move_name,
                from,
                ..
            } => {
                let attacker = self.resolve_ref(&pokemon, command)?;

                // Moves called by other moves (Metronome, Sleep Talk) are not part of the set
                let called = from.as_deref().is_some_and(|f| f.starts_with("move:"));
                if let Some(creature) = self.store.get_mut(attacker) {
                    if !called {
                        creature.record_move(&move_name);
                    }
                    // Earlier hits can no longer be what knocks the user out
                    creature.last_damage = None;
                }

                self.pending_move = Some(PendingMove {
                    attacker,
                    move_name,
                });
            }

            BattleEvent::Cant { .. } => {
                self.pending_move = None;
            }

            BattleEvent::Faint(pokemon) => {
                let id = self.resolve_ref(&pokemon, command)?;
                self.handle_faint(id);
            }

            // === HP Changes ===
            BattleEvent::Damage {
                pokemon,
                hp_status,
                from,
                of,
            } => {
                let id = self.resolve_ref(&pokemon, command)?;
                self.reveal_from(id, from.as_deref(), of.as_ref());
                if let Some(hp) = hp_status {
                    self.handle_damage(id, &hp, from.is_some());
                }
            }

            BattleEvent::Heal {
                pokemon,
                hp_status,
                from,
            } => {
                let id = self.resolve_ref(&pokemon, command)?;
                // Healing effects always belong to the healed creature
                self.reveal_from(id, from.as_deref(), None);
                if let (Some(creature), Some(hp)) = (self.store.get_mut(id), hp_status) {
                    creature.apply_hp_status(&hp, false);
                }
            }

            BattleEvent::SetHp { pokemon, hp_status } => {
                let id = self.resolve_ref(&pokemon, command)?;
                if let Some(hp) = hp_status {
                    self.handle_damage(id, &hp, true);
                }
            }

            // === Reveals ===
            BattleEvent::Ability {
                pokemon,
                ability,
                from,
                of,
            } => {
                let Some(id) = self.store.find_ref(&pokemon) else {
                    debug!(line = %command.raw, "ability for unknown creature");
                    return Ok(Flow::Continue);
                };

                let traced = from.as_deref() == Some("ability: Trace");
                if let Some(creature) = self.store.get_mut(id) {
                    creature.record_ability(if traced { "Trace" } else { ability.as_str() });
                }
                if traced && let Some(source) = of.as_ref().and_then(|t| self.find_mut(t)) {
                    source.record_ability(&ability);
                }
            }

            BattleEvent::Item {
                pokemon,
                item,
                from,
                of,
            } => {
                if let Some(creature) = self.find_mut(&pokemon) {
                    creature.record_item(&item);
                }
                if let (Some(from), Some(of)) = (from.as_deref(), of.as_ref())
                    && let Some(ability) = from.strip_prefix("ability: ")
                    && let Some(source) = self.find_mut(of)
                {
                    source.record_ability(ability);
                }
            }

            BattleEvent::EndItem { pokemon, item, .. } => {
                if let Some(creature) = self.find_mut(&pokemon) {
                    creature.consume_item(&item);
                }
            }

            BattleEvent::Mega { pokemon, megastone } => {
                if let Some(creature) = self.find_mut(&pokemon)
                    && !megastone.is_empty()
                {
                    creature.record_item(&megastone);
                }
            }

            // === Field mentions ===
            BattleEvent::Weather { weather, upkeep } => {
                self.field.weather(self.turn, &weather, upkeep);
            }

            BattleEvent::FieldStart(condition) => {
                self.field.field(self.turn, &condition, true);
            }

            BattleEvent::FieldEnd(condition) => {
                self.field.field(self.turn, &condition, false);
            }

            BattleEvent::SideStart { side, condition } => {
                self.field.side(self.turn, side, &condition, true);
            }

            BattleEvent::SideEnd { side, condition } => {
                self.field.side(self.turn, side, &condition, false);
            }

            BattleEvent::Status { .. }
            | BattleEvent::CureStatus { .. }
            | BattleEvent::EndAbility(_)
            | BattleEvent::Transform { .. }
            | BattleEvent::Terastallize { .. } => {}
        }

        Ok(Flow::Continue)
    }

    /// Handle a switch, drag or replace
    fn handle_switch(
        &mut self,
        pokemon: &SlotToken,
        details: &PokemonDetails,
        hp_status: Option<&HpStatus>,
    ) {
        let slot = pokemon.slot().unwrap_or(0);
        let player = pokemon.player;

        let id = self
            .store
            .resolve_switch(player, slot, &pokemon.name, details);
        let previous = self.store.roster_mut(player).set_active(slot, id);

        if previous != Some(id) {
            if let Some(creature) = self.store.get_mut(id) {
                creature.on_switch_in();
            }

            // The pending move's user left the field
            if self
                .pending_move
                .as_ref()
                .is_some_and(|pending| Some(pending.attacker) == previous || pending.attacker == id)
            {
                self.pending_move = None;
            }
        }

        if let (Some(creature), Some(hp)) = (self.store.get_mut(id), hp_status) {
            creature.apply_hp_status(hp, false);
        }
    }

    /// Apply an HP announcement and credit any loss
    ///
    /// Loss is attributed to the pending move's user only when the line has no
    /// `[from]` effect and the user is someone other than the target.
    fn handle_damage(&mut self, id: CreatureId, hp_status: &HpStatus, has_effect: bool) {
        let Some(target) = self.store.get_mut(id) else {
            return;
        };

        let lost = target.apply_hp_status(hp_status, false);
        if lost == 0 {
            return;
        }
        target.damage_taken += lost;

        let attacker = self
            .pending_move
            .as_ref()
            .filter(|pending| !has_effect && pending.attacker != id);

        match attacker {
            Some(pending) => {
                target.last_damage = Some(LastDamage::Attributed {
                    attacker: pending.attacker,
                    move_name: pending.move_name.clone(),
                });
                let attacker = pending.attacker;
                if let Some(source) = self.store.get_mut(attacker) {
                    source.damage_dealt += lost;
                }
            }
            None => {
                target.last_damage = Some(LastDamage::Unattributed);
            }
        }
    }

    /// Handle a faint and credit the knockout
    ///
    /// Credit goes to the attacker only when the immediately preceding damage
    /// to this creature brought it to zero HP and was attributed.
    fn handle_faint(&mut self, id: CreatureId) {
        let Some(creature) = self.store.get_mut(id) else {
            return;
        };

        let dropped_to_zero = creature.hp_current == Some(0);
        if !creature.record_faint() {
            let message = format!("{} fainted more than once", creature.name());
            warn!(turn = self.turn, creature = creature.name(), "repeated faint");
            self.anomalies.push(Anomaly {
                turn: self.turn,
                message,
            });
            return;
        }

        if dropped_to_zero
            && let Some(LastDamage::Attributed {
                attacker,
                move_name,
            }) = creature.last_damage.take()
            && let Some(source) = self.store.get_mut(attacker)
        {
            source.record_knockout(&move_name);
        }
    }

    /// Reveal abilities and items named by a `[from]` effect
    ///
    /// With an `[of]` source the effect belongs to the source (Rough Skin,
    /// Rocky Helmet); otherwise to the creature itself (Life Orb, Leftovers).
    fn reveal_from(&mut self, id: CreatureId, from: Option<&str>, of: Option<&SlotToken>) {
        let Some(from) = from else {
            return;
        };

        let owner = match of {
            Some(token) => self.store.find_ref(token),
            None => Some(id),
        };
        let Some(owner) = owner.and_then(|owner| self.store.get_mut(owner)) else {
            return;
        };

        if let Some(ability) = from.strip_prefix("ability: ") {
            owner.record_ability(ability);
        } else if let Some(item) = from.strip_prefix("item: ") {
            owner.record_item(item);
        }
    }

    /// Find a creature for a non-essential update
    fn find_mut(&mut self, token: &SlotToken) -> Option<&mut crate::types::CreatureState> {
        let id = self.store.find_ref(token)?;
        self.store.get_mut(id)
    }
}
