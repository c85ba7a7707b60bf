//! Team roster (one player's side)

use scout_protocol::Player;

use super::creature::CreatureId;

/// One player's team as observed in the log
#[derive(Debug, Clone)]
pub struct TeamRoster {
    /// Player identifier (P1, P2, etc.)
    pub player: Player,

    /// Player's username, once announced
    pub username: Option<String>,

    /// Creatures on this team in first-seen order
    pub members: Vec<CreatureId>,

    /// Current occupant of each active slot
    /// For singles: [Some(id)] or [None]
    /// For doubles: [Some(id1), Some(id2)] etc.
    pub active: Vec<Option<CreatureId>>,

    /// Size announced by |teamsize|, if any
    pub team_size: Option<u8>,
}

impl TeamRoster {
    /// Create a new empty roster
    pub fn new(player: Player) -> Self {
        Self {
            player,
            username: None,
            members: Vec::new(),
            active: vec![None],
            team_size: None,
        }
    }

    /// Append a creature to the roster
    pub fn push(&mut self, id: CreatureId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    /// Get the occupant of a slot (0-indexed)
    pub fn occupant(&self, slot: usize) -> Option<CreatureId> {
        self.active.get(slot).copied().flatten()
    }

    /// Set the occupant of a slot, growing the slot list as needed
    ///
    /// Returns the previous occupant.
    pub fn set_active(&mut self, slot: usize, id: CreatureId) -> Option<CreatureId> {
        if slot >= self.active.len() {
            self.active.resize(slot + 1, None);
        }

        // A creature occupies at most one slot
        for occupied in self.active.iter_mut() {
            if *occupied == Some(id) {
                *occupied = None;
            }
        }

        self.active[slot].replace(id)
    }

    /// Move the occupant of `from` into `to`, swapping with whatever is there
    pub fn swap(&mut self, from: usize, to: usize) {
        let needed = from.max(to) + 1;
        if needed > self.active.len() {
            self.active.resize(needed, None);
        }
        self.active.swap(from, to);
    }

    /// Find the active slot for a creature
    pub fn slot_of(&self, id: CreatureId) -> Option<usize> {
        self.active.iter().position(|occupied| *occupied == Some(id))
    }

    /// Whether a creature currently occupies any slot
    pub fn is_active(&self, id: CreatureId) -> bool {
        self.slot_of(id).is_some()
    }

    /// Remove every occupant (used by |clearpoke|-style resets)
    pub fn clear_active(&mut self) {
        for occupied in self.active.iter_mut() {
            *occupied = None;
        }
    }
}
