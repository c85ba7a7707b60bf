//! Simulation - replays a command stream into creature state

use scout_protocol::{Command, CommandStream, Outcome, SlotToken};

use super::store::StateStore;
use crate::error::SimulationError;
use crate::metadata::{BattleMetadata, extract_metadata};
use crate::report::{Anomaly, BattleReport};
use crate::types::{CreatureId, FieldLog};

/// Whether the engine wants more commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A move whose damage lines may still follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingMove {
    pub attacker: CreatureId,
    pub move_name: String,
}

/// One battle being replayed from its log
///
/// Each run owns its own store; nothing is shared between simulations.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    pub(crate) store: StateStore,

    /// Weather, terrain and side condition mentions
    pub(crate) field: FieldLog,

    pub(crate) metadata: BattleMetadata,

    /// Current turn number (0 = not started)
    pub turn: u32,

    pub(crate) pending_move: Option<PendingMove>,

    pub(crate) anomalies: Vec<Anomaly>,

    /// Set by the terminal command
    pub outcome: Option<Outcome>,

    ended: bool,
}

impl Simulation {
    /// Create a new simulation
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn field(&self) -> &FieldLog {
        &self.field
    }

    pub fn metadata(&self) -> &BattleMetadata {
        &self.metadata
    }

    /// Metadata can be amended (e.g., from a replay wrapper) before reporting
    pub fn metadata_mut(&mut self) -> &mut BattleMetadata {
        &mut self.metadata
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    /// Whether a terminal command has been processed
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Process one command
    ///
    /// Once the battle has ended every further command is ignored.
    pub fn update(&mut self, command: &Command) -> Result<Flow, SimulationError> {
        if self.ended {
            return Ok(Flow::Stop);
        }
        self.dispatch(command)
    }

    /// Extract metadata, then feed every command through [`Self::update`]
    pub fn run(&mut self, stream: &CommandStream) -> Result<(), SimulationError> {
        self.metadata = extract_metadata(&stream.commands);

        for command in &stream.commands {
            if self.update(command)? == Flow::Stop {
                break;
            }
        }

        Ok(())
    }

    /// Build the report from the current state
    pub fn report(&self) -> BattleReport {
        let mut metadata = self.metadata.clone();
        if metadata.outcome.is_none() {
            metadata.outcome = self.outcome.clone();
            metadata.resolve_forfeit_winner();
        }

        BattleReport::assemble(&self.store, metadata, self.field.mentions(), &self.anomalies)
    }

    /// Resolve a token that must name a known creature
    pub(crate) fn resolve_ref(
        &self,
        token: &SlotToken,
        command: &Command,
    ) -> Result<CreatureId, SimulationError> {
        self.store
            .find_ref(token)
            .ok_or_else(|| SimulationError::IdentityResolution {
                token: format!(
                    "{}{}: {}",
                    token.player.as_str(),
                    token.position.map(String::from).unwrap_or_default(),
                    token.name
                ),
                command: command.raw.clone(),
            })
    }

    pub(crate) fn end(&mut self, outcome: Option<Outcome>) {
        self.ended = true;
        self.outcome = outcome;
    }
}

/// Run a whole command stream and report the result
pub fn simulate(stream: &CommandStream) -> Result<BattleReport, SimulationError> {
    let mut simulation = Simulation::new();
    simulation.run(stream)?;
    Ok(simulation.report())
}
