//! Battle simulation from a command stream

mod resolver;
mod simulation;
mod store;
mod updater;

pub use simulation::{Flow, Simulation, simulate};
pub use store::StateStore;
