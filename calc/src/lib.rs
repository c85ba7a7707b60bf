//! Boundary to an external damage calculator.
//!
//! Tracked creatures are turned into calculator input with
//! [`CalcPokemon::from_creature`]. Unknown spreads default to a neutral nature,
//! no EVs and perfect IVs. The numbers themselves come from whatever implements
//! [`DamageCalculator`]; [`NodeCalculator`] runs a node wrapper script.
//!
//! ```ignore
//! use scout_calc::{CalcField, CalcPokemon, DamageCalculator, DamageRequest, NodeCalculator};
//!
//! let calculator = NodeCalculator::new("calc_wrapper.js");
//! let request = DamageRequest {
//!     generation: 9,
//!     attacker: CalcPokemon::from_creature(garchomp),
//!     defender: CalcPokemon::from_creature(heatran),
//!     move_name: "Earthquake".to_string(),
//!     field: CalcField::default(),
//! };
//! let result = calculator.calculate(&request).await?;
//! println!("{} ({:?})", result.description, result.damage_range);
//! ```

mod error;
mod estimate;
mod node;
mod request;

pub use error::CalculatorError;
pub use estimate::{DamageObservation, SpreadEstimate, estimate_spreads};
pub use node::{DamageCalculator, NodeCalculator};
pub use request::{
    CalcField, CalcPokemon, DamageRequest, DamageResult, NEUTRAL_NATURE, StatSpread,
};
