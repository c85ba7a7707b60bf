use thiserror::Error;

pub mod command;
pub mod event;

pub use command::{Command, CommandKind, CommandStream, Outcome, parse_line, parse_log};
pub use event::{
    BattleEvent, Gender, HpStatus, Player, PokemonDetails, SlotToken, parse_details,
    parse_hp_status, parse_slot, to_id,
};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Command {0} is not a battle event")]
    NotBattleEvent(String),
}
