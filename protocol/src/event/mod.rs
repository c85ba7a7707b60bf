//! Typed battle events
//!
//! [`BattleEvent::parse`] turns a [`Command`] into a typed event with one parse
//! function per tag, following the argument layout of the battle protocol.

mod battle;
mod battle_init;
mod battle_major;
mod battle_minor;
mod battle_progress;
mod tests;

pub use battle::{
    Gender, HpStatus, Player, PokemonDetails, SlotToken, find_keyword, parse_details,
    parse_hp_status, parse_slot, to_id,
};

use crate::command::{Command, CommandKind};
use crate::ParseError;
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // === Initialization ===
    Player {
        player: Player,
        username: String,
        avatar: String,
        rating: Option<u32>,
    },
    TeamSize {
        player: Player,
        size: u8,
    },
    GameType(String),
    Gen(u8),
    Tier(String),
    Rated(Option<String>),
    ClearPoke,
    Poke {
        player: Player,
        details: PokemonDetails,
        has_item: bool,
    },
    TeamPreview(Option<u8>),
    Start,

    // === Progress ===
    Turn(u32),
    Upkeep,
    Win(String),
    Tie,
    Forfeit(String),

    // === Major actions ===
    Move {
        pokemon: SlotToken,
        move_name: String,
        target: Option<SlotToken>,
        miss: bool,
        still: bool,
        from: Option<String>,
    },
    Switch {
        pokemon: SlotToken,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Drag {
        pokemon: SlotToken,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Replace {
        pokemon: SlotToken,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    DetailsChange {
        pokemon: SlotToken,
        details: PokemonDetails,
        hp_status: Option<HpStatus>,
    },
    Swap {
        pokemon: SlotToken,
        position: u8,
    },
    Cant {
        pokemon: SlotToken,
        reason: String,
        move_name: Option<String>,
    },
    Faint(SlotToken),

    // === Minor actions ===
    FormeChange {
        pokemon: SlotToken,
        species: String,
        hp_status: Option<HpStatus>,
    },
    Damage {
        pokemon: SlotToken,
        hp_status: Option<HpStatus>,
        from: Option<String>,
        of: Option<SlotToken>,
    },
    Heal {
        pokemon: SlotToken,
        hp_status: Option<HpStatus>,
        from: Option<String>,
    },
    SetHp {
        pokemon: SlotToken,
        hp_status: Option<HpStatus>,
    },
    Status {
        pokemon: SlotToken,
        status: String,
    },
    CureStatus {
        pokemon: SlotToken,
        status: String,
    },
    Ability {
        pokemon: SlotToken,
        ability: String,
        from: Option<String>,
        of: Option<SlotToken>,
    },
    EndAbility(SlotToken),
    Item {
        pokemon: SlotToken,
        item: String,
        from: Option<String>,
        of: Option<SlotToken>,
    },
    EndItem {
        pokemon: SlotToken,
        item: String,
        from: Option<String>,
        eat: bool,
    },
    Transform {
        pokemon: SlotToken,
        species: String,
    },
    Mega {
        pokemon: SlotToken,
        megastone: String,
    },
    Terastallize {
        pokemon: SlotToken,
        tera_type: String,
    },
    Weather {
        weather: String,
        upkeep: bool,
    },
    FieldStart(String),
    FieldEnd(String),
    SideStart {
        side: Player,
        condition: String,
    },
    SideEnd {
        side: Player,
        condition: String,
    },
}

impl BattleEvent {
    /// Parse a command into a typed battle event
    ///
    /// Presentation and unknown commands are not battle events and return an
    /// error, as do commands missing a required argument.
    pub fn parse(command: &Command) -> Result<BattleEvent> {
        let parts = command.parts();

        match command.kind {
            CommandKind::Player => battle_init::parse_player(&parts),
            CommandKind::TeamSize => battle_init::parse_teamsize(&parts),
            CommandKind::GameType => battle_init::parse_gametype(&parts),
            CommandKind::Gen => battle_init::parse_gen(&parts),
            CommandKind::Tier => battle_init::parse_tier(&parts),
            CommandKind::Rated => battle_init::parse_rated(&parts),
            CommandKind::ClearPoke => Ok(BattleEvent::ClearPoke),
            CommandKind::Poke => battle_init::parse_poke(&parts),
            CommandKind::TeamPreview => battle_init::parse_teampreview(&parts),
            CommandKind::Start => Ok(BattleEvent::Start),

            CommandKind::Turn => battle_progress::parse_turn(&parts),
            CommandKind::Upkeep => Ok(BattleEvent::Upkeep),
            CommandKind::Win => battle_progress::parse_win(&parts),
            CommandKind::Tie => Ok(BattleEvent::Tie),
            CommandKind::Forfeit => battle_progress::parse_forfeit(&parts),

            CommandKind::Move => battle_major::parse_move(&parts),
            CommandKind::Switch => battle_major::parse_switch(&parts),
            CommandKind::Drag => battle_major::parse_drag(&parts),
            CommandKind::Replace => battle_major::parse_replace(&parts),
            CommandKind::DetailsChange => battle_major::parse_detailschange(&parts),
            CommandKind::Swap => battle_major::parse_swap(&parts),
            CommandKind::Cant => battle_major::parse_cant(&parts),
            CommandKind::Faint => battle_major::parse_faint(&parts),

            CommandKind::FormeChange => battle_minor::parse_formechange(&parts),
            CommandKind::Damage => battle_minor::parse_damage(&parts),
            CommandKind::Heal => battle_minor::parse_heal(&parts),
            CommandKind::SetHp => battle_minor::parse_sethp(&parts),
            CommandKind::Status => battle_minor::parse_status(&parts),
            CommandKind::CureStatus => battle_minor::parse_curestatus(&parts),
            CommandKind::Ability => battle_minor::parse_ability(&parts),
            CommandKind::EndAbility => battle_minor::parse_endability(&parts),
            CommandKind::Item => battle_minor::parse_item(&parts),
            CommandKind::EndItem => battle_minor::parse_enditem(&parts),
            CommandKind::Transform => battle_minor::parse_transform(&parts),
            CommandKind::Mega => battle_minor::parse_mega(&parts),
            CommandKind::Terastallize => battle_minor::parse_terastallize(&parts),
            CommandKind::Weather => battle_minor::parse_weather(&parts),
            CommandKind::FieldStart => battle_minor::parse_fieldstart(&parts),
            CommandKind::FieldEnd => battle_minor::parse_fieldend(&parts),
            CommandKind::SideStart => battle_minor::parse_sidestart(&parts),
            CommandKind::SideEnd => battle_minor::parse_sideend(&parts),

            CommandKind::Presentation | CommandKind::Unknown => {
                Err(ParseError::NotBattleEvent(command.tag.clone()).into())
            }
        }
    }
}
