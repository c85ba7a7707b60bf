//! Major battle action parsers
//!
//! These are the primary actions in battle: moves, switches, faints, etc.

use super::BattleEvent;
use super::battle::{SlotToken, find_keyword, parse_details, parse_hp_status, parse_slot};
use crate::ParseError;
use anyhow::Result;

/// Parse |move|POKEMON|MOVE|TARGET with optional tags
pub fn parse_move(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let move_name = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingField("move".to_string()))?
        .to_string();
    let target = parts.get(2).and_then(|s| SlotToken::parse(s));

    let miss = parts.iter().skip(3).any(|p| *p == "[miss]");
    let still = parts.iter().skip(3).any(|p| *p == "[still]");
    let from = find_keyword(&parts[3.min(parts.len())..], "from");

    Ok(BattleEvent::Move {
        pokemon,
        move_name,
        target,
        miss,
        still,
        from,
    })
}

/// Parse |switch|POKEMON|DETAILS|HP STATUS
pub fn parse_switch(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let details = parse_details(parts, 1);
    let hp_status = parse_hp_status(parts, 2);

    Ok(BattleEvent::Switch {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |drag|POKEMON|DETAILS|HP STATUS
pub fn parse_drag(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let details = parse_details(parts, 1);
    let hp_status = parse_hp_status(parts, 2);

    Ok(BattleEvent::Drag {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |replace|POKEMON|DETAILS|HP STATUS
pub fn parse_replace(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let details = parse_details(parts, 1);
    let hp_status = parse_hp_status(parts, 2);

    Ok(BattleEvent::Replace {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |detailschange|POKEMON|DETAILS|HP STATUS
pub fn parse_detailschange(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let details = parse_details(parts, 1);
    let hp_status = parse_hp_status(parts, 2);

    Ok(BattleEvent::DetailsChange {
        pokemon,
        details,
        hp_status,
    })
}

/// Parse |swap|POKEMON|POSITION
pub fn parse_swap(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let position = parts
        .get(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("position".to_string()))?;

    Ok(BattleEvent::Swap { pokemon, position })
}

/// Parse |cant|POKEMON|REASON or |cant|POKEMON|REASON|MOVE
pub fn parse_cant(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let reason = parts.get(1).unwrap_or(&"").to_string();
    let move_name = parts.get(2).map(|s| s.to_string());

    Ok(BattleEvent::Cant {
        pokemon,
        reason,
        move_name,
    })
}

/// Parse |faint|POKEMON
pub fn parse_faint(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    Ok(BattleEvent::Faint(pokemon))
}
