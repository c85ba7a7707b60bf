//! Battle progress parsers
//!
//! Turn boundaries and the terminal commands that end the narrative.

use super::BattleEvent;
use crate::ParseError;
use anyhow::Result;

/// Parse |turn|NUMBER
pub fn parse_turn(parts: &[&str]) -> Result<BattleEvent> {
    let turn = parts
        .first()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("turn number".to_string()))?;

    Ok(BattleEvent::Turn(turn))
}

/// Parse |win|USER
pub fn parse_win(parts: &[&str]) -> Result<BattleEvent> {
    let user = parts.first().unwrap_or(&"").to_string();
    Ok(BattleEvent::Win(user))
}

/// Parse a forfeit, carried as the forfeiting user's name
pub fn parse_forfeit(parts: &[&str]) -> Result<BattleEvent> {
    let user = parts.first().unwrap_or(&"").to_string();
    Ok(BattleEvent::Forfeit(user))
}
