//! Battle initialization parsers
//!
//! These commands appear at the start of a log and describe the players,
//! format and (with team preview) the declared rosters.

use super::BattleEvent;
use super::battle::{Player, PokemonDetails};
use crate::ParseError;
use anyhow::Result;

fn parse_player_arg(parts: &[&str]) -> Result<Player> {
    parts
        .first()
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| ParseError::MissingField("player".to_string()).into())
}

/// Parse |player|PLAYER|USERNAME|AVATAR|RATING
pub fn parse_player(parts: &[&str]) -> Result<BattleEvent> {
    let player = parse_player_arg(parts)?;

    let username = parts.get(1).unwrap_or(&"").to_string();
    let avatar = parts.get(2).unwrap_or(&"").to_string();
    let rating = parts.get(3).and_then(|s| s.parse().ok());

    Ok(BattleEvent::Player {
        player,
        username,
        avatar,
        rating,
    })
}

/// Parse |teamsize|PLAYER|NUMBER
pub fn parse_teamsize(parts: &[&str]) -> Result<BattleEvent> {
    let player = parse_player_arg(parts)?;

    let size = parts
        .get(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("team size".to_string()))?;

    Ok(BattleEvent::TeamSize { player, size })
}

/// Parse |gametype|GAMETYPE
pub fn parse_gametype(parts: &[&str]) -> Result<BattleEvent> {
    let game_type = parts
        .first()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingField("game type".to_string()))?;

    Ok(BattleEvent::GameType(game_type.to_string()))
}

/// Parse |gen|GENNUM
pub fn parse_gen(parts: &[&str]) -> Result<BattleEvent> {
    let generation = parts
        .first()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ParseError::MissingField("generation".to_string()))?;

    Ok(BattleEvent::Gen(generation))
}

/// Parse |tier|FORMATNAME
pub fn parse_tier(parts: &[&str]) -> Result<BattleEvent> {
    let format = parts.first().unwrap_or(&"").to_string();
    Ok(BattleEvent::Tier(format))
}

/// Parse |rated| or |rated|MESSAGE
pub fn parse_rated(parts: &[&str]) -> Result<BattleEvent> {
    let message = parts.first().filter(|s| !s.is_empty()).map(|s| s.to_string());
    Ok(BattleEvent::Rated(message))
}

/// Parse |poke|PLAYER|DETAILS|ITEM
pub fn parse_poke(parts: &[&str]) -> Result<BattleEvent> {
    let player = parse_player_arg(parts)?;

    let details = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .map(|s| PokemonDetails::parse(s))
        .ok_or_else(|| ParseError::MissingField("details".to_string()))?;

    let has_item = parts.get(2).map(|s| *s == "item").unwrap_or(false);

    Ok(BattleEvent::Poke {
        player,
        details,
        has_item,
    })
}

/// Parse |teampreview or |teampreview|NUMBER
pub fn parse_teampreview(parts: &[&str]) -> Result<BattleEvent> {
    let count = parts.first().and_then(|s| s.parse().ok());
    Ok(BattleEvent::TeamPreview(count))
}
