//! Minor battle action parsers
//!
//! These are secondary effects in battle: damage, healing, reveals, and the
//! field mentions. In the official client, they're usually displayed in
//! smaller font.

use super::BattleEvent;
use super::battle::{Player, SlotToken, find_keyword, parse_hp_status, parse_slot};
use crate::ParseError;
use anyhow::Result;

fn parse_of(parts: &[&str]) -> Option<SlotToken> {
    find_keyword(parts, "of").and_then(|s| SlotToken::parse(&s))
}

fn parse_side(parts: &[&str]) -> Result<Player> {
    parts
        .first()
        .and_then(|s| Player::parse(s))
        .ok_or_else(|| ParseError::MissingField("side".to_string()).into())
}

/// Parse |-formechange|POKEMON|SPECIES|HP STATUS
pub fn parse_formechange(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let species = parts.get(1).unwrap_or(&"").to_string();
    let hp_status = parse_hp_status(parts, 2);

    Ok(BattleEvent::FormeChange {
        pokemon,
        species,
        hp_status,
    })
}

/// Parse |-damage|POKEMON|HP STATUS with optional [from]EFFECT and [of]SOURCE
pub fn parse_damage(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let hp_status = parse_hp_status(parts, 1);
    let from = find_keyword(parts, "from");
    let of = parse_of(parts);

    Ok(BattleEvent::Damage {
        pokemon,
        hp_status,
        from,
        of,
    })
}

/// Parse |-heal|POKEMON|HP STATUS with optional [from]EFFECT
pub fn parse_heal(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let hp_status = parse_hp_status(parts, 1);
    let from = find_keyword(parts, "from");

    Ok(BattleEvent::Heal {
        pokemon,
        hp_status,
        from,
    })
}

/// Parse |-sethp|POKEMON|HP
pub fn parse_sethp(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let hp_status = parse_hp_status(parts, 1);

    Ok(BattleEvent::SetHp { pokemon, hp_status })
}

/// Parse |-status|POKEMON|STATUS
pub fn parse_status(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let status = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::Status { pokemon, status })
}

/// Parse |-curestatus|POKEMON|STATUS
pub fn parse_curestatus(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let status = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::CureStatus { pokemon, status })
}

/// Parse |-ability|POKEMON|ABILITY with optional [from]EFFECT and [of]SOURCE
pub fn parse_ability(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let ability = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingField("ability".to_string()))?
        .to_string();
    let from = find_keyword(parts, "from");
    let of = parse_of(parts);

    Ok(BattleEvent::Ability {
        pokemon,
        ability,
        from,
        of,
    })
}

/// Parse |-endability|POKEMON
pub fn parse_endability(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    Ok(BattleEvent::EndAbility(pokemon))
}

/// Parse |-item|POKEMON|ITEM with optional [from]EFFECT and [of]SOURCE
pub fn parse_item(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let item = parts
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ParseError::MissingField("item".to_string()))?
        .to_string();
    let from = find_keyword(parts, "from");
    let of = parse_of(parts);

    Ok(BattleEvent::Item {
        pokemon,
        item,
        from,
        of,
    })
}

/// Parse |-enditem|POKEMON|ITEM with optional [from]EFFECT or [eat]
pub fn parse_enditem(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let item = parts.get(1).unwrap_or(&"").to_string();
    let from = find_keyword(parts, "from");
    let eat = parts.iter().any(|p| *p == "[eat]");

    Ok(BattleEvent::EndItem {
        pokemon,
        item,
        from,
        eat,
    })
}

/// Parse |-transform|POKEMON|SPECIES
pub fn parse_transform(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let species = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::Transform { pokemon, species })
}

/// Parse |-mega|POKEMON|MEGASTONE
pub fn parse_mega(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let megastone = parts.get(2).or(parts.get(1)).unwrap_or(&"").to_string();

    Ok(BattleEvent::Mega { pokemon, megastone })
}

/// Parse |-terastallize|POKEMON|TYPE
pub fn parse_terastallize(parts: &[&str]) -> Result<BattleEvent> {
    let pokemon = parse_slot(parts, 0)?;
    let tera_type = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::Terastallize { pokemon, tera_type })
}

/// Parse |-weather|WEATHER
pub fn parse_weather(parts: &[&str]) -> Result<BattleEvent> {
    let weather = parts.first().unwrap_or(&"none").to_string();
    let upkeep = parts.iter().any(|p| *p == "[upkeep]");

    Ok(BattleEvent::Weather { weather, upkeep })
}

/// Parse |-fieldstart|CONDITION
pub fn parse_fieldstart(parts: &[&str]) -> Result<BattleEvent> {
    let condition = parts.first().unwrap_or(&"").to_string();
    Ok(BattleEvent::FieldStart(condition))
}

/// Parse |-fieldend|CONDITION
pub fn parse_fieldend(parts: &[&str]) -> Result<BattleEvent> {
    let condition = parts.first().unwrap_or(&"").to_string();
    Ok(BattleEvent::FieldEnd(condition))
}

/// Parse |-sidestart|SIDE|CONDITION
pub fn parse_sidestart(parts: &[&str]) -> Result<BattleEvent> {
    let side = parse_side(parts)?;
    let condition = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::SideStart { side, condition })
}

/// Parse |-sideend|SIDE|CONDITION
pub fn parse_sideend(parts: &[&str]) -> Result<BattleEvent> {
    let side = parse_side(parts)?;
    let condition = parts.get(1).unwrap_or(&"").to_string();

    Ok(BattleEvent::SideEnd { side, condition })
}
