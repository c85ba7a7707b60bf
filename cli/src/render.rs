//! Human-readable report output

use std::fmt::{self, Write};

use chrono::DateTime;
use scout_battle::{BattleMetadata, BattleReport, Outcome, PokemonRecord};

const RULE_WIDTH: usize = 60;

fn heading(out: &mut impl Write, title: &str) -> fmt::Result {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{rule}\n{title}\n{rule}")
}

/// Render a report as plain text
pub fn render_text(report: &BattleReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, report)?;
    Ok(out)
}

fn write_report(out: &mut impl Write, report: &BattleReport) -> fmt::Result {
    render_metadata(out, &report.metadata)?;

    for player in report.teams.keys() {
        heading(out, &format!("TEAM {}", player.to_uppercase()))?;

        let prefix = format!("{player}:");
        for (_, record) in report.pokemon.iter().filter(|(key, _)| key.starts_with(&prefix)) {
            render_pokemon(out, record)?;
        }
        writeln!(out)?;
    }

    if !report.anomalies.is_empty() {
        heading(out, "ANOMALIES")?;
        for anomaly in &report.anomalies {
            writeln!(out, "  turn {}: {}", anomaly.turn, anomaly.message)?;
        }
    }

    Ok(())
}

fn render_metadata(out: &mut impl Write, metadata: &BattleMetadata) -> fmt::Result {
    heading(out, "REPLAY INFORMATION")?;
    if let Some(id) = &metadata.replay_id {
        writeln!(out, "Replay: {id}")?;
    }
    if let Some(format) = metadata.format_name.as_ref().or(metadata.format_id.as_ref()) {
        writeln!(out, "Format: {format}")?;
    }
    let players: Vec<&str> = metadata.players.iter().flatten().map(String::as_str).collect();
    if !players.is_empty() {
        writeln!(out, "Players: {}", players.join(", "))?;
    }
    if let Some(rating) = metadata.rating {
        writeln!(out, "Rating: {rating}")?;
    }
    if let Some(uploaded) = metadata
        .upload_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
    {
        writeln!(out, "Uploaded: {}", uploaded.format("%Y-%m-%d %H:%M UTC"))?;
    }
    if let Some(outcome) = &metadata.outcome {
        writeln!(out, "Result: {}", describe_outcome(outcome))?;
    }
    writeln!(out)
}

fn render_pokemon(out: &mut impl Write, record: &PokemonRecord) -> fmt::Result {
    writeln!(
        out,
        "\n{} ({}) - Level {}\n{}",
        record.name,
        record.species,
        record.level,
        "-".repeat(40)
    )?;

    if let Some(ability) = &record.ability {
        writeln!(out, "  Ability: {ability}")?;
    }
    match (&record.item, &record.last_known_item) {
        (Some(item), _) => writeln!(out, "  Item: {item}")?,
        (None, Some(item)) => writeln!(out, "  Item: {item} (consumed or lost)")?,
        (None, None) => {}
    }
    if !record.moves.is_empty() {
        writeln!(out, "  Moves: {}", record.moves.join(", "))?;
    }

    writeln!(out, "  Stats:")?;
    writeln!(
        out,
        "    K/D Ratio: {:.2} ({}/{})",
        record.kd_ratio, record.knockouts, record.deaths
    )?;
    writeln!(out, "    Damage Dealt: {}", record.damage_dealt)?;
    writeln!(out, "    Damage Taken: {}", record.damage_taken)?;

    if !record.move_kills.is_empty() {
        let kills: Vec<String> = record
            .move_kills
            .iter()
            .map(|(name, count)| format!("{name} x{count}"))
            .collect();
        writeln!(out, "    KOs by move: {}", kills.join(", "))?;
    }

    Ok(())
}

fn describe_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Winner { name } => format!("{name} won"),
        Outcome::Tie => "tie".to_string(),
        Outcome::Forfeit {
            loser,
            winner: Some(winner),
        } => format!("{winner} won ({loser} forfeited)"),
        Outcome::Forfeit { loser, winner: None } => format!("{loser} forfeited"),
    }
}
