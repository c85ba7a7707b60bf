//! Battle metadata
//!
//! Format, players, rating and outcome, read from the command stream before
//! the simulation runs.

use scout_protocol::{BattleEvent, Command, CommandKind, Outcome, Player, to_id};
use serde::Serialize;

/// Descriptive information about one battle
///
/// Anything the log does not state stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BattleMetadata {
    pub replay_id: Option<String>,

    /// Lowercase alphanumeric format id (e.g., "gen9ou")
    pub format_id: Option<String>,

    /// Format name as displayed (e.g., "[Gen 9] OU")
    pub format_name: Option<String>,

    /// p1 and p2 usernames
    pub players: [Option<String>; 2],

    pub rating: Option<u32>,

    /// Unix seconds; only replay wrappers carry it
    pub upload_time: Option<i64>,

    pub generation: Option<u8>,

    pub game_type: Option<String>,

    pub outcome: Option<Outcome>,
}

impl BattleMetadata {
    /// Username of a player, if known
    pub fn player_name(&self, player: Player) -> Option<&str> {
        match player {
            Player::P1 => self.players[0].as_deref(),
            Player::P2 => self.players[1].as_deref(),
            _ => None,
        }
    }

    /// Set the format name and derive its id
    pub fn set_format(&mut self, name: &str) {
        if name.is_empty() {
            return;
        }
        self.format_id = Some(to_id(name));
        self.format_name = Some(name.to_string());
    }

    /// Fill in a forfeit's winner when both players are known
    pub fn resolve_forfeit_winner(&mut self) {
        let Some(Outcome::Forfeit { loser, winner }) = &mut self.outcome else {
            return;
        };
        if winner.is_some() {
            return;
        }

        *winner = match (&self.players[0], &self.players[1]) {
            (Some(p1), Some(p2)) if p1 == loser => Some(p2.clone()),
            (Some(p1), Some(p2)) if p2 == loser => Some(p1.clone()),
            _ => None,
        };
    }
}

/// Scan a command stream for battle metadata
pub fn extract_metadata(commands: &[Command]) -> BattleMetadata {
    let mut metadata = BattleMetadata::default();

    for command in commands {
        if command.kind.is_terminal() {
            metadata.outcome = command.outcome();
            continue;
        }

        if !matches!(
            command.kind,
            CommandKind::Player | CommandKind::Tier | CommandKind::Gen | CommandKind::GameType
        ) {
            continue;
        }

        let Ok(event) = BattleEvent::parse(command) else {
            continue;
        };

        match event {
            BattleEvent::Player {
                player,
                username,
                rating,
                ..
            } => {
                let index = match player {
                    Player::P1 => 0,
                    Player::P2 => 1,
                    _ => continue,
                };

                // Later |player| lines may clear the name when a user leaves
                if !username.is_empty() && metadata.players[index].is_none() {
                    metadata.players[index] = Some(username);
                }
                if metadata.rating.is_none() {
                    metadata.rating = rating;
                }
            }
            BattleEvent::Tier(name) => metadata.set_format(&name),
            BattleEvent::Gen(generation) => metadata.generation = Some(generation),
            BattleEvent::GameType(game_type) => metadata.game_type = Some(game_type),
            _ => {}
        }
    }

    metadata.resolve_forfeit_winner();
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_protocol::parse_log;

    fn metadata_for(log: &str) -> BattleMetadata {
        extract_metadata(&parse_log(log.lines()).commands)
    }

    #[test]
    fn test_extract_metadata() {
        let metadata = metadata_for(
            "|player|p1|Alice|60|1532\n\
             |player|p2|Bob|1|1490\n\
             |gametype|singles\n\
             |gen|9\n\
             |tier|[Gen 9] OU\n\
             |win|Alice",
        );

        assert_eq!(
            metadata,
            BattleMetadata {
                replay_id: None,
                format_id: Some("gen9ou".to_string()),
                format_name: Some("[Gen 9] OU".to_string()),
                players: [Some("Alice".to_string()), Some("Bob".to_string())],
                rating: Some(1532),
                upload_time: None,
                generation: Some(9),
                game_type: Some("singles".to_string()),
                outcome: Some(Outcome::Winner {
                    name: "Alice".to_string()
                }),
            }
        );
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let metadata = metadata_for("|player|p1|Alice|\n|turn|1");

        assert_eq!(metadata.players, [Some("Alice".to_string()), None]);
        assert_eq!(metadata.rating, None);
        assert_eq!(metadata.format_id, None);
        assert_eq!(metadata.outcome, None);
    }

    #[test]
    fn test_player_name_not_cleared_by_leave() {
        let metadata = metadata_for("|player|p1|Alice|\n|player|p2|Bob|\n|player|p1|");
        assert_eq!(metadata.player_name(Player::P1), Some("Alice"));
    }

    #[test]
    fn test_forfeit_winner_resolved() {
        let metadata = metadata_for(
            "|player|p1|Alice|\n\
             |player|p2|Bob|\n\
             |-message|Bob forfeited.",
        );

        assert_eq!(
            metadata.outcome,
            Some(Outcome::Forfeit {
                loser: "Bob".to_string(),
                winner: Some("Alice".to_string()),
            })
        );
    }

    #[test]
    fn test_serializes_missing_as_null() {
        let json = serde_json::to_value(BattleMetadata::default()).unwrap();
        assert!(json["format_id"].is_null());
        assert!(json["outcome"].is_null());
    }
}
