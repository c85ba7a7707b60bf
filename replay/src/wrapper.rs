//! JSON replay wrapper
//!
//! Hosted replays are served as a JSON object carrying the log plus
//! descriptive fields such as id, format, players, rating and upload time. Field names follow the
//! replay server's `.json` endpoint.

use scout_battle::BattleMetadata;
use scout_protocol::to_id;
use serde::Serialize;
use serde_json::Value;

/// Descriptive fields of a replay wrapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayWrapper {
    pub id: Option<String>,
    /// Display format name, or an id on older replays
    pub format: Option<String>,
    pub formatid: Option<String>,
    pub players: Vec<String>,
    pub rating: Option<u32>,
    pub upload_time: Option<i64>,
}

impl ReplayWrapper {
    /// Read wrapper fields from a JSON object
    pub fn from_value(value: &Value) -> Self {
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut players: Vec<String> = value
            .get("players")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if players.is_empty() {
            players = ["p1", "p2"].iter().filter_map(|key| text(*key)).collect();
        }

        let rating = value.get("rating").and_then(|r| match r {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.round() as u64)),
            Value::String(s) => s.parse().ok(),
            _ => None,
        });

        let upload_time = value
            .get("uploadtime")
            .or_else(|| value.get("uploadTime"))
            .and_then(Value::as_i64);

        Self {
            id: text("id"),
            format: text("format"),
            formatid: text("formatid"),
            players,
            rating: rating.and_then(|r| u32::try_from(r).ok()).filter(|r| *r > 0),
            upload_time,
        }
    }
}

/// Parse a JSON document carrying a string `log` field
///
/// Returns the wrapper and the log text.
pub fn parse_wrapper(text: &str) -> Result<(ReplayWrapper, String), String> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| e.to_string())?;
    wrapper_from_value(&value)
}

pub(crate) fn wrapper_from_value(value: &Value) -> Result<(ReplayWrapper, String), String> {
    if !value.is_object() {
        return Err("not a JSON object".to_string());
    }

    let log = value
        .get("log")
        .and_then(Value::as_str)
        .ok_or_else(|| "no string `log` field".to_string())?;

    Ok((ReplayWrapper::from_value(value), log.to_string()))
}

/// Fill metadata from a wrapper; wrapper values take precedence
///
/// Without a wrapper id, the replay id is taken from the last path segment of
/// the URL the replay came from.
pub fn overlay_wrapper(
    metadata: &mut BattleMetadata,
    wrapper: Option<&ReplayWrapper>,
    origin_url: Option<&str>,
) {
    if let Some(wrapper) = wrapper {
        if let Some(id) = &wrapper.id {
            metadata.replay_id = Some(id.clone());
        }

        if let Some(format) = &wrapper.format {
            metadata.format_name = Some(format.clone());
            metadata.format_id = Some(to_id(format));
        }
        if let Some(formatid) = &wrapper.formatid {
            metadata.format_id = Some(formatid.clone());
        }

        for (slot, name) in metadata.players.iter_mut().zip(&wrapper.players) {
            *slot = Some(name.clone());
        }

        if wrapper.rating.is_some() {
            metadata.rating = wrapper.rating;
        }
        if wrapper.upload_time.is_some() {
            metadata.upload_time = wrapper.upload_time;
        }
    }

    if metadata.replay_id.is_none() {
        metadata.replay_id = origin_url.and_then(replay_id_from_url);
    }

    metadata.resolve_forfeit_winner();
}

/// Last path segment of a replay URL, without query or `.json`/`.log` suffix
pub fn replay_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let path = match path.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map_or("", |(_, path)| path),
        None => path,
    };
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let segment = segment
        .strip_suffix(".json")
        .or_else(|| segment.strip_suffix(".log"))
        .unwrap_or(segment);

    if segment.is_empty() || segment.contains(':') {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scout_protocol::Outcome;

    #[test]
    fn test_parse_wrapper() {
        let (wrapper, log) = parse_wrapper(
            r#"{"id":"gen9ou-2172099392","format":"[Gen 9] OU","formatid":"gen9ou",
                "players":["Player1","Player2"],"rating":1500,"uploadtime":1718000000,
                "log":"|player|p1|Player1|\n|win|Player1"}"#,
        )
        .unwrap();

        assert_eq!(
            wrapper,
            ReplayWrapper {
                id: Some("gen9ou-2172099392".to_string()),
                format: Some("[Gen 9] OU".to_string()),
                formatid: Some("gen9ou".to_string()),
                players: vec!["Player1".to_string(), "Player2".to_string()],
                rating: Some(1500),
                upload_time: Some(1718000000),
            }
        );
        assert_eq!(log, "|player|p1|Player1|\n|win|Player1");
    }

    #[test]
    fn test_legacy_player_fields() {
        let (wrapper, _) =
            parse_wrapper(r#"{"p1":"Alice","p2":"Bob","format":"gen9ou","log":""}"#).unwrap();
        assert_eq!(wrapper.players, vec!["Alice", "Bob"]);
        assert_eq!(wrapper.rating, None);
    }

    #[test]
    fn test_parse_wrapper_requires_log() {
        assert!(parse_wrapper(r#"{"id":"x"}"#).is_err());
        assert!(parse_wrapper(r#"["log"]"#).is_err());
        assert!(parse_wrapper("|move|p1a: X|Tackle").is_err());
    }

    #[test]
    fn test_overlay_wrapper_takes_precedence() {
        let mut metadata = BattleMetadata {
            format_id: Some("gen9ou".to_string()),
            format_name: Some("[Gen 9] OU".to_string()),
            players: [Some("alice".to_string()), Some("bob".to_string())],
            rating: Some(1200),
            outcome: Some(Outcome::Forfeit {
                loser: "Bob".to_string(),
                winner: None,
            }),
            ..Default::default()
        };

        let wrapper = ReplayWrapper {
            id: Some("gen9ou-1".to_string()),
            formatid: Some("gen9ou".to_string()),
            players: vec!["Alice".to_string(), "Bob".to_string()],
            rating: Some(1500),
            upload_time: Some(1718000000),
            ..Default::default()
        };

        overlay_wrapper(&mut metadata, Some(&wrapper), None);

        assert_eq!(metadata.replay_id.as_deref(), Some("gen9ou-1"));
        assert_eq!(metadata.format_name.as_deref(), Some("[Gen 9] OU"));
        assert_eq!(metadata.players[0].as_deref(), Some("Alice"));
        assert_eq!(metadata.rating, Some(1500));
        assert_eq!(metadata.upload_time, Some(1718000000));
        assert_eq!(
            metadata.outcome,
            Some(Outcome::Forfeit {
                loser: "Bob".to_string(),
                winner: Some("Alice".to_string()),
            })
        );
    }

    #[test]
    fn test_replay_id_from_origin_url() {
        let mut metadata = BattleMetadata::default();
        overlay_wrapper(
            &mut metadata,
            None,
            Some("https://replay.pokemonshowdown.com/gen9ou-2172099392?p2"),
        );
        assert_eq!(metadata.replay_id.as_deref(), Some("gen9ou-2172099392"));

        assert_eq!(
            replay_id_from_url("https://replay.pokemonshowdown.com/gen9ou-1.json"),
            Some("gen9ou-1".to_string())
        );
        assert_eq!(replay_id_from_url("https://replay.pokemonshowdown.com/"), None);
    }
}
