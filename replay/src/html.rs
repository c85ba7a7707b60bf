//! Replay log extraction from HTML pages
//!
//! Replay pages embed the log in one of a few ways. Each is tried in order and
//! the reason every failed attempt gave is kept for diagnostics.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::error::AttemptFailure;
use crate::wrapper::{ReplayWrapper, wrapper_from_value};

static REPLAYS_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Replays\s*\.\s*(embed|append|render)\s*\(\s*").expect("valid regex")
});

static LOG_DATA_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*\bclass\s*=\s*["']battle-log-data["'][^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

static LOG_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""log"\s*:\s*""#).expect("valid regex"));

static CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<link\b[^>]*\brel\s*=\s*["']canonical["'][^>]*\bhref\s*=\s*["']([^"']+)["']|<link\b[^>]*\bhref\s*=\s*["']([^"']+)["'][^>]*\brel\s*=\s*["']canonical["']"#,
    )
    .expect("valid regex")
});

static OG_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta\b[^>]*\bproperty\s*=\s*["']og:url["'][^>]*\bcontent\s*=\s*["']([^"']+)["']|<meta\b[^>]*\bcontent\s*=\s*["']([^"']+)["'][^>]*\bproperty\s*=\s*["']og:url["']"#,
    )
    .expect("valid regex")
});

type Extracted = (String, Option<ReplayWrapper>);

/// Host serving replays and their `.json` endpoints
pub const REPLAY_HOST: &str = "replay.pokemonshowdown.com";

/// How many opening braces before a `"log"` key are tried as the blob start
const MAX_BLOB_CANDIDATES: usize = 8;

/// Whether a document looks like an HTML page
pub fn looks_like_html(text: &str) -> bool {
    let head: String = text.chars().take(4096).collect::<String>().to_lowercase();
    head.contains("<html") || head.contains("<script") || head.contains("<!doctype")
}

/// Extract the log (and wrapper, when embedded as an object) from a page
pub fn extract(html: &str) -> Result<Extracted, Vec<AttemptFailure>> {
    let mut failures = Vec::new();

    let attempts: [(&str, fn(&str) -> Result<Extracted, String>); 3] = [
        ("replays-call", from_replays_call),
        ("battle-log-data", from_log_data_script),
        ("log-blob", from_log_blob),
    ];

    for (attempt, extract) in attempts {
        match extract(html) {
            Ok(found) => {
                debug!(attempt, "extracted log from html");
                return Ok(found);
            }
            Err(reason) => {
                debug!(attempt, %reason, "html attempt failed");
                failures.push(AttemptFailure::new(attempt, reason));
            }
        }
    }

    Err(failures)
}

/// `Replays.embed({...})`, `Replays.append({...})` or `Replays.render({...})`
fn from_replays_call(html: &str) -> Result<Extracted, String> {
    let mut last_error = "no Replays.embed/append/render call".to_string();

    for found in REPLAYS_CALL.find_iter(html) {
        let rest = &html[found.end()..];
        let Some(object) = balanced_object(rest) else {
            last_error = "call argument is not an object literal".to_string();
            continue;
        };

        let cleaned = clean_js_object(object);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => match wrapper_from_value(&value) {
                Ok((wrapper, log)) => return Ok((log, Some(wrapper))),
                Err(reason) => last_error = reason,
            },
            Err(e) => last_error = format!("invalid object literal: {e}"),
        }
    }

    Err(last_error)
}

/// `<script type="text/plain" class="battle-log-data">...</script>`
fn from_log_data_script(html: &str) -> Result<Extracted, String> {
    let captures = LOG_DATA_SCRIPT
        .captures(html)
        .ok_or_else(|| "no battle-log-data script".to_string())?;

    let log = decode_entities(captures.get(1).map_or("", |m| m.as_str()));
    if log.trim().is_empty() {
        return Err("battle-log-data script is empty".to_string());
    }

    Ok((log, None))
}

/// Any object literal with a `"log": "..."` key
fn from_log_blob(html: &str) -> Result<Extracted, String> {
    let mut last_error = "no object with a \"log\" key".to_string();

    for found in LOG_KEY.find_iter(html) {
        let before = &html[..found.start()];
        let starts = before.rmatch_indices('{').take(MAX_BLOB_CANDIDATES);

        for (start, _) in starts {
            let Some(object) = balanced_object(&html[start..]) else {
                continue;
            };
            // The candidate must enclose the key
            if start + object.len() <= found.end() {
                continue;
            }

            let cleaned = clean_js_object(object);
            match serde_json::from_str::<Value>(&cleaned)
                .map_err(|e| e.to_string())
                .and_then(|value| wrapper_from_value(&value))
            {
                Ok((wrapper, log)) => return Ok((log, Some(wrapper))),
                Err(reason) => last_error = reason,
            }
        }
    }

    Err(last_error)
}

/// Find the hosted replay URL a page refers to
///
/// The page's own URL wins when it is on the replay host; otherwise the
/// canonical link or `og:url` meta is used.
pub fn hosted_replay_url(html: &str, origin_url: Option<&str>) -> Option<String> {
    if let Some(origin) = origin_url
        && is_hosted_replay(origin)
    {
        return Some(origin.to_string());
    }

    [&*CANONICAL, &*OG_URL]
        .into_iter()
        .flat_map(|regex| regex.captures_iter(html))
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|m| decode_entities(m.as_str()))
        .find(|url| is_hosted_replay(url))
}

fn is_hosted_replay(url: &str) -> bool {
    let Some((_, rest)) = url.split_once("://") else {
        return false;
    };
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));
    host.eq_ignore_ascii_case(REPLAY_HOST) && !path.trim_matches('/').is_empty()
}

/// The `.json` endpoint for a hosted replay URL
pub fn json_endpoint(url: &str) -> String {
    let base = url.split(['?', '#']).next().unwrap_or(url);
    let base = base.trim_end_matches('/');
    if base.ends_with(".json") {
        base.to_string()
    } else {
        format!("{base}.json")
    }
}

/// Slice out a `{...}` object literal starting at the first non-space char
///
/// String contents (single or double quoted) are skipped so braces inside the
/// log do not count.
fn balanced_object(text: &str) -> Option<&str> {
    let start = text.len() - text.trim_start().len();
    if !text[start..].starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Turn a JavaScript object literal into JSON
///
/// Removes trailing commas, quotes bare keys and converts single-quoted
/// strings. String contents are left alone.
fn clean_js_object(object: &str) -> String {
    let chars: Vec<char> = object.chars().collect();
    let mut out = String::with_capacity(object.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        match c {
            '"' => {
                let end = string_end(&chars, i, '"');
                out.extend(&chars[i..end]);
                i = end;
                continue;
            }
            '\'' => {
                let end = string_end(&chars, i, '\'');
                out.push('"');
                let mut j = i + 1;
                while j < end.saturating_sub(1) {
                    match chars[j] {
                        '\\' if chars.get(j + 1) == Some(&'\'') => {
                            out.push('\'');
                            j += 2;
                            continue;
                        }
                        '\\' => {
                            out.push('\\');
                            if let Some(next) = chars.get(j + 1) {
                                out.push(*next);
                            }
                            j += 2;
                            continue;
                        }
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                    j += 1;
                }
                out.push('"');
                i = end;
                continue;
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    i += 1;
                    continue;
                }
            }
            c if is_ident_start(c) && key_position(&out) => {
                let mut end = i;
                while end < chars.len() && is_ident_char(chars[end]) {
                    end += 1;
                }
                let next = chars[end..].iter().find(|c| !c.is_whitespace());
                if next == Some(&':') {
                    out.push('"');
                    out.extend(&chars[i..end]);
                    out.push('"');
                    i = end;
                    continue;
                }
            }
            _ => {}
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Index one past the closing quote of the string starting at `start`
fn string_end(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn key_position(out: &str) -> bool {
    matches!(out.trim_end().chars().last(), Some('{') | Some(','))
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Decode the HTML entities that appear in embedded logs
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let window = rest.char_indices().nth(12).map_or(rest.len(), |(i, _)| i);
        let Some(semi) = rest[..window].find(';') else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };

        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LOG: &str = "|player|p1|Alice|\n|player|p2|Bob|\n|win|Alice";

    #[test]
    fn test_replays_append_with_trailing_commas() {
        let html = r#"<html><body><script>
            Replays.append({
                "id": "gen9ou-2172099392",
                "format": "gen9ou",
                "players": ["Alice", "Bob",],
                "log": "|player|p1|Alice|\n|player|p2|Bob|\n|win|Alice",
            });
        </script></body></html>"#;

        let (log, wrapper) = extract(html).unwrap();
        assert_eq!(log, LOG);

        let wrapper = wrapper.unwrap();
        assert_eq!(wrapper.id.as_deref(), Some("gen9ou-2172099392"));
        assert_eq!(wrapper.players, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_replays_embed_with_bare_keys() {
        let html = r#"<script>Replays.embed({id: 'gen9ou-test123', format: 'gen9ou', log: '|win|Alice {gg}'})</script>"#;

        let (log, wrapper) = extract(html).unwrap();
        assert_eq!(log, "|win|Alice {gg}");
        assert_eq!(wrapper.unwrap().id.as_deref(), Some("gen9ou-test123"));
    }

    #[test]
    fn test_replays_render() {
        let html = r#"<script>Replays . render ( {"log": "|win|Bob"} );</script>"#;
        assert_eq!(extract(html).unwrap().0, "|win|Bob");
    }

    #[test]
    fn test_battle_log_data_script() {
        let html = "<!DOCTYPE html><html><script type=\"text/plain\" class=\"battle-log-data\">\
                    |c|Alice|&lt;3 &amp; gl\n|win|Alice</script></html>";

        let (log, wrapper) = extract(html).unwrap();
        assert_eq!(log, "|c|Alice|<3 & gl\n|win|Alice");
        assert!(wrapper.is_none());
    }

    #[test]
    fn test_log_blob() {
        let html = r#"<html><script>var data = {"id": "x-1", "log": "|win|Alice", "views": 3};</script></html>"#;

        let (log, wrapper) = extract(html).unwrap();
        assert_eq!(log, "|win|Alice");
        assert_eq!(wrapper.unwrap().id.as_deref(), Some("x-1"));
    }

    #[test]
    fn test_failures_are_collected_in_order() {
        let failures = extract("<html><body>nothing here</body></html>").unwrap_err();

        let attempts: Vec<_> = failures.iter().map(|f| f.attempt.as_str()).collect();
        assert_eq!(attempts, vec!["replays-call", "battle-log-data", "log-blob"]);
    }

    #[test]
    fn test_hosted_replay_url() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://replay.pokemonshowdown.com/gen9ou-2172099392" />
        </head></html>"#;

        assert_eq!(
            hosted_replay_url(html, None).as_deref(),
            Some("https://replay.pokemonshowdown.com/gen9ou-2172099392")
        );

        let og = r#"<meta content="https://replay.pokemonshowdown.com/gen9ou-1" property="og:url">"#;
        assert_eq!(
            hosted_replay_url(og, Some("file:///tmp/x.html")).as_deref(),
            Some("https://replay.pokemonshowdown.com/gen9ou-1")
        );

        let elsewhere = r#"<link rel="canonical" href="https://example.com/gen9ou-1">"#;
        assert_eq!(hosted_replay_url(elsewhere, None), None);

        assert_eq!(
            hosted_replay_url("", Some("https://replay.pokemonshowdown.com/gen9ou-5?p2")).as_deref(),
            Some("https://replay.pokemonshowdown.com/gen9ou-5?p2")
        );
    }

    #[test]
    fn test_json_endpoint() {
        assert_eq!(
            json_endpoint("https://replay.pokemonshowdown.com/gen9ou-5?p2"),
            "https://replay.pokemonshowdown.com/gen9ou-5.json"
        );
        assert_eq!(
            json_endpoint("https://replay.pokemonshowdown.com/gen9ou-5.json"),
            "https://replay.pokemonshowdown.com/gen9ou-5.json"
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &#39;c&#x27; &unknown; &"), "a & b 'c' &unknown; &");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html>"));
        assert!(!looks_like_html("|player|p1|Alice|"));
    }
}
