//! Source normalization
//!
//! Every input encoding ends up as one canonical sequence of log lines. The
//! encodings are tried in a fixed order: JSON wrapper, HTML page, raw text.

use tracing::debug;

use crate::error::{AttemptFailure, SourceError};
use crate::html;
use crate::wrapper::{ReplayWrapper, parse_wrapper};

/// A log reduced to its lines, with whatever wrapper came along
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedLog {
    pub lines: Vec<String>,
    pub wrapper: Option<ReplayWrapper>,
    /// Where the text was fetched from, if anywhere
    pub origin_url: Option<String>,
}

impl NormalizedLog {
    /// Build from log text, dropping blank lines and trailing whitespace
    pub fn from_log(log: &str, wrapper: Option<ReplayWrapper>, origin_url: Option<&str>) -> Self {
        let lines = log
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            lines,
            wrapper,
            origin_url: origin_url.map(str::to_string),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

/// Normalize text that is already in memory
///
/// An HTML page with no embedded log fails with `Format`; the hosted `.json`
/// fallback needs a fetcher and is done by the loader.
pub fn normalize_text(text: &str, origin_url: Option<&str>) -> Result<NormalizedLog, SourceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut failures = Vec::new();

    let trimmed = text.trim_start();
    if trimmed.starts_with('{') {
        match parse_wrapper(trimmed) {
            Ok((wrapper, log)) => {
                debug!(attempt = "json-wrapper", "normalized json wrapper");
                return Ok(NormalizedLog::from_log(&log, Some(wrapper), origin_url));
            }
            Err(reason) => {
                debug!(attempt = "json-wrapper", %reason, "normalizer attempt failed");
                failures.push(AttemptFailure::new("json-wrapper", reason));
            }
        }
    }

    if html::looks_like_html(text) {
        return match html::extract(text) {
            Ok((log, wrapper)) => Ok(NormalizedLog::from_log(&log, wrapper, origin_url)),
            Err(html_failures) => {
                failures.extend(html_failures);
                Err(SourceError::Format { failures })
            }
        };
    }

    let log = NormalizedLog::from_log(text, None, origin_url);
    if log.lines().any(|line| line.trim_start().starts_with('|')) {
        debug!(attempt = "raw", lines = log.lines.len(), "normalized raw log");
        return Ok(log);
    }

    failures.push(AttemptFailure::new("raw", "no protocol lines starting with `|`"));
    Err(SourceError::Format { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_log() {
        let log = normalize_text("\u{feff}|player|p1|Alice|\r\n\r\n|win|Alice  \n", None).unwrap();

        assert_eq!(log.lines, vec!["|player|p1|Alice|", "|win|Alice"]);
        assert_eq!(log.wrapper, None);
    }

    #[test]
    fn test_json_wrapper_is_preferred() {
        let text = r#"{"id":"gen9ou-1","players":["Alice","Bob"],"log":"|player|p1|Alice|\n|win|Alice"}"#;
        let log = normalize_text(text, Some("https://replay.pokemonshowdown.com/gen9ou-1.json")).unwrap();

        assert_eq!(log.lines, vec!["|player|p1|Alice|", "|win|Alice"]);
        assert_eq!(log.wrapper.unwrap().id.as_deref(), Some("gen9ou-1"));
        assert_eq!(
            log.origin_url.as_deref(),
            Some("https://replay.pokemonshowdown.com/gen9ou-1.json")
        );
    }

    #[test]
    fn test_html_page() {
        let html = r#"<html><script>Replays.embed({"id":"x","log":"|turn|1\n|win|Bob"});</script></html>"#;
        let log = normalize_text(html, None).unwrap();
        assert_eq!(log.lines, vec!["|turn|1", "|win|Bob"]);
    }

    #[test]
    fn test_html_without_log_is_format_error() {
        let Err(SourceError::Format { failures }) = normalize_text("<html><p>hi</p></html>", None)
        else {
            panic!("expected a format error");
        };
        assert_eq!(failures.len(), 3);
    }

    #[test]
    fn test_unrecognized_text() {
        let Err(SourceError::Format { failures }) = normalize_text(r#"{"id": 3}"#, None) else {
            panic!("expected a format error");
        };

        let attempts: Vec<_> = failures.iter().map(|f| f.attempt.as_str()).collect();
        assert_eq!(attempts, vec!["json-wrapper", "raw"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "|player|p1|Alice|\n|switch|p1a: Pikachu|Pikachu, L50|100/100\n|win|Alice";
        assert_eq!(normalize_text(text, None).unwrap(), normalize_text(text, None).unwrap());
    }
}
