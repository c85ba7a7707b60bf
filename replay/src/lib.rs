//! Replay loading and the full analysis pipeline.
//!
//! ```text
//! ReplaySource ──load──> NormalizedLog ──parse_log──> CommandStream
//!                                                         │
//!                       BattleReport <──report── Simulation::run
//! ```
//!
//! A source is read (file, URL, text or bytes), normalized to log lines,
//! parsed into commands and simulated. Wrapper metadata from a JSON replay
//! is laid over what the log itself declares.
//!
//! # Example Usage
//!
//! ```ignore
//! use scout_replay::{FetchConfig, ReplayLoader, ReplaySource, analyze};
//!
//! let loader = ReplayLoader::http(&FetchConfig::default())?;
//! let source = ReplaySource::parse("https://replay.pokemonshowdown.com/gen9ou-2172099392");
//! let report = analyze(&loader, source).await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

pub mod error;
pub mod fetch;
pub mod html;
pub mod normalize;
pub mod source;
pub mod wrapper;

pub use error::{AttemptFailure, ErrorKind, ReplayError, SourceError};
pub use fetch::{FetchConfig, Fetcher, HttpFetcher};
pub use normalize::{NormalizedLog, normalize_text};
pub use source::{ReplayLoader, ReplaySource};
pub use wrapper::{ReplayWrapper, overlay_wrapper, parse_wrapper};

use scout_battle::{BattleReport, Simulation, SimulationError};
use scout_protocol::parse_log;
use tracing::debug;

/// Load, normalize and simulate one replay
pub async fn analyze<F: Fetcher>(
    loader: &ReplayLoader<F>,
    source: ReplaySource,
) -> Result<BattleReport, ReplayError> {
    let log = loader.load(source).await?;
    Ok(report_from_log(&log)?)
}

/// Simulate an already normalized log
pub fn report_from_log(log: &NormalizedLog) -> Result<BattleReport, SimulationError> {
    let stream = parse_log(log.lines());
    debug!(
        commands = stream.commands.len(),
        filtered = stream.filtered,
        terminated = stream.terminated,
        "parsed log"
    );

    let mut simulation = Simulation::new();
    simulation.run(&stream)?;
    overlay_wrapper(
        simulation.metadata_mut(),
        log.wrapper.as_ref(),
        log.origin_url.as_deref(),
    );

    Ok(simulation.report())
}
