use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::CalculatorError;
use crate::request::{DamageRequest, DamageResult};

/// Something that can evaluate a [`DamageRequest`]
#[async_trait]
pub trait DamageCalculator: Send + Sync {
    async fn calculate(&self, request: &DamageRequest) -> Result<DamageResult, CalculatorError>;
}

/// Runs a node script that reads a request on stdin and prints a result
///
/// The script prints `{"damage": [...], "description": "...", "koChance": "..."}`
/// on success, or `{"error": "..."}`. A non-zero exit status is reported with
/// the script's stderr.
#[derive(Debug, Clone)]
pub struct NodeCalculator {
    program: PathBuf,
    script: PathBuf,
    timeout: Duration,
}

impl NodeCalculator {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("node"),
            script: script.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Interpreter to run the script with
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, input: Vec<u8>) -> Result<std::process::Output, CalculatorError> {
        let mut child = Command::new(&self.program)
            .arg(&self.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CalculatorError::Spawn)?;

        if let Some(mut stdin) = child.stdin.take() {
            // A script that exits without reading its input is not an error here
            if let Err(e) = stdin.write_all(&input).await {
                debug!(error = %e, "calculator closed stdin early");
            }
        }

        child.wait_with_output().await.map_err(CalculatorError::Spawn)
    }
}

#[async_trait]
impl DamageCalculator for NodeCalculator {
    async fn calculate(&self, request: &DamageRequest) -> Result<DamageResult, CalculatorError> {
        let input = serde_json::to_vec(request)?;

        debug!(
            script = %self.script.display(),
            attacker = %request.attacker.species,
            defender = %request.defender.species,
            move_name = %request.move_name,
            "running damage calculator"
        );

        let output = tokio::time::timeout(self.timeout, self.run(input))
            .await
            .map_err(|_| CalculatorError::Timeout(self.timeout))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CalculatorError::Failed(stderr));
        }

        let parsed: ScriptOutput = serde_json::from_slice(&output.stdout)?;
        parsed.into_result()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScriptOutput {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    damage: Rolls,
    #[serde(default)]
    damage_range: Option<[u32; 2]>,
    #[serde(default, alias = "desc")]
    description: String,
    #[serde(default)]
    ko_chance: Option<String>,
}

/// A single damage number or the full list of rolls
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Rolls {
    One(u32),
    Many(Vec<u32>),
}

impl Default for Rolls {
    fn default() -> Self {
        Rolls::Many(Vec::new())
    }
}

impl ScriptOutput {
    fn into_result(self) -> Result<DamageResult, CalculatorError> {
        if let Some(error) = self.error {
            return Err(CalculatorError::Failed(error));
        }

        let damage = match self.damage {
            Rolls::One(value) => vec![value],
            Rolls::Many(values) => values,
        };

        let damage_range = self.damage_range.unwrap_or_else(|| {
            [
                damage.iter().copied().min().unwrap_or(0),
                damage.iter().copied().max().unwrap_or(0),
            ]
        });

        Ok(DamageResult {
            damage,
            damage_range,
            description: self.description,
            ko_chance: self.ko_chance,
        })
    }
}
