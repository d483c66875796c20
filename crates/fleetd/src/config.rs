//! fleet.toml configuration parser.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Daemon configuration, read once at startup.
///
/// ```toml
/// [worker]
/// command = "/usr/local/bin/my-worker"
/// args = ["--serve"]
///
/// [scaling]
/// threshold = 0.7
/// tick_interval = "10s"
/// max_workers = 16
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    pub worker: WorkerConfig,
    pub scaling: Option<ScalingConfig>,
}

/// The command each worker process runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Optional overrides for the scaling policy defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingConfig {
    pub threshold: Option<f64>,
    /// Duration string: "500ms", "10s", "5m".
    pub tick_interval: Option<String>,
    pub max_workers: Option<usize>,
}

impl FleetConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FleetConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Parse a duration string like "500ms", "10s", "5m". A bare number is
/// taken as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        ms.parse().ok().map(Duration::from_millis)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse().ok().map(Duration::from_secs)
    } else {
        s.parse().ok().map(Duration::from_secs)
    }
}
