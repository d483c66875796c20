//! fleetd — the FleetGrid daemon.
//!
//! Single binary that assembles the autoscaling subsystems:
//! - Fleet registry (live worker handles)
//! - Worker lifecycle manager over the process driver
//! - CPU load source
//! - Autoscale controller
//!
//! # Usage
//!
//! ```text
//! fleetd run --config fleet.toml
//! ```

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::ensure;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};

use fleetgrid_autoscale::{Controller, ScalePolicy};
use fleetgrid_fleet::{FleetRegistry, SharedFleet};
use fleetgrid_load::CpuLoadSource;
use fleetgrid_worker::{CommandDriver, WorkerLifecycle};

use crate::config::{FleetConfig, parse_duration};

#[derive(Parser)]
#[command(name = "fleetd", about = "FleetGrid worker-fleet autoscaler")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the autoscaling daemon.
    Run {
        /// Path to the fleet configuration file.
        #[arg(long, default_value = "fleet.toml")]
        config: PathBuf,

        /// Load threshold in [0, 1]; overrides the config file.
        #[arg(long)]
        threshold: Option<f64>,

        /// Seconds between control-loop ticks; overrides the config file.
        #[arg(long)]
        tick_interval: Option<u64>,

        /// Fleet size ceiling; overrides the config file.
        #[arg(long)]
        max_workers: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fleetd=debug,fleetgrid=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            config,
            threshold,
            tick_interval,
            max_workers,
        } => run(config, threshold, tick_interval, max_workers).await,
    }
}

async fn run(
    config_path: PathBuf,
    threshold: Option<f64>,
    tick_interval: Option<u64>,
    max_workers: Option<usize>,
) -> anyhow::Result<()> {
    info!("FleetGrid daemon starting");

    let config = FleetConfig::from_file(&config_path)?;
    let policy = build_policy(&config, threshold, tick_interval, max_workers)?;

    // ── Initialize subsystems ──────────────────────────────────

    let fleet: SharedFleet = Arc::new(tokio::sync::Mutex::new(FleetRegistry::new()));

    let driver = Arc::new(CommandDriver::new(
        config.worker.command.clone(),
        config.worker.args.clone(),
    ));
    let lifecycle = Arc::new(WorkerLifecycle::new(driver, fleet.clone()));
    info!(command = %config.worker.command, "worker lifecycle initialized");

    let source = Arc::new(CpuLoadSource::new());

    info!(
        max_workers = policy.max_workers,
        threshold = policy.threshold,
        interval_secs = policy.tick_interval.as_secs(),
        "autoscale controller initialized"
    );
    let controller = Controller::new(policy, source, fleet, lifecycle.clone());

    // Baseline fill happens before the first tick. Don't leave a partial
    // fleet behind if it fails.
    let baseline = match controller.fill_to_baseline().await {
        Ok(baseline) => baseline,
        Err(e) => {
            lifecycle.shutdown().await;
            return Err(e.into());
        }
    };
    info!(baseline, "initial fleet online");

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let controller_handle = tokio::spawn(async move {
        controller.run(shutdown_rx).await;
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    let _ = controller_handle.await;

    lifecycle.shutdown().await;

    info!("FleetGrid daemon stopped");
    Ok(())
}

/// Layer the scaling policy: detected-hardware defaults, then the config
/// file, then CLI flags.
fn build_policy(
    config: &FleetConfig,
    threshold: Option<f64>,
    tick_interval: Option<u64>,
    max_workers: Option<usize>,
) -> anyhow::Result<ScalePolicy> {
    let mut policy = ScalePolicy::from_parallelism();

    if let Some(scaling) = &config.scaling {
        if let Some(t) = scaling.threshold {
            policy.threshold = t;
        }
        if let Some(m) = scaling.max_workers {
            policy.max_workers = m;
        }
        if let Some(raw) = &scaling.tick_interval {
            match parse_duration(raw) {
                Some(interval) => policy.tick_interval = interval,
                None => warn!(value = %raw, "unparseable tick_interval, keeping default"),
            }
        }
    }

    if let Some(t) = threshold {
        policy.threshold = t;
    }
    if let Some(secs) = tick_interval {
        policy.tick_interval = Duration::from_secs(secs);
    }
    if let Some(m) = max_workers {
        policy.max_workers = m;
    }

    ensure!(
        (0.0..=1.0).contains(&policy.threshold),
        "threshold must be within [0, 1], got {}",
        policy.threshold
    );
    ensure!(policy.max_workers >= 1, "max_workers must be at least 1");

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScalingConfig, WorkerConfig};

    fn test_config(scaling: Option<ScalingConfig>) -> FleetConfig {
        FleetConfig {
            worker: WorkerConfig {
                command: "sleep".to_string(),
                args: vec!["30".to_string()],
            },
            scaling,
        }
    }

    #[test]
    fn policy_defaults_from_hardware() {
        let policy = build_policy(&test_config(None), None, None, None).unwrap();
        assert!(policy.max_workers >= 2);
        assert_eq!(policy.threshold, 0.7);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let config = test_config(Some(ScalingConfig {
            threshold: Some(0.5),
            tick_interval: Some("2s".to_string()),
            max_workers: Some(6),
        }));

        let policy = build_policy(&config, None, None, None).unwrap();
        assert_eq!(policy.threshold, 0.5);
        assert_eq!(policy.tick_interval, Duration::from_secs(2));
        assert_eq!(policy.max_workers, 6);
    }

    #[test]
    fn cli_flags_override_config_file() {
        let config = test_config(Some(ScalingConfig {
            threshold: Some(0.5),
            tick_interval: Some("2s".to_string()),
            max_workers: Some(6),
        }));

        let policy = build_policy(&config, Some(0.9), Some(30), Some(3)).unwrap();
        assert_eq!(policy.threshold, 0.9);
        assert_eq!(policy.tick_interval, Duration::from_secs(30));
        assert_eq!(policy.max_workers, 3);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let config = test_config(None);
        assert!(build_policy(&config, Some(1.5), None, None).is_err());
        assert!(build_policy(&config, Some(-0.1), None, None).is_err());
    }

    #[test]
    fn zero_max_workers_is_rejected() {
        let config = test_config(None);
        assert!(build_policy(&config, None, None, Some(0)).is_err());
    }
}
