//! license-admin: License Dashboard CLI
//!
//! Runs the dashboard load cycle against an analytics backend (or canned
//! demo data) and writes each display slot to stdout or to per-slot files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use dashboard_telemetry::{init_telemetry, TelemetryConfig};
use license_dashboard::{
    metrics, DashboardConfig, DashboardError, DashboardService, DemoTransport, FileSink,
    HttpRpcTransport, LoadOutcome, OutputTargets, RenderSink, RpcTransport, SecondaryDispatch,
    SectionStatus, StdoutSink,
};

/// license-admin: License Dashboard CLI
#[derive(Parser, Debug)]
#[command(name = "license-admin")]
#[command(about = "Load the license analytics dashboard and render its sections")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides the config file and LD_BACKEND_URL)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write each slot to <DIR>/<slot>.html instead of stdout
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Reload every N seconds until Ctrl-C (0 runs a single cycle)
    #[arg(short, long, default_value = "0")]
    refresh: u64,

    /// Issue the secondary queries concurrently
    #[arg(long)]
    concurrent: bool,

    /// Run against canned data (no backend connection required)
    #[arg(long)]
    demo: bool,

    /// Print Prometheus metrics to stderr after each cycle
    #[arg(long)]
    print_metrics: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    let _telemetry = init_telemetry(telemetry)?;

    let config = resolve_config(&args)?;
    info!(
        backend = %config.backend.base_url,
        demo = args.demo,
        dispatch = ?config.load.secondary_dispatch,
        "Starting license-admin"
    );

    let transport: Arc<dyn RpcTransport> = if args.demo {
        Arc::new(DemoTransport::new())
    } else {
        Arc::new(HttpRpcTransport::new(&config.backend)?)
    };
    let sink: Arc<dyn RenderSink> = match &args.out_dir {
        Some(dir) => Arc::new(
            FileSink::new(dir).with_context(|| format!("cannot use {}", dir.display()))?,
        ),
        None => Arc::new(StdoutSink),
    };

    let dashboard = DashboardService::new(config, transport, OutputTargets::new().bind_all(sink))?;

    if args.refresh == 0 {
        let outcome = dashboard.load().await?;
        summarize(&outcome);
        if args.print_metrics {
            eprint!("{}", metrics::export_text());
        }
        if let LoadOutcome::Failed { error } = outcome {
            bail!("summary statistics unavailable: {error}");
        }
        return Ok(());
    }

    let mut interval = tokio::time::interval(Duration::from_secs(args.refresh));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        // An in-flight cycle is never cancelled: on Ctrl-C the dashboard is
        // unmounted and the cycle runs to completion without rendering.
        let mut stopping = false;
        let load = dashboard.load();
        tokio::pin!(load);
        let result = tokio::select! {
            result = &mut load => result,
            _ = &mut shutdown => {
                info!("Shutdown requested, waiting for the in-flight cycle");
                dashboard.unmount();
                stopping = true;
                load.await
            }
        };

        match result {
            Ok(outcome) => summarize(&outcome),
            Err(DashboardError::LoadInProgress) => warn!("Previous cycle still running, skipping"),
            Err(DashboardError::Unmounted) => break,
            Err(e) => return Err(e.into()),
        }
        if args.print_metrics {
            eprint!("{}", metrics::export_text());
        }
        if stopping {
            break;
        }
    }

    let (cycles, failures) = dashboard.cycle_counts();
    info!(cycles, failures, "Stopped");
    Ok(())
}

/// Config file (or defaults plus environment), then command-line overrides.
fn resolve_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            let mut config = DashboardConfig::default();
            config.apply_env_overrides()?;
            config
        }
    };

    if let Some(endpoint) = &args.endpoint {
        config.backend.base_url = endpoint.clone();
    }
    if args.concurrent {
        config.load.secondary_dispatch = SecondaryDispatch::Concurrent;
    }

    config.validate()?;
    Ok(config)
}

fn summarize(outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Ready(report) => {
            for section in &report.sections {
                match &section.status {
                    SectionStatus::Rendered { rows } => {
                        info!(section = %section.section, rows, "Section rendered")
                    }
                    SectionStatus::Failed(error) => {
                        warn!(section = %section.section, error = %error, "Section unavailable")
                    }
                    SectionStatus::Discarded => {}
                }
            }
            info!(
                total = report.stats.total,
                active = report.stats.active,
                expired = report.stats.expired,
                expiring_soon = report.stats.expiring_soon,
                completed_at = %report.completed_at.to_rfc3339(),
                "Dashboard loaded"
            );
        }
        LoadOutcome::Failed { error } => {
            warn!(error = %error, "Dashboard load failed");
        }
    }
}
