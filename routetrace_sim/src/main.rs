//! RouteTrace Simulator CLI
//!
//! Animate a marker from start to end on virtual time (default) or on the
//! wall clock, check the run and optionally export the trail.

use clap::Parser;
use routetrace_core::{
    LogSurface, PresentationSurface, RecordingSurface, StrategyConfig, Tracker, TrackerConfig,
    TrackerError,
};
use routetrace_env::{RunId, Teardown, TeardownListener, TokioContext, TrackerContext};
use routetrace_sim::{DriveMode, ExportError, RerunSurface, RunChecker, RunResult, RunRunner, TrailExport};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

/// RouteTrace location-tracking simulator
#[derive(Parser, Debug)]
#[command(name = "routetrace-sim")]
#[command(about = "Animate a tracked marker between two points", long_about = None)]
struct Args {
    /// Drive mode (fixed_tick, frame_driven)
    #[arg(short, long)]
    mode: Option<String>,

    /// Fixed-tick timer period in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Fixed-tick progress increment
    #[arg(long)]
    step: Option<f64>,

    /// Frame-driven frame period in milliseconds
    #[arg(long)]
    frame_ms: Option<u64>,

    /// Frame-driven journey duration in milliseconds
    #[arg(long)]
    journey_ms: Option<u64>,

    #[arg(long, allow_hyphen_values = true)]
    start_lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    start_lng: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    end_lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    end_lng: Option<f64>,

    /// Initial map zoom
    #[arg(short, long)]
    zoom: Option<u8>,

    /// Load configuration from a JSON file (flags override it)
    #[arg(short, long)]
    config: Option<String>,

    /// Run on wall-clock time instead of virtual time
    #[arg(long)]
    realtime: bool,

    /// Tear down after this many seconds
    #[arg(long)]
    teardown_after: Option<f64>,

    /// Derive the run id from a seed
    #[arg(long)]
    seed: Option<u64>,

    /// List drive modes and exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export the trail to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// Show the terminal map (implies --realtime)
    #[arg(long)]
    dashboard: bool,

    /// Stream to a Rerun map view
    #[arg(long)]
    rerun: bool,
}

fn build_config(args: &Args) -> Result<TrackerConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
                path: path.clone(),
                source,
            })?;
            TrackerConfig::from_json(&json)?
        }
        None => TrackerConfig::default(),
    };

    if let Some(mode) = &args.mode {
        let mode: DriveMode = mode.parse().map_err(CliError::Usage)?;
        if DriveMode::of(&config.strategy) != mode {
            config.strategy = mode.default_strategy();
        }
    }

    config.strategy = match config.strategy {
        StrategyConfig::FixedTick { interval_ms, step } => StrategyConfig::FixedTick {
            interval_ms: args.interval_ms.unwrap_or(interval_ms),
            step: args.step.unwrap_or(step),
        },
        StrategyConfig::FrameDriven {
            frame_interval_ms,
            journey_ms,
        } => StrategyConfig::FrameDriven {
            frame_interval_ms: args.frame_ms.unwrap_or(frame_interval_ms),
            journey_ms: args.journey_ms.unwrap_or(journey_ms),
        },
    };

    if let Some(lat) = args.start_lat {
        config.start.position.lat = lat;
    }
    if let Some(lng) = args.start_lng {
        config.start.position.lng = lng;
    }
    if let Some(lat) = args.end_lat {
        config.end.position.lat = lat;
    }
    if let Some(lng) = args.end_lng {
        config.end.position.lng = lng;
    }
    if let Some(zoom) = args.zoom {
        config.zoom = zoom;
    }

    config.validate()?;
    Ok(config)
}

fn teardown_after(args: &Args) -> Result<Option<Duration>, CliError> {
    args.teardown_after
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| CliError::Usage(format!("invalid --teardown-after {secs}: {e}")))
        })
        .transpose()
}

fn rerun_surface(args: &Args) -> RerunSurface {
    if args.rerun {
        RerunSurface::new("routetrace")
    } else {
        RerunSurface::disabled()
    }
}

fn export<Ctx, S>(tracker: &Tracker<Ctx, S>, path: &str) -> Result<(), CliError>
where
    Ctx: TrackerContext,
    S: PresentationSurface,
{
    let export = TrailExport::from_tracker(tracker);
    export.write_to_file(path)?;
    info!("Exported {} frames to {}", export.frames.len(), path);
    Ok(())
}

/// Runs on a virtual clock: finishes immediately.
fn run_virtual(args: &Args, config: TrackerConfig) -> Result<RunResult, CliError> {
    let mut runner = RunRunner::new(config);
    if let Some(after) = teardown_after(args)? {
        runner = runner.with_teardown_after(after);
    }
    if let Some(seed) = args.seed {
        runner = runner.with_seed(seed);
    }

    let mut tracker = runner.execute(rerun_surface(args))?;
    let result = runner.evaluate(&mut tracker);

    if let Some(path) = &args.export {
        export(&tracker, path)?;
    }
    Ok(result)
}

/// Runs on tokio timers. Ctrl-C tears the run down.
async fn drive_realtime<S>(
    args: &Args,
    config: TrackerConfig,
    surface: S,
    teardown: Teardown,
    listener: TeardownListener,
) -> Result<RunResult, CliError>
where
    S: PresentationSurface,
{
    let recording = RecordingSurface::new();
    let context = TokioContext::shared();
    let mut tracker = Tracker::new(Arc::clone(&context), (recording.clone(), surface), config)?;
    if let Some(seed) = args.seed {
        tracker = tracker.with_run_id(RunId::from_seed(seed));
    }

    let on_ctrl_c = teardown.clone();
    context.spawn("ctrl-c", async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, tearing down");
            let _ = on_ctrl_c.signal();
        }
    });

    if let Some(after) = teardown_after(args)? {
        let timer = Arc::clone(&context);
        let on_timer = teardown.clone();
        context.spawn("teardown-timer", async move {
            timer.sleep(after).await;
            let _ = on_timer.signal();
        });
    }

    tracker.run(listener).await?;

    let config = tracker.config().clone();
    let verdict = RunChecker::new(&config).check(&mut tracker, &recording);

    if let Some(path) = &args.export {
        export(&tracker, path)?;
    }
    Ok(RunResult::summarize(&tracker, verdict))
}

fn run_realtime(args: &Args, config: TrackerConfig) -> Result<RunResult, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (teardown, listener) = Teardown::new();

    #[cfg(feature = "dashboard")]
    if args.dashboard {
        let (terminal, mut dashboard) = routetrace_core::dashboard::terminal_map();
        let on_quit = teardown.clone();
        let ui = std::thread::spawn(move || {
            let outcome = dashboard.run();
            let _ = on_quit.signal();
            outcome
        });

        let result = runtime.block_on(drive_realtime(
            args,
            config,
            (rerun_surface(args), terminal),
            teardown,
            listener,
        ));
        match ui.join() {
            Ok(Err(e)) => warn!("Dashboard error: {}", e),
            Err(_) => warn!("Dashboard thread panicked"),
            Ok(Ok(())) => {}
        }
        return result;
    }

    #[cfg(not(feature = "dashboard"))]
    if args.dashboard {
        warn!("Dashboard not available (compile with --features dashboard)");
    }

    runtime.block_on(drive_realtime(
        args,
        config,
        (rerun_surface(args), LogSurface::new()),
        teardown,
        listener,
    ))
}

fn report(result: &RunResult, json: bool) {
    if json {
        let summary = serde_json::json!({
            "mode": result.mode.name(),
            "run_id": result.run_id.to_string(),
            "passed": result.passed,
            "steps": result.steps,
            "progress": result.final_progress,
            "path_len": result.path_len,
            "trail_km": result.trail_km,
            "elapsed_secs": result.elapsed_secs,
            "torn_down": result.torn_down,
            "failure_reason": result.failure_reason,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to encode summary: {}", e),
        }
        return;
    }

    if result.passed {
        info!(
            "✓ {} [{}] PASSED: {} steps, {:.1} km in {:.1}s{}",
            result.mode.name(),
            result.run_id,
            result.steps,
            result.trail_km,
            result.elapsed_secs,
            if result.torn_down { " (torn down)" } else { "" }
        );
    } else {
        error!(
            "✗ {} [{}] FAILED: {}",
            result.mode.name(),
            result.run_id,
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging; the dashboard owns the terminal, so keep it quiet
    let level = if args.dashboard {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if args.list {
        for mode in DriveMode::all() {
            println!("{:<14} {}", mode.name(), mode.description());
        }
        return;
    }

    if !args.json {
        info!("RouteTrace Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let outcome = build_config(&args).and_then(|config| {
        if args.realtime || args.dashboard {
            run_realtime(&args, config)
        } else {
            run_virtual(&args, config)
        }
    });

    match outcome {
        Ok(result) => {
            report(&result, args.json);
            // Exit with proper code for CI
            if !result.passed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
