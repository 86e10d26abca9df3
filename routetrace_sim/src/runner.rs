//! Run executor - drives a tracker on virtual time and checks the result.

use crate::context::SimContext;
use crate::scenarios::DriveMode;

use routetrace_core::{
    AnimationState, PresentationSurface, RecordingSurface, SurfaceCall, Tracker, TrackerConfig,
    TrackerError, TrackerSnapshot,
};
use routetrace_env::{EnvError, RunId, Teardown, TrackerContext};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Extra steps attempted after a run ends; none of them may change state.
const FROZEN_PROBE_STEPS: usize = 5;

/// Tracker as driven by the simulator: virtual clock, recording surface
/// paired with the caller's surface.
pub type SimTracker<S> = Tracker<SimContext, (RecordingSurface, S)>;

/// Results from one simulated run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Strategy family that drove the run
    pub mode: DriveMode,

    /// Run identifier
    pub run_id: RunId,

    /// Whether every invariant held
    pub passed: bool,

    /// Steps after the initial point
    pub steps: u64,

    /// Final progress fraction
    pub final_progress: f64,

    /// Trail points including the start
    pub path_len: usize,

    /// Great-circle length of the trail
    pub trail_km: f64,

    /// Virtual seconds from start to the last step
    pub elapsed_secs: f64,

    /// Whether the run was torn down before arriving
    pub torn_down: bool,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

impl RunResult {
    /// Builds a result from a finished tracker and its check verdict.
    pub fn summarize<Ctx, S>(tracker: &Tracker<Ctx, S>, verdict: Result<(), String>) -> Self
    where
        Ctx: TrackerContext,
        S: PresentationSurface,
    {
        let snapshot = tracker.snapshot();
        match &verdict {
            Ok(()) => debug!("[{}] All run invariants hold", snapshot.run_id),
            Err(reason) => warn!("[{}] Run check failed: {}", snapshot.run_id, reason),
        }

        let history = tracker.history();
        let elapsed_secs = match (history.first(), history.last()) {
            (Some(first), Some(last)) => (last.at - first.at).as_secs_f64(),
            _ => 0.0,
        };

        Self {
            mode: DriveMode::of(&tracker.config().strategy),
            run_id: snapshot.run_id,
            passed: verdict.is_ok(),
            steps: snapshot.steps,
            final_progress: snapshot.progress.value(),
            path_len: snapshot.path_len,
            trail_km: snapshot.trail_km,
            elapsed_secs,
            torn_down: snapshot.torn_down,
            failure_reason: verdict.err(),
        }
    }
}

/// Runs a configured journey on a [`SimContext`].
pub struct RunRunner {
    config: TrackerConfig,

    /// Tear down once virtual time reaches this point
    teardown_after: Option<Duration>,

    /// Deterministic run id
    seed: Option<u64>,
}

impl RunRunner {
    /// Creates a new runner.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            teardown_after: None,
            seed: None,
        }
    }

    /// Runner with default endpoints for the given mode.
    pub fn for_mode(mode: DriveMode) -> Self {
        Self::new(TrackerConfig {
            strategy: mode.default_strategy(),
            ..Default::default()
        })
    }

    /// Signals teardown once the virtual clock passes `after`.
    pub fn with_teardown_after(mut self, after: Duration) -> Self {
        self.teardown_after = Some(after);
        self
    }

    /// Derives the run id from a seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn mode(&self) -> DriveMode {
        DriveMode::of(&self.config.strategy)
    }

    /// Runs to completion (or teardown) and returns the tracker.
    ///
    /// `surface` receives every call alongside the internal recording.
    pub fn execute<S>(&self, surface: S) -> Result<SimTracker<S>, TrackerError>
    where
        S: PresentationSurface,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| EnvError::context(format!("failed to build runtime: {e}")))?;

        let context = SimContext::shared();
        let mut tracker = Tracker::new(
            Arc::clone(&context),
            (RecordingSurface::new(), surface),
            self.config.clone(),
        )?;
        if let Some(seed) = self.seed {
            tracker = tracker.with_run_id(RunId::from_seed(seed));
        }

        info!(
            "[{}] Starting {} run ({})",
            tracker.run_id(),
            self.mode().name(),
            self.mode().description()
        );

        runtime.block_on(async {
            match self.teardown_after {
                None => {
                    let (_teardown, listener) = Teardown::new();
                    tracker.run(listener).await?;
                }
                Some(limit) => {
                    // Stepped by hand so teardown lands at an exact virtual time
                    tracker.start()?;
                    let interval = tracker.interval();
                    while tracker.state() == AnimationState::Animating {
                        if context.now() >= limit {
                            tracker.teardown();
                            break;
                        }
                        context.sleep(interval).await;
                        tracker.step()?;
                    }
                }
            }
            Ok::<(), TrackerError>(())
        })?;

        Ok(tracker)
    }

    /// Summarizes and checks a finished tracker.
    pub fn evaluate<S>(&self, tracker: &mut SimTracker<S>) -> RunResult
    where
        S: PresentationSurface,
    {
        let recording = tracker.surface().0.clone();
        let verdict = RunChecker::new(&self.config).check(tracker, &recording);
        RunResult::summarize(tracker, verdict)
    }

    /// Executes against `surface`, then checks. Errors become failed results.
    pub fn run_with<S>(&self, surface: S) -> RunResult
    where
        S: PresentationSurface,
    {
        match self.execute(surface) {
            Ok(mut tracker) => self.evaluate(&mut tracker),
            Err(e) => RunResult {
                mode: self.mode(),
                run_id: self.seed.map(RunId::from_seed).unwrap_or_default(),
                passed: false,
                steps: 0,
                final_progress: 0.0,
                path_len: 0,
                trail_km: 0.0,
                elapsed_secs: 0.0,
                torn_down: false,
                failure_reason: Some(e.to_string()),
            },
        }
    }

    /// Executes against a bare recording surface and checks.
    pub fn run(&self) -> RunResult {
        self.run_with(RecordingSurface::new())
    }
}

/// Verifies the trail invariants of a finished run.
pub struct RunChecker<'a> {
    config: &'a TrackerConfig,
}

impl<'a> RunChecker<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    /// Returns the first violated invariant, if any.
    ///
    /// Probes the tracker with extra steps, which must all be no-ops.
    pub fn check<Ctx, S>(
        &self,
        tracker: &mut Tracker<Ctx, S>,
        recording: &RecordingSurface,
    ) -> Result<(), String>
    where
        Ctx: TrackerContext,
        S: PresentationSurface,
    {
        let snapshot = tracker.snapshot();
        let path = tracker.path();
        let start = self.config.start.position;
        let end = self.config.end.position;

        if path.first() != start {
            return Err(format!("trail starts at {} instead of {}", path.first(), start));
        }
        if path.len() as u64 != snapshot.steps + 1 {
            return Err(format!(
                "trail has {} points after {} steps",
                path.len(),
                snapshot.steps
            ));
        }
        if tracker.history().len() != path.len() {
            return Err(format!(
                "{} history records for {} trail points",
                tracker.history().len(),
                path.len()
            ));
        }
        for pair in tracker.history().windows(2) {
            if pair[1].progress < pair[0].progress {
                return Err(format!(
                    "progress went backwards: {} -> {}",
                    pair[0].progress, pair[1].progress
                ));
            }
            if pair[1].at < pair[0].at {
                return Err("step timestamps went backwards".to_string());
            }
        }

        match snapshot.state {
            AnimationState::Complete => {
                if !snapshot.progress.is_complete() {
                    return Err(format!("complete at {}", snapshot.progress));
                }
                if path.last() != end {
                    return Err(format!("trail ends at {} instead of {}", path.last(), end));
                }
            }
            AnimationState::Animating if snapshot.torn_down => {}
            state => return Err(format!("run stopped while {}", state)),
        }

        self.check_surface(tracker, recording, &snapshot)?;
        self.check_frozen(tracker, &snapshot)
    }

    fn check_surface<Ctx, S>(
        &self,
        tracker: &Tracker<Ctx, S>,
        recording: &RecordingSurface,
        snapshot: &TrackerSnapshot,
    ) -> Result<(), String>
    where
        Ctx: TrackerContext,
        S: PresentationSurface,
    {
        let initial_views = recording
            .calls()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::InitialView(_)))
            .count();
        if initial_views != 1 {
            return Err(format!("initial view set {} times", initial_views));
        }
        if recording.last_path().as_deref() != Some(tracker.path().points()) {
            return Err("surface trail differs from the tracker trail".to_string());
        }
        let pans = recording.pans().len() as u64;
        if pans != snapshot.steps {
            return Err(format!("{} pans for {} steps", pans, snapshot.steps));
        }
        Ok(())
    }

    fn check_frozen<Ctx, S>(
        &self,
        tracker: &mut Tracker<Ctx, S>,
        before: &TrackerSnapshot,
    ) -> Result<(), String>
    where
        Ctx: TrackerContext,
        S: PresentationSurface,
    {
        for _ in 0..FROZEN_PROBE_STEPS {
            tracker.step().map_err(|e| e.to_string())?;
        }
        let after = tracker.snapshot();
        if after.path_len != before.path_len || after.progress != before.progress {
            return Err(format!(
                "state changed after the run ended: {} points at {} became {} points at {}",
                before.path_len, before.progress, after.path_len, after.progress
            ));
        }
        Ok(())
    }
}
