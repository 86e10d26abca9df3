//! Tracker Runtime - drives one animation against a presentation surface.
//!
//! This module is the integration layer between the pure pieces (interpolator,
//! progress strategies, animation state) and the two effectful seams: the
//! environment clock (`TrackerContext`) and the map widget
//! (`PresentationSurface`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Tracker                            │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Context: TrackerContext                 │   │
//! │  │  • sleep() → tick / frame scheduling                 │   │
//! │  │  • now()   → frame-driven elapsed time               │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                              │                              │
//! │  ┌──────────┐  ┌───────────┐  ┌──────────────┐              │
//! │  │ Strategy │─►│ Animation │─►│ Presentation │              │
//! │  │ progress │  │ path/state│  │   Surface    │              │
//! │  └──────────┘  └───────────┘  └──────────────┘              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use routetrace_core::{Tracker, TrackerConfig, LogSurface};
//! use routetrace_env::{TokioContext, Teardown};
//!
//! let (teardown, listener) = Teardown::new();
//! let mut tracker = Tracker::new(TokioContext::shared(), LogSurface::new(), TrackerConfig::default())?;
//! let snapshot = tracker.run(listener).await?;
//! ```

use crate::animation::{Animation, AnimationState};
use crate::config::TrackerConfig;
use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::path::Path;
use crate::progress::Progress;
use crate::strategy::Strategy;
use crate::style::{Marker, MarkerKind};
use crate::surface::{InitialView, PresentationSurface};

use routetrace_env::{RunId, TeardownListener, TrackerContext};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Result of one driver step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Marker moved; journey continues
    Moved(Coordinate),
    /// Marker reached the destination on this step
    Arrived(Coordinate),
    /// Nothing changed (not started, or already complete)
    Unchanged,
    /// Nothing changed because the tracker was torn down
    TornDown,
}

/// A point of the trail together with when it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepRecord {
    /// Context time of the step
    pub at: Duration,
    pub progress: Progress,
    pub position: Coordinate,
}

/// Point-in-time view of a tracker for observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub run_id: RunId,
    pub state: AnimationState,
    pub progress: Progress,
    pub position: Coordinate,
    pub path_len: usize,
    pub steps: u64,
    /// Great-circle length of the trail so far
    pub trail_km: f64,
    /// Great-circle distance left to the destination
    pub remaining_km: f64,
    pub torn_down: bool,
}

/// Drives a marker from start to end on a presentation surface.
///
/// Generic over the context and surface implementations, allowing the same
/// driver to run on tokio timers or a virtual clock, against any surface.
pub struct Tracker<Ctx, S>
where
    Ctx: TrackerContext,
    S: PresentationSurface,
{
    run_id: RunId,
    context: Arc<Ctx>,
    surface: S,
    config: TrackerConfig,
    animation: Animation,
    strategy: Strategy,
    history: Vec<StepRecord>,
    torn_down: bool,
}

impl<Ctx, S> Tracker<Ctx, S>
where
    Ctx: TrackerContext,
    S: PresentationSurface,
{
    /// Creates an idle tracker. Fails only on invalid configuration.
    pub fn new(context: Arc<Ctx>, surface: S, config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;

        let animation = Animation::new(config.start.position, config.end.position);
        let strategy = config.strategy.build();

        Ok(Self {
            run_id: RunId::new(),
            context,
            surface,
            config,
            animation,
            strategy,
            history: Vec::new(),
            torn_down: false,
        })
    }

    /// Replaces the generated run id (deterministic ids in simulation).
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = run_id;
        self
    }

    /// Sets up the surface and enters `Animating`.
    ///
    /// Does nothing if already started. Refuses to start on a surface that
    /// is not ready, or after teardown.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.torn_down {
            return Err(TrackerError::TornDown);
        }
        if self.animation.state() != AnimationState::Idle {
            return Ok(());
        }
        if !self.surface.is_ready() {
            warn!("[{}] Surface not ready, animation not started", self.run_id);
            return Err(TrackerError::SurfaceNotReady);
        }

        self.surface.set_initial_view(&InitialView {
            title: self.config.title.clone(),
            center: self.config.start.position,
            zoom: self.config.zoom,
            tiles: self.config.tiles.clone(),
            icons: self.config.icons.clone(),
        })?;

        let now = self.context.now();
        self.animation.begin();
        self.strategy.begin(now);
        self.history.push(StepRecord {
            at: now,
            progress: self.animation.progress(),
            position: self.animation.position(),
        });
        self.render()?;

        info!(
            "[{}] {} → {} ({:.1} km) via {} every {:?}",
            self.run_id,
            self.config.start.label,
            self.config.end.label,
            self.animation.start().haversine_km(&self.animation.end()),
            self.strategy.name(),
            self.strategy.interval()
        );
        Ok(())
    }

    /// Advances the animation by one tick or frame.
    ///
    /// A no-op once complete, before `start()`, or after teardown.
    pub fn step(&mut self) -> Result<StepOutcome, TrackerError> {
        if self.torn_down {
            return Ok(StepOutcome::TornDown);
        }
        if self.animation.state() != AnimationState::Animating {
            return Ok(StepOutcome::Unchanged);
        }

        let now = self.context.now();
        let target = self.strategy.next_progress(self.animation.progress(), now);
        let Some(position) = self.animation.advance_to(target) else {
            return Ok(StepOutcome::Unchanged);
        };

        self.history.push(StepRecord {
            at: now,
            progress: self.animation.progress(),
            position,
        });
        self.render()?;
        self.surface.pan_to(position, self.config.pan)?;

        debug!(
            "[{}] step {} | {} | {}",
            self.run_id,
            self.animation.steps(),
            self.animation.progress(),
            position
        );

        if self.animation.is_complete() {
            info!(
                "[{}] Arrived at {} after {} steps ({:.1} km trail)",
                self.run_id,
                self.config.end.label,
                self.animation.steps(),
                self.animation.path().length_km()
            );
            return Ok(StepOutcome::Arrived(position));
        }
        Ok(StepOutcome::Moved(position))
    }

    /// Starts if needed, then steps on every interval until the journey
    /// completes or teardown is signalled.
    pub async fn run(&mut self, mut listener: TeardownListener) -> Result<TrackerSnapshot, TrackerError> {
        if listener.is_signalled() {
            self.teardown();
            return Ok(self.snapshot());
        }
        self.start()?;

        let context = Arc::clone(&self.context);
        let interval = self.strategy.interval();

        while self.animation.state() == AnimationState::Animating {
            tokio::select! {
                biased;
                _ = listener.wait() => {
                    self.teardown();
                    break;
                }
                _ = context.sleep(interval) => {
                    self.step()?;
                }
            }
        }

        Ok(self.snapshot())
    }

    /// Stops the tracker for good. Later steps are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        info!(
            "[{}] Torn down at {} with {} trail points",
            self.run_id,
            self.animation.progress(),
            self.animation.path().len()
        );
    }

    /// Discards the run and returns to `Idle` under a new run id.
    pub fn reset(&mut self) -> Result<(), TrackerError> {
        if self.torn_down {
            return Err(TrackerError::TornDown);
        }
        self.animation.reset();
        self.strategy.reset();
        self.history.clear();
        self.run_id = RunId::new();
        debug!("[{}] Reset to idle", self.run_id);
        Ok(())
    }

    fn render(&mut self) -> Result<(), TrackerError> {
        let markers = MarkerKind::all().map(|kind| {
            let position = match kind {
                MarkerKind::Start => self.animation.start(),
                MarkerKind::Current => self.animation.position(),
                MarkerKind::End => self.animation.end(),
            };
            Marker::new(kind, position)
        });
        self.surface.render_markers(&markers)?;
        self.surface
            .render_path(self.animation.path().points(), &self.config.route_style)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let position = self.animation.position();
        TrackerSnapshot {
            run_id: self.run_id,
            state: self.animation.state(),
            progress: self.animation.progress(),
            position,
            path_len: self.animation.path().len(),
            steps: self.animation.steps(),
            trail_km: self.animation.path().length_km(),
            remaining_km: position.haversine_km(&self.animation.end()),
            torn_down: self.torn_down,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn state(&self) -> AnimationState {
        self.animation.state()
    }

    pub fn progress(&self) -> Progress {
        self.animation.progress()
    }

    pub fn position(&self) -> Coordinate {
        self.animation.position()
    }

    pub fn path(&self) -> &Path {
        self.animation.path()
    }

    /// Every trail point with its timestamp, starting with the start point.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Time between ticks or frames.
    pub fn interval(&self) -> Duration {
        self.strategy.interval()
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RecordingSurface, SurfaceCall};
    use crate::strategy::StrategyConfig;
    use approx::assert_relative_eq;
    use routetrace_env::{Teardown, TokioContext};

    fn tracker(surface: RecordingSurface) -> Tracker<TokioContext, RecordingSurface> {
        Tracker::new(TokioContext::shared(), surface, TrackerConfig::default()).unwrap()
    }

    #[test]
    fn test_twenty_ticks_complete_with_21_points() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        tracker.start().unwrap();

        for tick in 1..=19 {
            assert!(matches!(tracker.step().unwrap(), StepOutcome::Moved(_)), "tick {tick}");
        }
        assert_eq!(tracker.step().unwrap(), StepOutcome::Arrived(tracker.config().end.position));

        assert_eq!(tracker.progress(), Progress::COMPLETE);
        assert_eq!(tracker.path().len(), 21);
        assert_eq!(tracker.state(), AnimationState::Complete);
        assert_eq!(surface.pans().len(), 20);
        assert_eq!(surface.last_path().unwrap().len(), 21);
    }

    #[test]
    fn test_steps_after_complete_are_noops() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        tracker.start().unwrap();
        while tracker.state() == AnimationState::Animating {
            tracker.step().unwrap();
        }
        let calls = surface.call_count();
        let path = tracker.path().clone();

        for _ in 0..5 {
            assert_eq!(tracker.step().unwrap(), StepOutcome::Unchanged);
        }
        assert_eq!(tracker.path(), &path);
        assert_eq!(tracker.progress(), Progress::COMPLETE);
        assert_eq!(surface.call_count(), calls);
    }

    #[test]
    fn test_first_point_is_start() {
        let mut tracker = tracker(RecordingSurface::new());
        tracker.start().unwrap();
        for _ in 0..7 {
            tracker.step().unwrap();
            assert_eq!(tracker.path().first(), tracker.config().start.position);
        }
    }

    #[test]
    fn test_start_sets_initial_view_and_markers() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        tracker.start().unwrap();

        let view = surface.initial_view().unwrap();
        assert_eq!(view.center, Coordinate::new(27.5620, 80.6820));
        assert_eq!(view.zoom, 10);
        assert_eq!(view.title, "Location Tracker");

        let markers = surface.last_markers().unwrap();
        let kinds: Vec<MarkerKind> = markers.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, MarkerKind::all().to_vec());
        assert_eq!(surface.last_path().unwrap(), vec![view.center]);

        // Icons are installed with the initial view, exactly once
        tracker.start().unwrap();
        let views = surface
            .calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::InitialView(_)))
            .count();
        assert_eq!(views, 1);
    }

    #[test]
    fn test_not_ready_surface_blocks_start() {
        let surface = RecordingSurface::not_ready();
        let mut tracker = tracker(surface.clone());

        assert!(matches!(tracker.start(), Err(TrackerError::SurfaceNotReady)));
        assert_eq!(tracker.state(), AnimationState::Idle);
        assert_eq!(tracker.step().unwrap(), StepOutcome::Unchanged);
        assert_eq!(surface.call_count(), 0);

        surface.set_ready(true);
        tracker.start().unwrap();
        assert_eq!(tracker.state(), AnimationState::Animating);
    }

    #[test]
    fn test_teardown_freezes_state() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        tracker.start().unwrap();
        tracker.step().unwrap();
        tracker.step().unwrap();

        tracker.teardown();
        let calls = surface.call_count();

        for _ in 0..50 {
            assert_eq!(tracker.step().unwrap(), StepOutcome::TornDown);
        }
        assert_eq!(tracker.path().len(), 3);
        assert_relative_eq!(tracker.progress().value(), 0.1);
        assert_eq!(surface.call_count(), calls);
        assert!(matches!(tracker.start(), Err(TrackerError::TornDown)));
        assert!(matches!(tracker.reset(), Err(TrackerError::TornDown)));
    }

    #[test]
    fn test_reset_starts_a_new_run() {
        let mut tracker = tracker(RecordingSurface::new());
        tracker.start().unwrap();
        tracker.step().unwrap();
        let first_run = tracker.run_id();

        tracker.reset().unwrap();
        assert_ne!(tracker.run_id(), first_run);
        assert_eq!(tracker.state(), AnimationState::Idle);
        assert_eq!(tracker.path().len(), 1);
        assert!(tracker.history().is_empty());

        tracker.start().unwrap();
        tracker.step().unwrap();
        assert_relative_eq!(tracker.progress().value(), 0.05);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig {
            strategy: StrategyConfig::FixedTick { interval_ms: 0, step: 0.1 },
            ..Default::default()
        };
        let result = Tracker::new(TokioContext::shared(), RecordingSurface::new(), config);
        assert!(matches!(result, Err(TrackerError::InvalidConfig(_))));
    }

    #[test]
    fn test_snapshot_distances() {
        let mut tracker = tracker(RecordingSurface::new());
        tracker.start().unwrap();
        let total = tracker.snapshot().remaining_km;

        for _ in 0..10 {
            tracker.step().unwrap();
        }
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.path_len, 11);
        assert_eq!(snapshot.steps, 10);
        assert_relative_eq!(snapshot.trail_km + snapshot.remaining_km, total, epsilon = 0.01);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_fixed_tick_to_completion() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        let (_teardown, listener) = Teardown::new();

        let snapshot = tracker.run(listener).await.unwrap();

        assert_eq!(snapshot.state, AnimationState::Complete);
        assert_eq!(snapshot.path_len, 21);
        assert_eq!(snapshot.position, tracker.config().end.position);
        // 20 ticks, 3 s apart
        assert_eq!(tracker.history().last().unwrap().at.as_secs(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_frame_driven_to_completion() {
        let config = TrackerConfig {
            strategy: StrategyConfig::FrameDriven {
                frame_interval_ms: 100,
                journey_ms: 2_000,
            },
            ..Default::default()
        };
        let mut tracker = Tracker::new(TokioContext::shared(), RecordingSurface::new(), config).unwrap();
        let (_teardown, listener) = Teardown::new();

        let snapshot = tracker.run(listener).await.unwrap();

        assert_eq!(snapshot.state, AnimationState::Complete);
        assert!(snapshot.path_len >= 21);
        let progress: Vec<f64> = tracker.history().iter().map(|r| r.progress.value()).collect();
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_during_run_stops_ticks() {
        let surface = RecordingSurface::new();
        let tracker = tracker(surface.clone());
        let (teardown, listener) = Teardown::new();

        let handle = tokio::spawn(async move {
            let mut tracker = tracker;
            let snapshot = tracker.run(listener).await.unwrap();
            (tracker, snapshot)
        });

        // Two ticks fire at 3 s and 6 s
        tokio::time::sleep(Duration::from_millis(7_500)).await;
        teardown.signal().unwrap();

        let (mut tracker, snapshot) = handle.await.unwrap();
        assert!(snapshot.torn_down);
        assert_eq!(snapshot.path_len, 3);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(tracker.step().unwrap(), StepOutcome::TornDown);
        assert_eq!(tracker.path().len(), 3);
        assert_eq!(surface.pans().len(), 2);
    }

    #[tokio::test]
    async fn test_run_after_teardown_does_nothing() {
        let surface = RecordingSurface::new();
        let mut tracker = tracker(surface.clone());
        let (teardown, listener) = Teardown::new();
        teardown.signal().unwrap();

        let snapshot = tracker.run(listener).await.unwrap();
        assert!(snapshot.torn_down);
        assert_eq!(snapshot.state, AnimationState::Idle);
        assert_eq!(surface.call_count(), 0);
    }

    #[tokio::test]
    async fn test_run_refuses_unready_surface() {
        let mut tracker = tracker(RecordingSurface::not_ready());
        let (_teardown, listener) = Teardown::new();
        assert!(matches!(tracker.run(listener).await, Err(TrackerError::SurfaceNotReady)));
    }
}
