//! End-to-end runs of both drive modes on virtual time.

use proptest::prelude::*;
use routetrace_core::{Coordinate, RecordingSurface, StrategyConfig, TrackerConfig};
use routetrace_sim::{DriveMode, RunRunner, TrailExport};
use std::time::Duration;

#[test]
fn every_mode_passes_with_defaults() {
    for mode in DriveMode::all() {
        let result = RunRunner::for_mode(mode).run();
        assert!(result.passed, "{}: {:?}", mode, result.failure_reason);
        assert_eq!(result.final_progress, 1.0);
        assert!(!result.torn_down);
    }
}

#[test]
fn both_modes_take_one_minute() {
    let tick = RunRunner::for_mode(DriveMode::FixedTick).run();
    let frame = RunRunner::for_mode(DriveMode::FrameDriven).run();

    assert!((tick.elapsed_secs - 60.0).abs() < 1e-9);
    assert!((frame.elapsed_secs - 60.0).abs() < 1e-9);
    assert!((tick.trail_km - frame.trail_km).abs() < 1e-3);
}

#[test]
fn frame_driven_teardown_mid_journey() {
    let result = RunRunner::for_mode(DriveMode::FrameDriven)
        .with_teardown_after(Duration::from_secs(30))
        .run();

    assert!(result.passed, "{:?}", result.failure_reason);
    assert!(result.torn_down);
    assert!((result.final_progress - 0.5).abs() < 0.001);
}

#[test]
fn config_loaded_from_json_drives_run() {
    let config = TrackerConfig::from_json(
        r#"{
            "start": { "label": "A", "position": { "lat": 0.0, "lng": 0.0 } },
            "end": { "label": "B", "position": { "lat": 1.0, "lng": 1.0 } },
            "strategy": { "kind": "fixed_tick", "interval_ms": 100, "step": 0.25 }
        }"#,
    )
    .unwrap();

    let runner = RunRunner::new(config);
    let mut tracker = runner.execute(RecordingSurface::new()).unwrap();
    let result = runner.evaluate(&mut tracker);

    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.steps, 4);
    assert_eq!(tracker.path().points()[2], Coordinate::new(0.5, 0.5));

    let export = TrailExport::from_tracker(&tracker);
    assert_eq!(export.frames.len(), 5);
    assert!((export.duration_sec() - 0.4).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn fixed_tick_always_arrives(
        lat0 in -80.0f64..80.0,
        lng0 in -179.0f64..179.0,
        lat1 in -80.0f64..80.0,
        lng1 in -179.0f64..179.0,
        step in 0.02f64..0.6,
    ) {
        let mut config = TrackerConfig {
            strategy: StrategyConfig::FixedTick { interval_ms: 500, step },
            ..Default::default()
        };
        config.start.position = Coordinate::new(lat0, lng0);
        config.end.position = Coordinate::new(lat1, lng1);

        let result = RunRunner::new(config).run();
        prop_assert!(result.passed, "{:?}", result.failure_reason);
        prop_assert_eq!(result.final_progress, 1.0);
        prop_assert_eq!(result.path_len as u64, result.steps + 1);
    }
}
