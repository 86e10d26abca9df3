//! JSON exporter for recorded trails.
//!
//! Exports every step of a run plus the final trail as a GeoJSON-style
//! LineString, ready for any map viewer.

use routetrace_core::{AnimationState, PresentationSurface, StepRecord, Tracker, Waypoint};
use routetrace_env::TrackerContext;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use thiserror::Error;

/// Errors writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A single step of the animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailFrame {
    /// Time since the run started, in seconds
    pub time_sec: f64,

    /// Progress fraction in [0, 1]
    pub progress: f64,

    pub lat: f64,
    pub lng: f64,
}

impl From<&StepRecord> for TrailFrame {
    fn from(record: &StepRecord) -> Self {
        Self {
            time_sec: record.at.as_secs_f64(),
            progress: record.progress.value(),
            lat: record.position.lat,
            lng: record.position.lng,
        }
    }
}

/// GeoJSON LineString geometry. Positions are `[lng, lat]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStringGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

/// Complete trail export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailExport {
    pub title: String,
    pub run_id: String,

    /// Strategy name
    pub mode: String,

    pub start: Waypoint,
    pub end: Waypoint,

    /// All steps, including the initial point
    pub frames: Vec<TrailFrame>,

    /// Final trail
    pub path: LineStringGeometry,

    /// Whether the marker arrived
    pub completed: bool,

    /// Great-circle length of the trail
    pub trail_km: f64,
}

impl TrailExport {
    /// Builds an export from a tracker's current state.
    pub fn from_tracker<Ctx, S>(tracker: &Tracker<Ctx, S>) -> Self
    where
        Ctx: TrackerContext,
        S: PresentationSurface,
    {
        let frames: Vec<TrailFrame> = tracker.history().iter().map(TrailFrame::from).collect();
        let origin = frames.first().map(|f| f.time_sec).unwrap_or(0.0);
        let frames = frames
            .into_iter()
            .map(|f| TrailFrame {
                time_sec: f.time_sec - origin,
                ..f
            })
            .collect();

        Self {
            title: tracker.config().title.clone(),
            run_id: tracker.run_id().to_string(),
            mode: tracker.strategy_name().to_string(),
            start: tracker.config().start.clone(),
            end: tracker.config().end.clone(),
            frames,
            path: LineStringGeometry {
                kind: "LineString".to_string(),
                coordinates: tracker.path().points().iter().map(|c| [c.lng, c.lat]).collect(),
            },
            completed: tracker.state() == AnimationState::Complete,
            trail_km: tracker.path().length_km(),
        }
    }

    /// Duration covered by the frames, in seconds.
    pub fn duration_sec(&self) -> f64 {
        self.frames.last().map(|f| f.time_sec).unwrap_or(0.0)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunRunner;
    use crate::scenarios::DriveMode;
    use routetrace_core::RecordingSurface;

    fn fixed_tick_export() -> TrailExport {
        let tracker = RunRunner::for_mode(DriveMode::FixedTick)
            .execute(RecordingSurface::new())
            .unwrap();
        TrailExport::from_tracker(&tracker)
    }

    #[test]
    fn test_export_frames_and_path() {
        let export = fixed_tick_export();

        assert_eq!(export.frames.len(), 21);
        assert_eq!(export.path.kind, "LineString");
        assert_eq!(export.path.coordinates.len(), 21);
        assert!(export.completed);
        assert_eq!(export.mode, "fixed_tick");
        assert!((export.duration_sec() - 60.0).abs() < 1e-9);

        let first = export.frames[0].clone();
        assert_eq!(first.time_sec, 0.0);
        assert_eq!((first.lat, first.lng), (27.5620, 80.6820));
        // GeoJSON order is [lng, lat]
        assert_eq!(export.path.coordinates[20], [80.9462, 26.8467]);
    }

    #[test]
    fn test_export_json_shape() {
        let export = fixed_tick_export();
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(json["path"]["type"], "LineString");
        assert_eq!(json["title"], "Location Tracker");
        assert_eq!(json["start"]["label"], "Sitapur");

        let back: TrailExport = serde_json::from_value(json).unwrap();
        assert_eq!(back.frames.len(), export.frames.len());
        assert_eq!(back.run_id, export.run_id);
    }

    #[test]
    fn test_write_to_file() {
        let export = fixed_tick_export();
        let path = std::env::temp_dir().join(format!("routetrace-export-{}.json", export.run_id));
        let path = path.to_string_lossy().to_string();

        export.write_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(text.contains("\"LineString\""));
    }

    #[test]
    fn test_write_to_missing_directory_is_io_error() {
        let export = fixed_tick_export();
        let result = export.write_to_file("/nonexistent-routetrace-dir/trail.json");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
