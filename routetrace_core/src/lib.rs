//! RouteTrace Core - Simulated location tracking on a map
//!
//! This library animates a marker along the straight line between two
//! geographic points and draws the growing trail behind it:
//! 1. **Interpolator**: `start + (end - start) * t`, per axis
//! 2. **Driver**: fixed-tick or frame-driven progress from 0 to 1
//! 3. **Surface**: a narrow trait standing in for the map widget

pub mod animation;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod log_surface;
pub mod path;
pub mod progress;
pub mod recording;
pub mod strategy;
pub mod style;
pub mod surface;
pub mod tiles;
pub mod tracker;

#[cfg(feature = "dashboard")]
pub mod dashboard;

// Re-export key types for convenience
pub use animation::{Animation, AnimationState};
pub use config::{TrackerConfig, Waypoint};
pub use coordinate::{interpolate, Coordinate};
pub use error::TrackerError;
pub use log_surface::LogSurface;
pub use path::Path;
pub use progress::Progress;
pub use recording::{RecordingSurface, SurfaceCall};
pub use strategy::{Strategy, StrategyConfig};
pub use style::{DivIcon, IconSet, LineCap, LineJoin, Marker, MarkerKind, PanOptions, RouteStyle};
pub use surface::{InitialView, PresentationSurface};
pub use tiles::{tile_for, TileId, TileSource};
pub use tracker::{StepOutcome, StepRecord, Tracker, TrackerSnapshot};
