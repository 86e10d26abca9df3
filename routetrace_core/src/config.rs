//! Tracker configuration.
//!
//! Defaults reproduce the Sitapur to Lucknow demonstration route.

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::strategy::StrategyConfig;
use crate::style::{IconSet, PanOptions, RouteStyle};
use crate::tiles::TileSource;
use serde::{Deserialize, Serialize};

/// A named fixed point of the journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub position: Coordinate,
}

impl Waypoint {
    pub fn new(label: &str, lat: f64, lng: f64) -> Self {
        Self {
            label: label.to_string(),
            position: Coordinate::new(lat, lng),
        }
    }
}

/// Configuration for a tracker run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Page title shown by surfaces
    pub title: String,

    /// Journey origin; also the initial map center
    pub start: Waypoint,

    /// Journey destination
    pub end: Waypoint,

    /// Initial zoom level
    pub zoom: u8,

    /// How progress advances
    pub strategy: StrategyConfig,

    /// Trail stroke style
    pub route_style: RouteStyle,

    /// Raster tile server
    pub tiles: TileSource,

    /// Default marker images
    pub icons: IconSet,

    /// Pan behaviour after each step
    pub pan: PanOptions,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            title: "Location Tracker".to_string(),
            start: Waypoint::new("Sitapur", 27.5620, 80.6820),
            end: Waypoint::new("Lucknow", 26.8467, 80.9462),
            zoom: 10,
            strategy: StrategyConfig::default(),
            route_style: RouteStyle::default(),
            tiles: TileSource::default(),
            icons: IconSet::default(),
            pan: PanOptions::default(),
        }
    }
}

impl TrackerConfig {
    /// Parses a (possibly partial) JSON config; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything a run depends on.
    pub fn validate(&self) -> Result<(), TrackerError> {
        for waypoint in [&self.start, &self.end] {
            if !waypoint.position.is_finite() {
                return Err(TrackerError::invalid(format!(
                    "{} coordinate {:?} is not finite",
                    waypoint.label, waypoint.position
                )));
            }
        }

        if self.zoom > self.tiles.max_zoom {
            return Err(TrackerError::invalid(format!(
                "zoom {} exceeds tile source maximum {}",
                self.zoom, self.tiles.max_zoom
            )));
        }

        self.strategy.validate()?;

        if !self.route_style.weight.is_finite() || self.route_style.weight <= 0.0 {
            return Err(TrackerError::invalid("route weight must be positive"));
        }
        if !(0.0..=1.0).contains(&self.route_style.opacity) {
            return Err(TrackerError::invalid("route opacity must be within [0, 1]"));
        }
        self.route_style.rgba()?;

        Ok(())
    }
}
