//! Rerun map view for simulated runs.
//!
//! This module streams a run to the Rerun viewer's map view.
//! Visualization is optional and only available with the `visualization` feature.
//!
//! # What Gets Logged
//!
//! - Start / current / end markers as colored geo points
//! - The trail as a geo line string in the route color
//! - The initial view and attribution as a text log
//! - Step number as the sequence timeline

use routetrace_core::{
    Coordinate, InitialView, Marker, PanOptions, PresentationSurface, RouteStyle, TrackerError,
};
#[cfg(feature = "visualization")]
use rerun::{Color, GeoLineStrings, GeoPoints, Radius, RecordingStream};

/// Presentation surface backed by a Rerun recording stream.
pub struct RerunSurface {
    #[cfg(feature = "visualization")]
    rec: Option<RecordingStream>,

    /// Whether visualization is enabled
    enabled: bool,

    /// Pans so far; drives the `step` timeline
    step: u64,
}

impl RerunSurface {
    /// Creates a surface with visualization disabled. Every call is a no-op.
    pub fn disabled() -> Self {
        Self {
            #[cfg(feature = "visualization")]
            rec: None,
            enabled: false,
            step: 0,
        }
    }

    /// Creates a surface with visualization enabled.
    #[cfg(feature = "visualization")]
    pub fn new(name: &str) -> Self {
        match rerun::RecordingStreamBuilder::new(name).spawn() {
            Ok(rec) => {
                tracing::info!("Rerun visualization enabled - switch the viewer to Map view");
                Self {
                    rec: Some(rec),
                    enabled: true,
                    step: 0,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Rerun: {:?}", e);
                Self::disabled()
            }
        }
    }

    /// Creates a surface - returns disabled if visualization feature not enabled.
    #[cfg(not(feature = "visualization"))]
    pub fn new(_name: &str) -> Self {
        tracing::info!("Rerun visualization not available (compile with --features visualization)");
        Self::disabled()
    }

    /// Returns whether visualization is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Pans received so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    #[cfg(feature = "visualization")]
    fn set_step(&self) {
        if let Some(ref rec) = self.rec {
            rec.set_time_sequence("step", self.step as i64);
        }
    }

    #[cfg(not(feature = "visualization"))]
    fn set_step(&self) {}

    #[cfg(feature = "visualization")]
    fn log_text(&self, path: &str, message: &str) {
        if let Some(ref rec) = self.rec {
            let _ = rec.log(path, &rerun::TextLog::new(message));
        }
    }

    #[cfg(not(feature = "visualization"))]
    fn log_text(&self, _path: &str, _message: &str) {}

    #[cfg(feature = "visualization")]
    fn log_point(&self, path: &str, at: Coordinate, rgb: [u8; 3], radius: f32) {
        if let Some(ref rec) = self.rec {
            let [r, g, b] = rgb;
            let _ = rec.log(
                path,
                &GeoPoints::from_lat_lon([(at.lat, at.lng)])
                    .with_colors([Color::from_rgb(r, g, b)])
                    .with_radii([Radius::new_ui_points(radius)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    fn log_point(&self, _path: &str, _at: Coordinate, _rgb: [u8; 3], _radius: f32) {}

    #[cfg(feature = "visualization")]
    fn log_line(&self, path: &str, points: &[Coordinate], rgba: [u8; 4], weight: f32) {
        if let Some(ref rec) = self.rec {
            let [r, g, b, a] = rgba;
            let strip: Vec<(f64, f64)> = points.iter().map(|c| (c.lat, c.lng)).collect();
            let _ = rec.log(
                path,
                &GeoLineStrings::from_lat_lon([strip])
                    .with_colors([Color::from_unmultiplied_rgba(r, g, b, a)])
                    .with_radii([Radius::new_ui_points(weight / 2.0)]),
            );
        }
    }

    #[cfg(not(feature = "visualization"))]
    fn log_line(&self, _path: &str, _points: &[Coordinate], _rgba: [u8; 4], _weight: f32) {}
}

impl PresentationSurface for RerunSurface {
    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        self.set_step();
        self.log_text(
            "map/view",
            &format!(
                "{} | center {} | zoom {} | {}",
                view.title,
                view.center,
                view.zoom,
                view.tiles.attribution_text()
            ),
        );
        Ok(())
    }

    fn pan_to(&mut self, center: Coordinate, _options: PanOptions) -> Result<(), TrackerError> {
        self.step += 1;
        self.set_step();
        self.log_point("map/center", center, [255, 255, 255], 2.0);
        Ok(())
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        for marker in markers {
            self.log_point(
                &format!("map/markers/{}", marker.kind.css_class()),
                marker.position,
                marker.kind.rgb(),
                8.0,
            );
        }
        Ok(())
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        let rgba = style.rgba()?;
        self.log_line("map/trail", path, rgba, style.weight);
        Ok(())
    }
}
