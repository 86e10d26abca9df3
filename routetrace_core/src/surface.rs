//! The presentation surface seam.
//!
//! The tracker never talks to a map widget directly. Everything it needs is
//! the five calls below, so a surface can be a terminal canvas, a Rerun map
//! view, a log stream or a recording fake in tests.

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::style::{IconSet, Marker, PanOptions, RouteStyle};
use crate::tiles::TileSource;
use serde::{Deserialize, Serialize};

/// Everything a surface needs for its one-time setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub title: String,
    pub center: Coordinate,
    pub zoom: u8,
    pub tiles: TileSource,
    /// Default marker images; installed once here, never mutated later
    pub icons: IconSet,
}

/// A map-rendering widget as seen by the animation driver.
pub trait PresentationSurface {
    /// Whether the surface can accept calls. The driver refuses to start
    /// on a surface that is not ready.
    fn is_ready(&self) -> bool {
        true
    }

    /// One-time setup: center, zoom, tile source and icon defaults.
    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError>;

    /// Re-centers the map on `center`.
    fn pan_to(&mut self, center: Coordinate, options: PanOptions) -> Result<(), TrackerError>;

    /// Replaces the rendered markers.
    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError>;

    /// Replaces the rendered trail line.
    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError>;
}

impl<S: PresentationSurface + ?Sized> PresentationSurface for Box<S> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        (**self).set_initial_view(view)
    }

    fn pan_to(&mut self, center: Coordinate, options: PanOptions) -> Result<(), TrackerError> {
        (**self).pan_to(center, options)
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        (**self).render_markers(markers)
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        (**self).render_path(path, style)
    }
}

/// Fan-out to two surfaces; ready only when both are.
impl<A: PresentationSurface, B: PresentationSurface> PresentationSurface for (A, B) {
    fn is_ready(&self) -> bool {
        self.0.is_ready() && self.1.is_ready()
    }

    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        self.0.set_initial_view(view)?;
        self.1.set_initial_view(view)
    }

    fn pan_to(&mut self, center: Coordinate, options: PanOptions) -> Result<(), TrackerError> {
        self.0.pan_to(center, options)?;
        self.1.pan_to(center, options)
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        self.0.render_markers(markers)?;
        self.1.render_markers(markers)
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        self.0.render_path(path, style)?;
        self.1.render_path(path, style)
    }
}
