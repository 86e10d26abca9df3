//! A surface that records every call, for tests and run checking.

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::style::{Marker, PanOptions, RouteStyle};
use crate::surface::{InitialView, PresentationSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    InitialView(InitialView),
    PanTo { center: Coordinate, options: PanOptions },
    Markers(Vec<Marker>),
    Path { points: Vec<Coordinate>, style: RouteStyle },
}

/// Records calls in order. Clones share the same log and readiness flag,
/// so a test can keep a handle while the tracker owns the surface.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    ready: Arc<AtomicBool>,
}

impl RecordingSurface {
    /// Creates a ready surface.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Creates a surface that reports itself as not ready.
    pub fn not_ready() -> Self {
        let surface = Self::new();
        surface.set_ready(false);
        surface
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    fn log(&self) -> MutexGuard<'_, Vec<SurfaceCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All calls so far.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.log().clone()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// The initial view, if one was set.
    pub fn initial_view(&self) -> Option<InitialView> {
        self.log().iter().find_map(|call| match call {
            SurfaceCall::InitialView(view) => Some(view.clone()),
            _ => None,
        })
    }

    /// Every pan target in order.
    pub fn pans(&self) -> Vec<Coordinate> {
        self.log()
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::PanTo { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    /// The most recently rendered trail.
    pub fn last_path(&self) -> Option<Vec<Coordinate>> {
        self.log().iter().rev().find_map(|call| match call {
            SurfaceCall::Path { points, .. } => Some(points.clone()),
            _ => None,
        })
    }

    /// The most recently rendered markers.
    pub fn last_markers(&self) -> Option<Vec<Marker>> {
        self.log().iter().rev().find_map(|call| match call {
            SurfaceCall::Markers(markers) => Some(markers.clone()),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSurface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        self.log().push(SurfaceCall::InitialView(view.clone()));
        Ok(())
    }

    fn pan_to(&mut self, center: Coordinate, options: PanOptions) -> Result<(), TrackerError> {
        self.log().push(SurfaceCall::PanTo { center, options });
        Ok(())
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        self.log().push(SurfaceCall::Markers(markers.to_vec()));
        Ok(())
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        self.log().push(SurfaceCall::Path {
            points: path.to_vec(),
            style: style.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::MarkerKind;

    #[test]
    fn test_clones_share_log() {
        let surface = RecordingSurface::new();
        let mut owned = surface.clone();

        owned
            .render_markers(&[Marker::new(MarkerKind::Start, Coordinate::new(1.0, 1.0))])
            .unwrap();

        assert_eq!(surface.call_count(), 1);
        assert_eq!(surface.last_markers().unwrap()[0].kind, MarkerKind::Start);
    }

    #[test]
    fn test_readiness_flag_is_shared() {
        let surface = RecordingSurface::not_ready();
        let owned = surface.clone();
        assert!(!owned.is_ready());

        surface.set_ready(true);
        assert!(owned.is_ready());
    }

    #[test]
    fn test_last_path_returns_latest() {
        let mut surface = RecordingSurface::new();
        let style = RouteStyle::default();
        surface.render_path(&[Coordinate::new(0.0, 0.0)], &style).unwrap();
        surface
            .render_path(&[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)], &style)
            .unwrap();

        assert_eq!(surface.last_path().unwrap().len(), 2);
        assert!(surface.initial_view().is_none());
    }
}
