//! A surface that renders to the `tracing` log.

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use crate::style::{Marker, PanOptions, RouteStyle};
use crate::surface::{InitialView, PresentationSurface};
use crate::tiles::TileSource;
use tracing::{debug, info};

/// Logs every surface call. Pans name the tile the map would now show.
#[derive(Debug, Default)]
pub struct LogSurface {
    view: Option<(TileSource, u8)>,
    pans: u64,
}

impl LogSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pan requests received.
    pub fn pan_count(&self) -> u64 {
        self.pans
    }

    fn tile_url(&self, center: Coordinate) -> Option<String> {
        self.view
            .as_ref()
            .map(|(tiles, zoom)| tiles.url_for(center, *zoom))
    }
}

impl PresentationSurface for LogSurface {
    fn set_initial_view(&mut self, view: &InitialView) -> Result<(), TrackerError> {
        info!(
            "🗺️  {} | center={} zoom={} | {}",
            view.title,
            view.center,
            view.zoom,
            view.tiles.attribution_text()
        );
        debug!("Marker icon: {} (shadow {})", view.icons.icon_url, view.icons.shadow_url);
        self.view = Some((view.tiles.clone(), view.zoom));
        if let Some(url) = self.tile_url(view.center) {
            debug!("Center tile: {}", url);
        }
        Ok(())
    }

    fn pan_to(&mut self, center: Coordinate, options: PanOptions) -> Result<(), TrackerError> {
        self.pans += 1;
        info!(
            "📍 pan #{} -> {}{}",
            self.pans,
            center,
            if options.animate { " (animated)" } else { "" }
        );
        if let Some(url) = self.tile_url(center) {
            debug!("   tile {}", url);
        }
        Ok(())
    }

    fn render_markers(&mut self, markers: &[Marker]) -> Result<(), TrackerError> {
        for marker in markers {
            debug!("   marker {:?} at {}", marker.kind, marker.position);
        }
        Ok(())
    }

    fn render_path(&mut self, path: &[Coordinate], style: &RouteStyle) -> Result<(), TrackerError> {
        debug!(
            "   trail: {} points, {} {}px @ {:.0}%",
            path.len(),
            style.color,
            style.weight,
            style.opacity * 100.0
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;

    #[test]
    fn test_log_surface_counts_pans() {
        let config = TrackerConfig::default();
        let mut surface = LogSurface::new();
        assert!(surface.is_ready());

        surface
            .set_initial_view(&InitialView {
                title: config.title.clone(),
                center: config.start.position,
                zoom: config.zoom,
                tiles: config.tiles.clone(),
                icons: config.icons.clone(),
            })
            .unwrap();
        surface.pan_to(config.end.position, PanOptions::default()).unwrap();
        surface.pan_to(config.end.position, PanOptions::default()).unwrap();

        assert_eq!(surface.pan_count(), 2);
        assert_eq!(
            surface.tile_url(config.start.position).as_deref(),
            Some("https://b.tile.openstreetmap.org/10/741/430.png")
        );
    }
}
