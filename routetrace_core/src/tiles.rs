//! Raster tile source description and slippy-map tile math.
//!
//! Tiles themselves are fetched by the presentation surface; this module only
//! names them.

use crate::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator cannot represent the poles; latitudes are clipped here.
const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Address of a single tile in the XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// A templated raster tile server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSource {
    /// URL with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    /// Values substituted for `{s}`
    pub subdomains: Vec<String>,
    /// Attribution text shown alongside the map
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileSource {
    /// The public OpenStreetMap tile servers.
    pub fn openstreetmap() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
                .to_string(),
            max_zoom: 19,
        }
    }

    /// Attribution with HTML stripped, for plain-text surfaces.
    pub fn attribution_text(&self) -> String {
        let mut out = String::with_capacity(self.attribution.len());
        let mut in_tag = false;
        for c in self.attribution.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        out.replace("&copy;", "©")
    }

    /// Expands the template for one tile.
    ///
    /// The subdomain is picked from `(x + y) % subdomains.len()` so that
    /// neighbouring tiles spread over the servers.
    pub fn url(&self, tile: TileId) -> String {
        let subdomain = if self.subdomains.is_empty() {
            ""
        } else {
            let index = (tile.x as u64 + tile.y as u64) % self.subdomains.len() as u64;
            self.subdomains[index as usize].as_str()
        };
        self.url_template
            .replace("{s}", subdomain)
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }

    /// URL of the tile containing `coord` at `zoom`.
    pub fn url_for(&self, coord: Coordinate, zoom: u8) -> String {
        self.url(tile_for(coord, zoom.min(self.max_zoom)))
    }
}

impl Default for TileSource {
    fn default() -> Self {
        Self::openstreetmap()
    }
}

/// Returns the Web Mercator tile containing `coord` at `zoom`.
pub fn tile_for(coord: Coordinate, zoom: u8) -> TileId {
    let n = 2f64.powi(zoom as i32);
    let lat = coord.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let lng = coord.lng.clamp(-180.0, 180.0);

    let x = (lng + 180.0) / 360.0 * n;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;

    let max_index = n - 1.0;
    TileId {
        z: zoom,
        x: x.floor().clamp(0.0, max_index) as u32,
        y: y.floor().clamp(0.0, max_index) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_for_sitapur_zoom_10() {
        let tile = tile_for(Coordinate::new(27.5620, 80.6820), 10);
        assert_eq!(tile, TileId { z: 10, x: 741, y: 430 });
    }

    #[test]
    fn test_tile_for_origin() {
        assert_eq!(tile_for(Coordinate::new(0.0, 0.0), 1), TileId { z: 1, x: 1, y: 1 });
        assert_eq!(tile_for(Coordinate::new(0.0, 0.0), 0), TileId { z: 0, x: 0, y: 0 });
    }

    #[test]
    fn test_tile_for_clamps_extremes() {
        let tile = tile_for(Coordinate::new(90.0, 180.0), 3);
        assert_eq!(tile, TileId { z: 3, x: 7, y: 0 });

        let tile = tile_for(Coordinate::new(-90.0, -180.0), 3);
        assert_eq!(tile, TileId { z: 3, x: 0, y: 7 });
    }

    #[test]
    fn test_url_rotates_subdomains() {
        let source = TileSource::openstreetmap();
        assert_eq!(
            source.url(TileId { z: 10, x: 741, y: 430 }),
            "https://b.tile.openstreetmap.org/10/741/430.png"
        );
        assert_eq!(
            source.url(TileId { z: 10, x: 742, y: 430 }),
            "https://c.tile.openstreetmap.org/10/742/430.png"
        );
    }

    #[test]
    fn test_url_without_subdomains() {
        let source = TileSource {
            url_template: "https://tiles.example/{z}/{x}/{y}.png".to_string(),
            subdomains: Vec::new(),
            ..TileSource::openstreetmap()
        };
        assert_eq!(source.url(TileId { z: 2, x: 1, y: 3 }), "https://tiles.example/2/1/3.png");
    }

    #[test]
    fn test_attribution_text() {
        assert_eq!(
            TileSource::openstreetmap().attribution_text(),
            "© OpenStreetMap contributors"
        );
    }
}
