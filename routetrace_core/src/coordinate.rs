//! Geographic coordinates and straight-line interpolation between them.
//!
//! Interpolation is done independently on latitude and longitude in decimal
//! degrees. It is not a great-circle interpolation: the marker moves along
//! the straight line that the map projection draws between the endpoints'
//! degree values, which is what a polyline between two points shows.

use geo::{HaversineDistance, Point};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
///
/// No range validation is applied; configuration checks finiteness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Interpolates from `self` towards `end`. See [`interpolate`].
    pub fn lerp(self, end: Coordinate, t: f64) -> Coordinate {
        interpolate(self, end, t)
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn haversine_km(&self, other: &Coordinate) -> f64 {
        Point::from(*self).haversine_distance(&Point::from(*other)) / 1000.0
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(c: Coordinate) -> Self {
        // geo is (x = lon, y = lat)
        Point::new(c.lng, c.lat)
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(p: Point<f64>) -> Self {
        Coordinate::new(p.y(), p.x())
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Computes `start + (end - start) * t` on each axis.
///
/// Defined for any real `t`; values outside [0, 1] extrapolate linearly and
/// clamping is the caller's job. `t == 1.0` returns `end` bit-for-bit so a
/// completed animation lands exactly on the destination.
pub fn interpolate(start: Coordinate, end: Coordinate, t: f64) -> Coordinate {
    if t == 1.0 {
        return end;
    }
    Coordinate {
        lat: start.lat + (end.lat - start.lat) * t,
        lng: start.lng + (end.lng - start.lng) * t,
    }
}
