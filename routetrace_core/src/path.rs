//! The trail drawn behind the moving marker.

use crate::coordinate::Coordinate;
use geo::{HaversineLength, LineString};
use serde::{Deserialize, Serialize};

/// Ordered, append-only sequence of coordinates for one animation run.
///
/// A path is never empty: it is created from the start coordinate and only
/// ever grows. Reset builds a fresh path rather than truncating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Coordinate>,
}

impl Path {
    /// Creates a path whose first element is `start`.
    pub fn starting_at(start: Coordinate) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Appends a coordinate.
    pub fn push(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    /// The start coordinate.
    pub fn first(&self) -> Coordinate {
        self.points[0]
    }

    /// The most recently appended coordinate.
    pub fn last(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in order.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Sum of great-circle segment lengths in kilometres.
    pub fn length_km(&self) -> f64 {
        self.to_line_string().haversine_length() / 1000.0
    }

    /// Converts to a geo LineString (x = lng, y = lat).
    pub fn to_line_string(&self) -> LineString<f64> {
        self.points.iter().map(|c| (c.lng, c.lat)).collect()
    }
}
