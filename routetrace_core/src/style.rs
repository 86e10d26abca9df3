//! Visual styling for markers and the route line.

use crate::coordinate::Coordinate;
use crate::error::TrackerError;
use serde::{Deserialize, Serialize};

/// Which of the three markers this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// Fixed at the journey origin
    Start,
    /// Moves with the animation
    Current,
    /// Fixed at the destination
    End,
}

impl MarkerKind {
    /// Returns all kinds in render order.
    pub fn all() -> [MarkerKind; 3] {
        [MarkerKind::Start, MarkerKind::Current, MarkerKind::End]
    }

    /// CSS class of the inner element drawn for this marker.
    pub fn css_class(&self) -> &'static str {
        match self {
            MarkerKind::Start => "start-marker",
            MarkerKind::Current => "current-marker",
            MarkerKind::End => "end-marker",
        }
    }

    /// Fill color used by non-HTML surfaces.
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            MarkerKind::Start => [34, 197, 94],    // Green
            MarkerKind::Current => [59, 130, 246], // Blue
            MarkerKind::End => [239, 68, 68],      // Red
        }
    }
}

/// An HTML marker icon: a sized, anchored `<div>` styled by CSS class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivIcon {
    pub class_name: String,
    pub html: String,
    /// Width and height in pixels
    pub icon_size: [u32; 2],
    /// Pixel offset of the coordinate within the icon
    pub icon_anchor: [u32; 2],
}

impl DivIcon {
    /// The 16x16 centre-anchored icon used for every marker kind.
    pub fn for_kind(kind: MarkerKind) -> Self {
        Self {
            class_name: "custom-marker".to_string(),
            html: format!("<div class=\"{}\"></div>", kind.css_class()),
            icon_size: [16, 16],
            icon_anchor: [8, 8],
        }
    }
}

/// A styled point marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub icon: DivIcon,
}

impl Marker {
    /// Creates a marker with the default icon for its kind.
    pub fn new(kind: MarkerKind, position: Coordinate) -> Self {
        Self {
            kind,
            position,
            icon: DivIcon::for_kind(kind),
        }
    }
}

/// Shape drawn at the ends of the route line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

/// Shape drawn where route segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

/// Stroke style of the trail polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    /// CSS hex color, `#RRGGBB` or `#RGB`
    pub color: String,
    /// Stroke width in pixels
    pub weight: f32,
    /// 0.0 - 1.0
    pub opacity: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            color: "#3B82F6".to_string(),
            weight: 4.0,
            opacity: 0.8,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
        }
    }
}

impl RouteStyle {
    /// Parses `color` and folds `opacity` into an RGBA quadruple.
    pub fn rgba(&self) -> Result<[u8; 4], TrackerError> {
        let [r, g, b] = parse_hex_color(&self.color)?;
        let a = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Ok([r, g, b, a])
    }
}

fn parse_hex_color(color: &str) -> Result<[u8; 3], TrackerError> {
    let hex = color
        .strip_prefix('#')
        .ok_or_else(|| TrackerError::invalid(format!("color {color:?} must start with '#'")))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TrackerError::invalid(format!("color {color:?} has non-hex digits")));
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(TrackerError::invalid(format!("color {color:?} is not #RGB or #RRGGBB"))),
    };

    let channel = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .ok_or_else(|| TrackerError::invalid(format!("color {color:?} has non-hex digits")))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Default marker images, applied once when the surface is set up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSet {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
}

impl Default for IconSet {
    fn default() -> Self {
        const BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images";
        Self {
            icon_url: format!("{BASE}/marker-icon.png"),
            icon_retina_url: format!("{BASE}/marker-icon-2x.png"),
            shadow_url: format!("{BASE}/marker-shadow.png"),
        }
    }
}

/// How a pan request should be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanOptions {
    /// Animate the pan instead of jumping
    pub animate: bool,
}

impl Default for PanOptions {
    fn default() -> Self {
        Self { animate: true }
    }
}
