use std::fmt;

use geo_types::{Coord, LineString};
use image::GrayImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Full camera frame, three 8-bit channels per pixel.
pub type Frame = image::RgbImage;

/// Binary edge map: every pixel is either 0 or 255.
pub type EdgeMap = GrayImage;

/// Axis-aligned region of interest inside a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Roi {
    /// Left edge in frame pixels
    pub x: u32,
    /// Top edge in frame pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when the whole rectangle lies inside a `width` x `height` frame
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }
}

impl Default for Roi {
    fn default() -> Self {
        Self::new(100, 50, 300, 200)
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// A traced boundary on the edge map, in ROI pixel coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[f32; 2]>,
}

impl Contour {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Perimeter of the curve treated as closed (last point joins the first).
    pub fn perimeter(&self) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }

        let distance = |a: [f32; 2], b: [f32; 2]| {
            let dx = b[0] - a[0];
            let dy = b[1] - a[1];
            (dx * dx + dy * dy).sqrt()
        };

        let open: f32 = self
            .points
            .windows(2)
            .map(|window| distance(window[0], window[1]))
            .sum();

        // Non-empty, checked above
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        open + distance(last, first)
    }

    /// Convert a slice of the contour into a geo-types line string
    pub fn line_string(points: &[[f32; 2]]) -> LineString<f32> {
        LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect())
    }
}

impl From<Vec<[f32; 2]>> for Contour {
    fn from(points: Vec<[f32; 2]>) -> Self {
        Self::new(points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ContourKind {
    ZigZag,
    Plain,
}

/// A contour that passed the length filter, with its shape classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedContour {
    pub contour: Contour,
    pub perimeter: f32,
    /// Vertex count after polygon approximation
    pub vertices: usize,
    pub kind: ContourKind,
}

impl ClassifiedContour {
    pub fn is_zigzag(&self) -> bool {
        self.kind == ContourKind::ZigZag
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// The verdict of one pass plus the count that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub verdict: Verdict,
    pub zigzag_count: u32,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | ZigZag Count: {}", self.verdict, self.zigzag_count)
    }
}

/// Everything one analysis pass produced
#[derive(Debug, Clone)]
pub struct Inspection {
    pub report: Report,
    /// Contours longer than the minimum length, in tracing order
    pub contours: Vec<ClassifiedContour>,
    /// Contours dropped by the length filter
    pub excluded: usize,
    pub edges: EdgeMap,
    pub roi: Roi,
}

impl Inspection {
    pub fn verdict(&self) -> Verdict {
        self.report.verdict
    }

    pub fn zigzag_count(&self) -> u32 {
        self.report.zigzag_count
    }
}
