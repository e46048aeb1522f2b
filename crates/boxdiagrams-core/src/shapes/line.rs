//! Line and arrow shape.

use super::ShapeTrait;
use crate::geometry::points_bounds;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A polyline connector with optional arrowheads at either end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineOrArrow {
    /// Vertices in drawing order.
    pub points: Vec<Point>,
    /// Arrowhead at the first point.
    #[serde(default)]
    pub from_arrow: bool,
    /// Arrowhead at the last point.
    #[serde(default)]
    pub to_arrow: bool,
    #[serde(default)]
    pub style_name: Option<String>,
}

impl LineOrArrow {
    /// Create a plain line through the given points.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            from_arrow: false,
            to_arrow: false,
            style_name: None,
        }
    }

    /// Create an arrow pointing from `start` to `end`.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self {
            to_arrow: true,
            ..Self::new(vec![start, end])
        }
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }
}

impl ShapeTrait for LineOrArrow {
    fn bounds(&self) -> Option<Rect> {
        points_bounds(&self.points)
    }

    fn style_name(&self) -> Option<&str> {
        self.style_name.as_deref()
    }
}
