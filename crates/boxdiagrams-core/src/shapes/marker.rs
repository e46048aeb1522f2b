//! Marker shape.

use super::ShapeTrait;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A round marker, e.g. a connection dot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub center: Point,
    pub radius: f64,
    #[serde(default)]
    pub style_name: Option<String>,
}

impl Marker {
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius,
            style_name: None,
        }
    }

    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }
}

impl ShapeTrait for Marker {
    fn bounds(&self) -> Option<Rect> {
        let r = self.radius.abs();
        Some(Rect::new(
            self.center.x - r,
            self.center.y - r,
            self.center.x + r,
            self.center.y + r,
        ))
    }

    fn style_name(&self) -> Option<&str> {
        self.style_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let marker = Marker::new(Point::new(10.0, 20.0), 5.0);
        assert_eq!(marker.bounds(), Some(Rect::new(5.0, 15.0, 15.0, 25.0)));
    }

    #[test]
    fn test_negative_radius_is_normalized() {
        let marker = Marker::new(Point::new(0.0, 0.0), -2.0);
        assert_eq!(marker.bounds(), Some(Rect::new(-2.0, -2.0, 2.0, 2.0)));
    }
}
