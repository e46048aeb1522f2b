//! Shape definitions for diagrams.

mod line;
mod marker;
mod text_box;

pub use line::LineOrArrow;
pub use marker::Marker;
pub use text_box::TextBox;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the axis-aligned bounding box, or `None` when the shape has no
    /// geometry yet (a line without points).
    fn bounds(&self) -> Option<Rect>;

    /// Name of the style this shape is drawn with, if any.
    fn style_name(&self) -> Option<&str>;
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    TextBox(TextBox),
    Marker(Marker),
    LineOrArrow(LineOrArrow),
}

impl Shape {
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Shape::TextBox(s) => s.bounds(),
            Shape::Marker(s) => s.bounds(),
            Shape::LineOrArrow(s) => s.bounds(),
        }
    }

    pub fn style_name(&self) -> Option<&str> {
        match self {
            Shape::TextBox(s) => s.style_name(),
            Shape::Marker(s) => s.style_name(),
            Shape::LineOrArrow(s) => s.style_name(),
        }
    }

    /// Check if this shape is a text box.
    pub fn is_text_box(&self) -> bool {
        matches!(self, Shape::TextBox(_))
    }

    /// Get the text box if this shape is one.
    pub fn as_text_box(&self) -> Option<&TextBox> {
        match self {
            Shape::TextBox(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable text box if this shape is one.
    pub fn as_text_box_mut(&mut self) -> Option<&mut TextBox> {
        match self {
            Shape::TextBox(t) => Some(t),
            _ => None,
        }
    }

    /// Panel flag of a text box; `None` for shapes that have no such flag.
    pub fn is_panel(&self) -> Option<bool> {
        self.as_text_box().map(|t| t.is_panel)
    }
}

impl From<TextBox> for Shape {
    fn from(shape: TextBox) -> Self {
        Shape::TextBox(shape)
    }
}

impl From<Marker> for Shape {
    fn from(shape: Marker) -> Self {
        Shape::Marker(shape)
    }
}

impl From<LineOrArrow> for Shape {
    fn from(shape: LineOrArrow) -> Self {
        Shape::LineOrArrow(shape)
    }
}
