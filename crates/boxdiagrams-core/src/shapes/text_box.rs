//! Text box shape.

use super::ShapeTrait;
use crate::style::TextFormat;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// A rectangular box with a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box (`x0 <= x1`, `y0 <= y1`).
    pub bbox: Rect,
    /// The label.
    pub text: String,
    /// Style reference by name.
    #[serde(default)]
    pub style_name: Option<String>,
    /// Text layout; `None` uses the editor default.
    #[serde(default)]
    pub text_format: Option<TextFormat>,
    /// Set by panel classification when another shape lies entirely inside
    /// this box. Not persisted.
    #[serde(skip)]
    pub is_panel: bool,
}

impl TextBox {
    /// Create a new text box.
    pub fn new(bbox: Rect, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
            style_name: None,
            text_format: None,
            is_panel: false,
        }
    }

    /// Set the style reference.
    pub fn with_style(mut self, name: impl Into<String>) -> Self {
        self.style_name = Some(name.into());
        self
    }

    /// Set the text layout.
    pub fn with_text_format(mut self, format: TextFormat) -> Self {
        self.text_format = Some(format);
        self
    }
}

impl ShapeTrait for TextBox {
    fn bounds(&self) -> Option<Rect> {
        Some(self.bbox)
    }

    fn style_name(&self) -> Option<&str> {
        self.style_name.as_deref()
    }
}
