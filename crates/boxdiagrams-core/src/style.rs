//! Drawing styles and the value types they carry.
//!
//! `Font`, `TextFormat` and `Rgba8` are the in-memory forms used by the
//! editor. None of them is written to disk directly; the format layer
//! converts each one through a surrogate record (see `format::surrogate`).

use crate::format::surrogate::serde_argb;
use peniko::color::Rgba8;
use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

/// Font style bitset (bold, italic, underline, strikeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontStyle(u32);

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle(0);
    pub const BOLD: FontStyle = FontStyle(1);
    pub const ITALIC: FontStyle = FontStyle(2);
    pub const UNDERLINE: FontStyle = FontStyle(4);
    pub const STRIKEOUT: FontStyle = FontStyle(8);

    /// Build from raw bits. Unknown bits are kept.
    pub const fn from_bits(bits: u32) -> Self {
        FontStyle(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: FontStyle) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FontStyle {
    type Output = FontStyle;

    fn bitor(self, rhs: FontStyle) -> FontStyle {
        FontStyle(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: FontStyle) {
        self.0 |= rhs.0;
    }
}

/// A font selection: family name, size in points and style flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size_in_points: f32,
    pub style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, size_in_points: f32, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size_in_points,
            style,
        }
    }
}

/// Alignment of text along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StringAlignment {
    /// Left or top.
    #[default]
    Near = 0,
    Center = 1,
    /// Right or bottom.
    Far = 2,
}

impl StringAlignment {
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    /// Unknown values fall back to `Near`.
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            1 => StringAlignment::Center,
            2 => StringAlignment::Far,
            _ => StringAlignment::Near,
        }
    }
}

/// Text layout flags bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextFormatFlags(u32);

impl TextFormatFlags {
    pub const NONE: TextFormatFlags = TextFormatFlags(0);
    pub const DIRECTION_RIGHT_TO_LEFT: TextFormatFlags = TextFormatFlags(0x0001);
    pub const DIRECTION_VERTICAL: TextFormatFlags = TextFormatFlags(0x0002);
    pub const FIT_BLACK_BOX: TextFormatFlags = TextFormatFlags(0x0004);
    pub const DISPLAY_FORMAT_CONTROL: TextFormatFlags = TextFormatFlags(0x0020);
    pub const NO_FONT_FALLBACK: TextFormatFlags = TextFormatFlags(0x0400);
    pub const MEASURE_TRAILING_SPACES: TextFormatFlags = TextFormatFlags(0x0800);
    pub const NO_WRAP: TextFormatFlags = TextFormatFlags(0x1000);
    pub const LINE_LIMIT: TextFormatFlags = TextFormatFlags(0x2000);
    pub const NO_CLIP: TextFormatFlags = TextFormatFlags(0x4000);

    pub const fn from_bits(bits: u32) -> Self {
        TextFormatFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: TextFormatFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for TextFormatFlags {
    type Output = TextFormatFlags;

    fn bitor(self, rhs: TextFormatFlags) -> TextFormatFlags {
        TextFormatFlags(self.0 | rhs.0)
    }
}

/// How text is laid out inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextFormat {
    /// Horizontal alignment.
    pub alignment: StringAlignment,
    /// Vertical alignment.
    pub line_alignment: StringAlignment,
    pub flags: TextFormatFlags,
}

impl TextFormat {
    pub fn new(flags: TextFormatFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    /// Centered on both axes, the usual layout for box labels.
    pub fn centered() -> Self {
        Self {
            alignment: StringAlignment::Center,
            line_alignment: StringAlignment::Center,
            flags: TextFormatFlags::NONE,
        }
    }
}

/// Line dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashStyle {
    #[default]
    Solid = 0,
    Dash = 1,
    Dot = 2,
    DashDot = 3,
    DashDotDot = 4,
    Custom = 5,
}

impl DashStyle {
    pub fn to_raw(self) -> u32 {
        self as u32
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => DashStyle::Solid,
            1 => DashStyle::Dash,
            2 => DashStyle::Dot,
            3 => DashStyle::DashDot,
            4 => DashStyle::DashDotDot,
            5 => DashStyle::Custom,
            _ => return None,
        })
    }
}

/// Drawing attributes shared by every style variant.
///
/// Colors are 8 bits per channel, the precision of the file format. Convert
/// with `peniko::Color::from` when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawStyle {
    #[serde(with = "serde_argb")]
    pub line_color: Rgba8,
    pub line_width: f32,
    pub line_style: DashStyle,
    #[serde(with = "serde_argb")]
    pub fill_color: Rgba8,
    #[serde(with = "serde_argb")]
    pub text_color: Rgba8,
    /// `None` means "use the editor's default font".
    pub font: Option<Font>,
}

const BLACK: Rgba8 = Rgba8 { r: 0, g: 0, b: 0, a: 255 };
const WHITE: Rgba8 = Rgba8 { r: 255, g: 255, b: 255, a: 255 };

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            line_color: BLACK,
            line_width: 1.0,
            line_style: DashStyle::Solid,
            fill_color: WHITE,
            text_color: BLACK,
            font: None,
        }
    }
}

/// A named style as listed in a document's style sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiagramDrawStyle {
    pub name: String,
    pub base: DrawStyle,
}

impl DiagramDrawStyle {
    pub fn new(name: impl Into<String>, base: DrawStyle) -> Self {
        Self {
            name: name.into(),
            base,
        }
    }
}

/// Style variants. The subtype tag of each variant is fixed forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Style {
    Diagram(DiagramDrawStyle),
}

impl Style {
    /// Subtype tag of [`Style::Diagram`].
    pub const DIAGRAM_TAG: u32 = 100;

    pub fn tag(&self) -> u32 {
        match self {
            Style::Diagram(_) => Self::DIAGRAM_TAG,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Style::Diagram(s) => &s.name,
        }
    }

    pub fn draw_style(&self) -> &DrawStyle {
        match self {
            Style::Diagram(s) => &s.base,
        }
    }

    pub fn draw_style_mut(&mut self) -> &mut DrawStyle {
        match self {
            Style::Diagram(s) => &mut s.base,
        }
    }
}

impl From<DiagramDrawStyle> for Style {
    fn from(style: DiagramDrawStyle) -> Self {
        Style::Diagram(style)
    }
}
