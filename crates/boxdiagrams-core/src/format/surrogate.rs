//! Surrogate records for native value types.
//!
//! Fonts, colors, text formats, points and bounding boxes are never written
//! as-is. Each one is converted to a flat record of primitive fields on the
//! way out and rebuilt from that record on the way in. Optional values stay
//! optional on both sides: callers map `None` to `None`.

use crate::style::{Font, FontStyle, StringAlignment, TextFormat, TextFormatFlags};
use kurbo::{Point, Rect};
use peniko::color::Rgba8;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Explicit, lossless conversion between a native value type and its
/// portable record.
pub trait Surrogate: Sized + 'static {
    /// The in-memory type this record stands in for.
    type Native: Any;

    fn to_surrogate(native: &Self::Native) -> Self;

    fn from_surrogate(self) -> Self::Native;
}

/// Packed `0xAARRGGBB` color, written as four fixed bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorRecord {
    #[serde(with = "fixed32")]
    pub argb: u32,
}

impl ColorRecord {
    pub fn from_color(color: Rgba8) -> Self {
        Self {
            argb: u32::from_be_bytes([color.a, color.r, color.g, color.b]),
        }
    }

    pub fn to_color(self) -> Rgba8 {
        let [a, r, g, b] = self.argb.to_be_bytes();
        Rgba8 { r, g, b, a }
    }
}

impl Surrogate for ColorRecord {
    type Native = Rgba8;

    fn to_surrogate(native: &Rgba8) -> Self {
        Self::from_color(*native)
    }

    fn from_surrogate(self) -> Rgba8 {
        self.to_color()
    }
}

/// Font family name, point size and style bits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FontRecord {
    pub family: String,
    pub size_in_points: f32,
    pub style: u32,
}

impl Surrogate for FontRecord {
    type Native = Font;

    fn to_surrogate(native: &Font) -> Self {
        Self {
            family: native.family.clone(),
            size_in_points: native.size_in_points,
            style: native.style.bits(),
        }
    }

    fn from_surrogate(self) -> Font {
        Font::new(self.family, self.size_in_points, FontStyle::from_bits(self.style))
    }
}

/// Both alignment axes and the layout flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextFormatRecord {
    pub alignment: u32,
    pub line_alignment: u32,
    pub flags: u32,
}

impl Surrogate for TextFormatRecord {
    type Native = TextFormat;

    fn to_surrogate(native: &TextFormat) -> Self {
        Self {
            alignment: native.alignment.to_raw(),
            line_alignment: native.line_alignment.to_raw(),
            flags: native.flags.bits(),
        }
    }

    fn from_surrogate(self) -> TextFormat {
        TextFormat {
            alignment: StringAlignment::from_raw(self.alignment),
            line_alignment: StringAlignment::from_raw(self.line_alignment),
            flags: TextFormatFlags::from_bits(self.flags),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl Surrogate for PointRecord {
    type Native = Point;

    fn to_surrogate(native: &Point) -> Self {
        Self {
            x: native.x,
            y: native.y,
        }
    }

    fn from_surrogate(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Bounding box slots in `X1, X2, Y1, Y2` order. Every slot is required.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl Surrogate for BoxRecord {
    type Native = Rect;

    fn to_surrogate(native: &Rect) -> Self {
        Self {
            x1: native.x0,
            x2: native.x1,
            y1: native.y0,
            y2: native.y1,
        }
    }

    fn from_surrogate(self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2)
    }
}

/// A `u32` as exactly four big-endian bytes.
mod fixed32 {
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&value.to_be_bytes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        deserializer.deserialize_bytes(Fixed32Visitor)
    }

    struct Fixed32Visitor;

    impl<'de> Visitor<'de> for Fixed32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("exactly four bytes")
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<u32, E> {
            let bytes: [u8; 4] = v
                .try_into()
                .map_err(|_| E::invalid_length(v.len(), &self))?;
            Ok(u32::from_be_bytes(bytes))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<u32, A::Error> {
            let mut bytes = [0u8; 4];
            for (i, byte) in bytes.iter_mut().enumerate() {
                *byte = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(i, &self))?;
            }
            Ok(u32::from_be_bytes(bytes))
        }
    }
}

/// Serde adapter writing an [`Rgba8`] as its packed ARGB integer.
pub mod serde_argb {
    use super::ColorRecord;
    use peniko::color::Rgba8;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba8, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(ColorRecord::from_color(*color).argb)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba8, D::Error> {
        u32::deserialize(deserializer).map(|argb| ColorRecord { argb }.to_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing_order() {
        let color = Rgba8 {
            r: 0x11,
            g: 0x22,
            b: 0x33,
            a: 0x44,
        };
        assert_eq!(ColorRecord::from_color(color).argb, 0x4411_2233);
    }

    #[test]
    fn test_color_edge_values() {
        for argb in [
            0x0000_0000,
            0x00ff_ffff,
            0xff00_0000,
            0xffff_ffff,
            0x8080_8080,
            0x7f7f_7f7f,
            0x00ab_cdef,
        ] {
            let color = ColorRecord { argb }.from_surrogate();
            assert_eq!(ColorRecord::to_surrogate(&color).argb, argb, "argb {argb:#010x}");
        }
    }

    #[test]
    fn test_color_is_four_fixed_bytes() {
        let small = rmp_serde::to_vec(&ColorRecord { argb: 1 }).unwrap();
        let large = rmp_serde::to_vec(&ColorRecord { argb: u32::MAX }).unwrap();
        assert_eq!(small.len(), large.len());
        let back: ColorRecord = rmp_serde::from_slice(&large).unwrap();
        assert_eq!(back.argb, u32::MAX);
    }

    #[test]
    fn test_font_fidelity() {
        let font = Font::new(
            "Times New Roman",
            11.25,
            FontStyle::BOLD | FontStyle::ITALIC | FontStyle::STRIKEOUT,
        );
        let record = FontRecord::to_surrogate(&font);
        assert_eq!(record.style, 0b1011);
        assert_eq!(record.from_surrogate(), font);
    }

    #[test]
    fn test_text_format_fidelity() {
        let format = TextFormat {
            alignment: StringAlignment::Far,
            line_alignment: StringAlignment::Center,
            flags: TextFormatFlags::DIRECTION_VERTICAL | TextFormatFlags::LINE_LIMIT,
        };
        assert_eq!(TextFormatRecord::to_surrogate(&format).from_surrogate(), format);
    }

    #[test]
    fn test_box_slot_order() {
        let rect = Rect::new(1.0, 2.0, 3.0, 4.0);
        let record = BoxRecord::to_surrogate(&rect);
        assert_eq!(
            record,
            BoxRecord {
                x1: 1.0,
                x2: 3.0,
                y1: 2.0,
                y2: 4.0
            }
        );
        assert_eq!(record.from_surrogate(), rect);
    }

    #[test]
    fn test_box_requires_every_slot() {
        #[derive(Serialize)]
        struct ThreeSlots {
            x1: f64,
            x2: f64,
            y2: f64,
        }
        let bytes = rmp_serde::to_vec_named(&ThreeSlots {
            x1: 1.0,
            x2: 2.0,
            y2: 4.0,
        })
        .unwrap();
        assert!(rmp_serde::from_slice::<BoxRecord>(&bytes).is_err());
    }

    #[test]
    fn test_json_argb() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            #[serde(with = "serde_argb")]
            color: Rgba8,
        }
        let holder = Holder {
            color: Rgba8 {
                r: 0xff,
                g: 0,
                b: 0,
                a: 0x80,
            },
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"color":2164195328}"#);
        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.color, holder.color);
    }
}
