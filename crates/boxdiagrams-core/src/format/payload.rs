//! Payload records and their MessagePack encoding.
//!
//! The document graph is mirrored by plain serde records. Native value types
//! inside them (colors, fonts, points, boxes, text formats) only ever appear
//! as surrogate records, converted through the [`FormatModel`]. Records are
//! written as named maps, so a reader skips fields it does not know.

use super::model::FormatModel;
use super::surrogate::{BoxRecord, ColorRecord, FontRecord, PointRecord, TextFormatRecord};
use crate::document::Document;
use crate::error::{DecodeError, FormatError, ModelError};
use crate::shapes::{LineOrArrow, Marker, Shape, TextBox};
use crate::style::{DashStyle, DiagramDrawStyle, DrawStyle, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DocumentRecord {
    #[serde(default)]
    styles: Vec<StyleRecord>,
    #[serde(default)]
    shapes: Vec<ShapeRecord>,
}

/// Base draw-style fields, the subtype tag, and the fields owned by that
/// subtype.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct StyleRecord {
    subtype: u32,
    line_color: ColorRecord,
    line_width: f32,
    line_style: u32,
    fill_color: ColorRecord,
    text_color: ColorRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font: Option<FontRecord>,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) enum ShapeRecord {
    TextBox(TextBoxRecord),
    Marker(MarkerRecord),
    LineOrArrow(LineRecord),
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TextBoxRecord {
    bbox: BoxRecord,
    #[serde(default)]
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_format: Option<TextFormatRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MarkerRecord {
    center: PointRecord,
    #[serde(default)]
    radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LineRecord {
    #[serde(default)]
    points: Vec<PointRecord>,
    #[serde(default)]
    from_arrow: bool,
    #[serde(default)]
    to_arrow: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style_name: Option<String>,
}

/// Encode `doc` as the payload that follows the signature.
pub(crate) fn encode_document(doc: &Document, model: &FormatModel) -> Result<Vec<u8>, FormatError> {
    let record = DocumentRecord::from_document(doc, model)?;
    rmp_serde::to_vec_named(&record).map_err(FormatError::Encoding)
}

/// Decode a payload. The whole payload must be one document.
pub(crate) fn decode_document(payload: &[u8], model: &FormatModel) -> Result<Document, FormatError> {
    let mut rest = payload;
    let record = {
        let mut de = rmp_serde::Deserializer::new(&mut rest);
        de.set_max_depth(model.config().max_nesting);
        DocumentRecord::deserialize(&mut de).map_err(DecodeError::from)?
    };
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes(rest.len()).into());
    }
    record.into_document(model)
}

impl DocumentRecord {
    fn from_document(doc: &Document, model: &FormatModel) -> Result<Self, ModelError> {
        Ok(Self {
            styles: doc
                .styles
                .iter()
                .map(|style| StyleRecord::from_style(style, model))
                .collect::<Result<_, _>>()?,
            shapes: doc
                .shapes
                .iter()
                .map(|shape| ShapeRecord::from_shape(shape, model))
                .collect::<Result<_, _>>()?,
        })
    }

    fn into_document(self, model: &FormatModel) -> Result<Document, FormatError> {
        Ok(Document {
            styles: self
                .styles
                .into_iter()
                .map(|style| style.into_style(model))
                .collect::<Result<_, _>>()?,
            shapes: self
                .shapes
                .into_iter()
                .map(|shape| shape.into_shape(model))
                .collect::<Result<_, _>>()?,
        })
    }
}

impl StyleRecord {
    fn from_style(style: &Style, model: &FormatModel) -> Result<Self, ModelError> {
        let base = style.draw_style();
        Ok(Self {
            subtype: style.tag(),
            line_color: model.to_record(&base.line_color)?,
            line_width: base.line_width,
            line_style: base.line_style.to_raw(),
            fill_color: model.to_record(&base.fill_color)?,
            text_color: model.to_record(&base.text_color)?,
            font: base.font.as_ref().map(|f| model.to_record(f)).transpose()?,
            name: style.name().to_owned(),
        })
    }

    fn into_style(self, model: &FormatModel) -> Result<Style, FormatError> {
        if self.subtype != Style::DIAGRAM_TAG {
            return Err(DecodeError::UnknownVariant {
                message: "DrawStyle",
                tag: self.subtype,
            }
            .into());
        }
        let line_style = DashStyle::from_raw(self.line_style).ok_or(DecodeError::OutOfRange {
            message: "DashStyle",
            value: u64::from(self.line_style),
        })?;
        let base = DrawStyle {
            line_color: model.from_record(self.line_color)?,
            line_width: self.line_width,
            line_style,
            fill_color: model.from_record(self.fill_color)?,
            text_color: model.from_record(self.text_color)?,
            font: self.font.map(|f| model.from_record(f)).transpose()?,
        };
        Ok(Style::Diagram(DiagramDrawStyle {
            name: self.name,
            base,
        }))
    }
}

impl ShapeRecord {
    fn from_shape(shape: &Shape, model: &FormatModel) -> Result<Self, ModelError> {
        Ok(match shape {
            Shape::TextBox(t) => ShapeRecord::TextBox(TextBoxRecord {
                bbox: model.to_record(&t.bbox)?,
                text: t.text.clone(),
                style_name: t.style_name.clone(),
                text_format: t.text_format.as_ref().map(|f| model.to_record(f)).transpose()?,
            }),
            Shape::Marker(m) => ShapeRecord::Marker(MarkerRecord {
                center: model.to_record(&m.center)?,
                radius: m.radius,
                style_name: m.style_name.clone(),
            }),
            Shape::LineOrArrow(l) => ShapeRecord::LineOrArrow(LineRecord {
                points: l
                    .points
                    .iter()
                    .map(|p| model.to_record(p))
                    .collect::<Result<_, _>>()?,
                from_arrow: l.from_arrow,
                to_arrow: l.to_arrow,
                style_name: l.style_name.clone(),
            }),
        })
    }

    fn into_shape(self, model: &FormatModel) -> Result<Shape, ModelError> {
        Ok(match self {
            ShapeRecord::TextBox(t) => Shape::TextBox(TextBox {
                bbox: model.from_record(t.bbox)?,
                text: t.text,
                style_name: t.style_name,
                text_format: t.text_format.map(|f| model.from_record(f)).transpose()?,
                is_panel: false,
            }),
            ShapeRecord::Marker(m) => Shape::Marker(Marker {
                center: model.from_record(m.center)?,
                radius: m.radius,
                style_name: m.style_name,
            }),
            ShapeRecord::LineOrArrow(l) => Shape::LineOrArrow(LineOrArrow {
                points: l
                    .points
                    .into_iter()
                    .map(|p| model.from_record(p))
                    .collect::<Result<_, _>>()?,
                from_arrow: l.from_arrow,
                to_arrow: l.to_arrow,
                style_name: l.style_name,
            }),
        })
    }
}
