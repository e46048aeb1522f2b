//! The diagram document and its save/load entry points.

use crate::error::FormatError;
use crate::format::envelope::{read_envelope, write_envelope};
use crate::format::model::FormatModel;
use crate::format::payload::{decode_document, encode_document};
use crate::panels;
use crate::shapes::Shape;
use crate::style::Style;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// A diagram: a style sheet plus the shapes drawn with it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Named styles. Order matters: later entries shadow earlier ones with
    /// the same name.
    pub styles: Vec<Style>,
    /// All shapes. Order carries no meaning and duplicates are allowed.
    pub shapes: Vec<Shape>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: impl Into<Shape>) {
        self.shapes.push(shape.into());
    }

    pub fn add_style(&mut self, style: impl Into<Style>) {
        self.styles.push(style.into());
    }

    /// The effective style called `name`: the last one in the style sheet.
    pub fn style(&self, name: &str) -> Option<&Style> {
        self.styles.iter().rev().find(|s| s.name() == name)
    }

    /// True when there are neither styles nor shapes.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.shapes.is_empty()
    }

    /// Recompute the panel flag of every text box from geometry.
    ///
    /// `load` does this already; call it after building or editing a
    /// document in code.
    pub fn classify_panels(&mut self) {
        let panels = panels::mark_panels(&mut self.shapes);
        log::debug!("{} of {} shapes are panels", panels, self.shapes.len());
    }

    /// Panel flags in shape order without touching the document.
    pub fn panel_flags(&self) -> Vec<Option<bool>> {
        panels::classify(&self.shapes)
    }

    /// Save using the shared format model.
    pub fn save<W: Write + ?Sized>(&self, sink: &mut W) -> Result<(), FormatError> {
        self.save_with(FormatModel::shared()?, sink)
    }

    /// Write the signature followed by the encoded document.
    pub fn save_with<W: Write + ?Sized>(
        &self,
        model: &FormatModel,
        sink: &mut W,
    ) -> Result<(), FormatError> {
        let payload = encode_document(self, model)?;
        log::debug!(
            "saving document: {} styles, {} shapes, {} bytes",
            self.styles.len(),
            self.shapes.len(),
            payload.len()
        );
        write_envelope(sink, &payload)
    }

    /// Load using the shared format model.
    pub fn load<R: Read + ?Sized>(source: &mut R) -> Result<Self, FormatError> {
        Self::load_with(FormatModel::shared()?, source)
    }

    /// Read a document written by [`Document::save_with`] and classify its
    /// panels.
    pub fn load_with<R: Read + ?Sized>(
        model: &FormatModel,
        source: &mut R,
    ) -> Result<Self, FormatError> {
        let payload = read_envelope(source, model.config().max_payload_bytes)?;
        let mut doc = decode_document(&payload, model)?;
        log::debug!(
            "loaded document: {} styles, {} shapes, {} bytes",
            doc.styles.len(),
            doc.shapes.len(),
            payload.len()
        );
        doc.classify_panels();
        Ok(doc)
    }

    /// Encode into a byte vector, signature included.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = Vec::new();
        self.save(&mut out)?;
        Ok(out)
    }

    /// Decode from a byte slice, signature included.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self, FormatError> {
        Self::load(&mut bytes)
    }

    /// Serialize the document to JSON, for debugging dumps.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON. Panel flags are recomputed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut doc: Document = serde_json::from_str(json)?;
        doc.classify_panels();
        Ok(doc)
    }
}
