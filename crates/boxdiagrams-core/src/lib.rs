//! Boxes & Arrows Core Library
//!
//! Document model, binary file format and panel detection for Boxes & Arrows
//! diagrams.

pub mod document;
pub mod error;
pub mod format;
pub mod geometry;
pub mod panels;
pub mod shapes;
pub mod style;

#[cfg(not(target_arch = "wasm32"))]
pub mod storage;

pub use document::Document;
pub use error::{DecodeError, FormatError, ModelError};
pub use format::{FormatConfig, FormatModel, SIGNATURE};
pub use shapes::{LineOrArrow, Marker, Shape, ShapeTrait, TextBox};
pub use style::{
    DashStyle, DiagramDrawStyle, DrawStyle, Font, FontStyle, StringAlignment, Style, TextFormat,
    TextFormatFlags,
};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::{FileStorage, StorageError};
