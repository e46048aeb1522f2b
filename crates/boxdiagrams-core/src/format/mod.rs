//! Binary document format.
//!
//! A file is the 4-byte signature `B&As` followed by one MessagePack-encoded
//! document record. The layout of every record is declared in [`FormatModel`];
//! native value types are written through the records in [`surrogate`].

pub mod envelope;
pub mod model;
pub(crate) mod payload;
pub mod surrogate;

pub use envelope::{SIGNATURE, sniff};
pub use model::{FieldDef, FieldKind, FieldLabel, FormatConfig, FormatModel, MessageSchema};
pub use surrogate::{BoxRecord, ColorRecord, FontRecord, PointRecord, Surrogate, TextFormatRecord};
