//! Error types for document persistence.

use std::io;
use thiserror::Error;

/// Errors surfaced by `Document::save` and `Document::load`.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The first four bytes were missing or were not `B&As`.
    #[error("Unrecognized file signature. This is not a Boxes & Arrows file.")]
    SignatureMismatch,
    /// The signature was valid but the payload could not be decoded.
    #[error("Document is corrupted or unsupported: {0}")]
    PayloadCorruption(#[from] DecodeError),
    /// The document could not be turned into a payload.
    #[error("Failed to encode document: {0}")]
    Encoding(#[source] rmp_serde::encode::Error),
    /// The destination rejected a write.
    #[error("Failed to write document: {0}")]
    WriteFailure(#[source] io::Error),
    /// The source failed while the payload was being read.
    #[error("Failed to read document: {0}")]
    ReadFailure(#[source] io::Error),
    /// The format model is inconsistent or lacks a surrogate.
    #[error("Invalid format model: {0}")]
    Model(#[from] ModelError),
}

impl FormatError {
    /// True for the "not one of our files" case, as opposed to a damaged file.
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, FormatError::SignatureMismatch)
    }
}

/// Decode failures inside a payload that carried a valid signature.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Truncated input, type mismatches, unknown shape kinds and excessive
    /// nesting all surface here.
    #[error("malformed payload: {0}")]
    Malformed(#[from] rmp_serde::decode::Error),
    #[error("{0} bytes left over after the document")]
    TrailingBytes(usize),
    #[error("{message}: unknown subtype tag {tag}")]
    UnknownVariant { message: &'static str, tag: u32 },
    #[error("{message}: value {value} out of range")]
    OutOfRange { message: &'static str, value: u64 },
    #[error("payload of {len} bytes exceeds the limit of {limit} bytes")]
    LengthLimit { len: u64, limit: usize },
}

/// Inconsistencies in the format model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{message}: field {field} registered twice")]
    DuplicateField {
        message: &'static str,
        field: &'static str,
    },
    #[error("{message}: subtype tag {tag} registered twice")]
    DuplicateSubtype { message: &'static str, tag: u32 },
    #[error("{message}.{field} refers to unregistered type {target}")]
    UnknownReference {
        message: &'static str,
        field: &'static str,
        target: &'static str,
    },
    #[error("message {0} registered twice")]
    DuplicateMessage(&'static str),
    #[error("surrogate for {0} registered twice")]
    DuplicateSurrogate(&'static str),
    #[error("{record} is not the registered surrogate for {native}")]
    UnregisteredSurrogate {
        native: &'static str,
        record: &'static str,
    },
}
