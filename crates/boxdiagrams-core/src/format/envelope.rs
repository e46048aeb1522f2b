//! File envelope: a fixed 4-byte signature followed by the payload.

use crate::error::{DecodeError, FormatError};
use std::io::{ErrorKind, Read, Write};

/// First four bytes of every document file.
pub const SIGNATURE: [u8; 4] = *b"B&As";

/// Cheap check for whether `bytes` starts like a document file.
pub fn sniff(bytes: &[u8]) -> bool {
    bytes.starts_with(&SIGNATURE)
}

/// Write the signature and then `payload`.
pub fn write_envelope<W: Write + ?Sized>(sink: &mut W, payload: &[u8]) -> Result<(), FormatError> {
    sink.write_all(&SIGNATURE).map_err(FormatError::WriteFailure)?;
    sink.write_all(payload).map_err(FormatError::WriteFailure)?;
    sink.flush().map_err(FormatError::WriteFailure)
}

/// Check the signature and return the payload bytes that follow it.
///
/// Nothing past the signature is read when the signature does not match.
pub fn read_envelope<R: Read + ?Sized>(
    source: &mut R,
    max_payload_bytes: usize,
) -> Result<Vec<u8>, FormatError> {
    let mut signature = [0u8; SIGNATURE.len()];
    let read = read_up_to(source, &mut signature).map_err(FormatError::ReadFailure)?;
    if read < SIGNATURE.len() || signature != SIGNATURE {
        return Err(FormatError::SignatureMismatch);
    }

    let mut payload = Vec::new();
    Read::take(&mut *source, max_payload_bytes as u64 + 1)
        .read_to_end(&mut payload)
        .map_err(FormatError::ReadFailure)?;
    if payload.len() > max_payload_bytes {
        return Err(DecodeError::LengthLimit {
            len: payload.len() as u64,
            limit: max_payload_bytes,
        }
        .into());
    }
    Ok(payload)
}

/// Fill `buf` until it is full or the source is exhausted.
fn read_up_to<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
