//! Low-level TNEF record framing.
//!
//! After the 6-byte header a TNEF stream is a flat sequence of
//! self-describing attribute records:
//!
//! ```text
//! offset  width  field            byte order
//! 0       1      level            -
//! 1       2      attribute tag    little-endian
//! 3       2      attribute type   big-endian
//! 5       4      payload length   little-endian
//! 9       n      payload          -
//! 9+n     2      checksum         little-endian (not validated)
//! ```
//!
//! A declared length that runs past the end of the buffer is clamped to
//! what is actually there, so a corrupt length field can never cause an
//! out-of-range read.

use crate::error::{Error, Result};
use crate::tags::{HEADER_LEN, MIN_OBJ_SIZE};
use bytes::Buf;

/// Bytes before the payload
pub const RECORD_HEADER_LEN: usize = 9;

/// Bytes after the payload
pub const RECORD_TRAILER_LEN: usize = 2;

/// One framed attribute record, borrowing its payload from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// Raw level byte (see [`crate::tags::Level`])
    pub level: u8,
    /// Attribute tag (see [`crate::tags::Attribute`])
    pub tag: u16,
    /// Attribute type, read big-endian
    pub attr_type: u16,
    /// Payload length as written in the record
    pub declared_len: u32,
    /// Payload, truncated when the record was clamped
    pub payload: &'a [u8],
    /// Trailing checksum, absent when the record was clamped
    pub checksum: Option<u16>,
    /// Bytes this record occupies in the stream
    pub consumed: usize,
}

impl Record<'_> {
    /// Whether the declared length overran the buffer
    pub fn is_clamped(&self) -> bool {
        self.checksum.is_none()
    }
}

/// Frame a single record at the start of `data`.
///
/// Fails only when fewer than [`RECORD_HEADER_LEN`] bytes are available.
pub fn frame_record(data: &[u8]) -> Result<Record<'_>> {
    if data.len() < RECORD_HEADER_LEN {
        return Err(Error::truncated(0, RECORD_HEADER_LEN, data.len()));
    }

    let mut header = &data[..RECORD_HEADER_LEN];
    let level = header.get_u8();
    let tag = header.get_u16_le();
    let attr_type = header.get_u16();
    let declared_len = header.get_u32_le();

    let full_len =
        (declared_len as usize).saturating_add(RECORD_HEADER_LEN + RECORD_TRAILER_LEN);
    let consumed = full_len.min(data.len());
    let clamped = consumed < full_len;

    let payload_end = consumed
        .saturating_sub(RECORD_TRAILER_LEN)
        .max(RECORD_HEADER_LEN);
    let payload = &data[RECORD_HEADER_LEN..payload_end];

    let checksum = if clamped {
        None
    } else {
        let mut trailer = &data[payload_end..consumed];
        Some(trailer.get_u16_le())
    };

    Ok(Record {
        level,
        tag,
        attr_type,
        declared_len,
        payload,
        checksum,
        consumed,
    })
}

/// Iterator over the records of a TNEF stream.
///
/// Yields `(offset, record)` pairs and stops silently once no more than
/// [`MIN_OBJ_SIZE`] bytes remain.
#[derive(Debug, Clone)]
pub struct RecordStream<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> RecordStream<'a> {
    /// Creates a stream over a whole TNEF buffer, skipping its header
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, HEADER_LEN)
    }

    /// Creates a stream starting at an arbitrary offset
    pub fn at(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the cursor
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }
}

impl<'a> Iterator for RecordStream<'a> {
    type Item = (usize, Record<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() <= MIN_OBJ_SIZE {
            return None;
        }

        let offset = self.position;
        let record = frame_record(&self.data[offset..]).ok()?;
        self.position += record.consumed;
        Some((offset, record))
    }
}
