//! MAPI property list decoding.
//!
//! The `attMsgProps` and `attAttachment` attributes carry their payload as
//! a MAPI property list:
//!
//! ```text
//! [4] property count
//! per property:
//!   [2] property type (0x1000 set for multi-valued)
//!   [2] property id
//!   if id >= 0x8000 (named property):
//!     [16] property set GUID
//!     [4]  kind: 0 = numeric id, 1 = string name
//!     [4]  numeric id | [4] name length + UTF-16LE name, padded to 4
//!   [4] value count (multi-valued and variable-size types only)
//!   per value:
//!     fixed-size types:    the value, padded to 4
//!     variable-size types: [4] length + bytes, padded to 4
//! ```
//!
//! Structural fields that run off the end of the buffer are errors, as
//! are value counts the remaining bytes cannot hold. The bytes of a
//! variable-size value are clamped to what is available.

pub mod rtf;

use crate::error::{Error, Result};
use crate::tags::{prop_id, PropType, ValueWidth, MV_FLAG};
use crate::text;
use bytes::Buf;
use encoding_rs::Encoding;

const GUID_LEN: usize = 16;

/// Upper bound on values of a zero-width type
const MAX_PLAUSIBLE_VALUES: usize = 1024;

/// Name of a named property (id >= 0x8000)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyName {
    /// Named by a numeric id within the property set
    Id(u32),
    /// Named by a string within the property set
    String(String),
}

/// Property set and name of a named property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedProperty {
    /// Property set GUID, raw
    pub guid: [u8; GUID_LEN],
    /// Name within the set
    pub name: PropertyName,
}

/// One decoded MAPI property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapiProperty {
    /// Property id (see [`crate::tags::prop_id`])
    pub tag: u16,
    /// Property type without the multi-value flag
    pub prop_type: u16,
    /// Whether the multi-value flag was set
    pub multi_value: bool,
    /// Set and name, for named properties
    pub named: Option<NamedProperty>,
    /// Raw values, padding removed
    pub values: Vec<Vec<u8>>,
}

impl MapiProperty {
    /// First raw value, empty if the property has none
    pub fn value(&self) -> &[u8] {
        self.values.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// All values concatenated
    pub fn data(&self) -> Vec<u8> {
        self.values.concat()
    }

    /// Decoded property type, `None` if unknown
    pub fn kind(&self) -> Option<PropType> {
        PropType::from_u16(self.prop_type)
    }

    /// First value as text with every NUL removed.
    ///
    /// Unicode properties are decoded as UTF-16LE, everything else with
    /// `encoding`.
    pub fn text(&self, encoding: &'static Encoding) -> String {
        match self.kind() {
            Some(PropType::Unicode) => text::decode_utf16(self.value()),
            _ => text::decode_bytes(self.value(), encoding),
        }
    }

    /// First value with string terminators removed.
    ///
    /// Unicode strings are transcoded to UTF-8. Non-string values are
    /// returned unchanged.
    pub fn string_bytes(&self) -> Vec<u8> {
        match self.kind() {
            Some(PropType::Unicode) => {
                let (decoded, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(self.value());
                decoded.trim_end_matches('\0').as_bytes().to_vec()
            }
            Some(PropType::String8) => {
                let value = self.value();
                let end = value.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                value[..end].to_vec()
            }
            _ => self.value().to_vec(),
        }
    }
}

/// Decode a property list starting at `offset` within `data`.
///
/// Errors are recoverable: callers treat them as "no properties".
pub fn decode_properties(data: &[u8], offset: usize) -> Result<Vec<MapiProperty>> {
    let mut reader = PropReader::at(data, offset)?;

    let count = reader.u32()? as usize;
    // Smallest possible property: type + id
    if count > reader.remaining() / 4 {
        return Err(Error::property_decode(
            offset,
            format!(
                "{} properties declared but only {} bytes follow",
                count,
                reader.remaining()
            ),
        ));
    }

    let mut properties = Vec::with_capacity(count);
    for _ in 0..count {
        properties.push(reader.property()?);
    }

    Ok(properties)
}

/// Bounds-checked cursor over a property list
struct PropReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PropReader<'a> {
    fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        if pos > data.len() {
            return Err(Error::property_decode(
                pos,
                format!("start offset beyond {} bytes of input", data.len()),
            ));
        }
        Ok(Self { data, pos })
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::property_decode(
                self.pos,
                format!("need {} bytes, have {}", len, self.remaining()),
            ));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn take_clamped(&mut self, len: usize) -> &'a [u8] {
        let len = len.min(self.remaining());
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }

    fn skip_padding(&mut self, len: usize) {
        let pad = (4 - len % 4) % 4;
        self.pos = (self.pos + pad).min(self.data.len());
    }

    fn u16(&mut self) -> Result<u16> {
        let mut bytes = self.take(2)?;
        Ok(bytes.get_u16_le())
    }

    fn u32(&mut self) -> Result<u32> {
        let mut bytes = self.take(4)?;
        Ok(bytes.get_u32_le())
    }

    fn property(&mut self) -> Result<MapiProperty> {
        let start = self.pos;
        let raw_type = self.u16()?;
        let tag = self.u16()?;

        let multi_value = raw_type & MV_FLAG != 0;
        let prop_type = raw_type & !MV_FLAG;
        let kind = PropType::from_u16(prop_type).ok_or_else(|| {
            Error::property_decode(start, format!("unknown property type {:#06x}", prop_type))
        })?;

        let named = if tag >= prop_id::NAMED_START {
            Some(self.named_property()?)
        } else {
            None
        };

        let width = kind.width();
        let count = if multi_value || width == ValueWidth::Variable {
            self.u32()? as usize
        } else {
            1
        };
        self.check_value_count(count, width)?;

        let mut values = Vec::with_capacity(count.min(MAX_PLAUSIBLE_VALUES));
        for _ in 0..count {
            let len = match width {
                ValueWidth::Fixed(len) => len,
                ValueWidth::Variable => self.u32()? as usize,
            };
            values.push(self.take_clamped(len).to_vec());
            self.skip_padding(len);
        }

        Ok(MapiProperty {
            tag,
            prop_type,
            multi_value,
            named,
            values,
        })
    }

    /// Reject value counts the rest of the buffer cannot hold
    fn check_value_count(&self, count: usize, width: ValueWidth) -> Result<()> {
        // Smallest encoding of one value: fixed values padded to 4, or a length prefix
        let min_len = match width {
            ValueWidth::Fixed(0) => 0,
            ValueWidth::Fixed(len) => len.div_ceil(4) * 4,
            ValueWidth::Variable => 4,
        };
        let fits = if min_len == 0 {
            count <= MAX_PLAUSIBLE_VALUES
        } else {
            count
                .checked_mul(min_len)
                .is_some_and(|needed| needed <= self.remaining())
        };

        if !fits {
            return Err(Error::property_decode(
                self.pos,
                format!(
                    "implausible value count {} with {} bytes left",
                    count,
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }

    fn named_property(&mut self) -> Result<NamedProperty> {
        let mut guid = [0u8; GUID_LEN];
        guid.copy_from_slice(self.take(GUID_LEN)?);

        let kind_offset = self.pos;
        let name = match self.u32()? {
            0 => PropertyName::Id(self.u32()?),
            1 => {
                let len = self.u32()? as usize;
                let raw = self.take(len)?;
                self.skip_padding(len);
                PropertyName::String(text::decode_utf16(raw))
            }
            other => {
                return Err(Error::property_decode(
                    kind_offset,
                    format!("unknown named property kind {}", other),
                ))
            }
        };

        Ok(NamedProperty { guid, name })
    }
}
