//! TNEF stream decoding.
//!
//! ## Algorithm Overview
//!
//! 1. Check the 4-byte signature and read the 2-byte legacy key
//! 2. Frame records one after another until no more than 12 bytes remain
//! 3. Route each record by tag and level:
//!    - `attAttachRenddata` opens a new attachment
//!    - attachment-level records update the most recent attachment
//!    - message-level records update the message through a field table
//! 4. Decode property-list payloads with [`crate::props::decode_properties`]
//!
//! Malformed records never abort decoding. Clamped lengths, broken
//! property lists and attachment records with no open attachment leave
//! the affected fields at their defaults; with
//! [`DecoderConfig::collect_warnings`] each of them is also recorded as a
//! [`Warning`].

mod frame;
mod observer;

use crate::error::{Error, Result};
use crate::message::{Attachment, DecodedMessage, MessageField, Warning};
use crate::props::{decode_properties, MapiProperty};
use crate::tags::{prop_id, Attribute, Level, HEADER_LEN, TNEF_SIGNATURE};
use crate::text;
use bytes::Buf;
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, trace};

pub use frame::{frame_record, Record, RecordStream, RECORD_HEADER_LEN, RECORD_TRAILER_LEN};
pub use observer::{DecodeObserver, NullObserver, StatsObserver};

/// Message-level attributes and the field each one sets
const MESSAGE_ATTRIBUTES: &[(Attribute, MessageField)] = &[
    (Attribute::From, MessageField::From),
    (Attribute::Subject, MessageField::Subject),
    (Attribute::DateSent, MessageField::DateSent),
    (Attribute::DateRecd, MessageField::DateReceived),
    (Attribute::MessageStatus, MessageField::MessageStatus),
    (Attribute::MessageClass, MessageField::MessageClass),
    (Attribute::MessageId, MessageField::MessageId),
    (Attribute::ParentId, MessageField::ParentId),
    (Attribute::ConversationId, MessageField::ConversationId),
    (Attribute::Body, MessageField::Body),
    (Attribute::Priority, MessageField::Priority),
    (Attribute::DateModified, MessageField::DateModified),
    (Attribute::TnefVersion, MessageField::TnefVersion),
    (Attribute::OemCodepage, MessageField::OemCodepage),
    (Attribute::OriginalMessageClass, MessageField::OriginalMessageClass),
];

/// Message-level MAPI properties and the field each one sets
const MESSAGE_PROPERTIES: &[(u16, MessageField)] = &[
    (prop_id::BODY, MessageField::Body),
    (prop_id::BODY_HTML, MessageField::BodyHtml),
    (prop_id::RTF_COMPRESSED, MessageField::RtfBody),
];

/// Field set by a message-level attribute tag
pub fn message_field_for_attribute(tag: u16) -> Option<MessageField> {
    MESSAGE_ATTRIBUTES
        .iter()
        .find(|(attr, _)| attr.tag() == tag)
        .map(|&(_, field)| field)
}

/// Field set by a message-level MAPI property id
pub fn message_field_for_property(tag: u16) -> Option<MessageField> {
    MESSAGE_PROPERTIES
        .iter()
        .find(|(id, _)| *id == tag)
        .map(|&(_, field)| field)
}

/// Configuration for the decoder
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Record repairs and skips on [`DecodedMessage::warnings`]
    pub collect_warnings: bool,
    /// Reject inputs larger than this many bytes (0 = unlimited)
    pub max_input_size: usize,
}

impl DecoderConfig {
    /// Creates a new decoder config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether warnings are collected
    pub fn collect_warnings(mut self, collect: bool) -> Self {
        self.collect_warnings = collect;
        self
    }

    /// Sets the maximum accepted input size
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }
}

/// TNEF decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Creates a new decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Returns the decoder configuration
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode an in-memory TNEF buffer
    pub fn decode(&self, data: &[u8]) -> Result<DecodedMessage> {
        self.decode_with(data, &mut NullObserver)
    }

    /// Decode an in-memory TNEF buffer, reporting progress to `observer`
    pub fn decode_with<O>(&self, data: &[u8], observer: &mut O) -> Result<DecodedMessage>
    where
        O: DecodeObserver + ?Sized,
    {
        self.check_size(data.len())?;
        let key = read_header(data)?;

        debug!("Decoding {} bytes of TNEF (key {:#06x})", data.len(), key);

        let mut state = DecodeState::new(key, self.config.collect_warnings, observer);
        let mut stream = RecordStream::new(data);
        for (offset, record) in stream.by_ref() {
            state.step(offset, &record);
        }

        let message = state.finish();
        debug!(
            "Decode complete: {} attachments, {} properties, stopped at offset {}",
            message.attachments.len(),
            message.attributes.len(),
            stream.position()
        );
        Ok(message)
    }

    /// Read a file fully into memory and decode it
    pub fn decode_file(&self, path: impl AsRef<Path>) -> Result<DecodedMessage> {
        let path = path.as_ref();
        if self.config.max_input_size > 0 {
            let metadata = std::fs::metadata(path).map_err(|e| Error::file_read(path, e))?;
            self.check_size(usize::try_from(metadata.len()).unwrap_or(usize::MAX))?;
        }
        let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        self.decode(&data)
    }

    fn check_size(&self, size: usize) -> Result<()> {
        let limit = self.config.max_input_size;
        if limit > 0 && size > limit {
            return Err(Error::InputTooLarge { size, limit });
        }
        Ok(())
    }
}

/// Validate the signature and return the legacy key.
///
/// Inputs too short to hold the header count as missing the signature.
pub fn read_header(data: &[u8]) -> Result<u16> {
    let Some(mut header) = data.get(..HEADER_LEN) else {
        trace!("Input of {} bytes is shorter than the TNEF header", data.len());
        return Err(Error::NoMarker);
    };

    if header.get_u32_le() != TNEF_SIGNATURE {
        return Err(Error::NoMarker);
    }
    Ok(header.get_u16_le())
}

/// Decode an in-memory TNEF buffer with default configuration
pub fn decode(data: &[u8]) -> Result<DecodedMessage> {
    Decoder::new().decode(data)
}

/// Read a file and decode it with default configuration
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedMessage> {
    Decoder::new().decode_file(path)
}

/// Accumulator threaded through one decode call.
///
/// The current attachment is always the last element of
/// `message.attachments`.
struct DecodeState<'o, O: ?Sized> {
    message: DecodedMessage,
    encoding: &'static Encoding,
    collect_warnings: bool,
    observer: &'o mut O,
}

impl<'o, O> DecodeState<'o, O>
where
    O: DecodeObserver + ?Sized,
{
    fn new(key: u16, collect_warnings: bool, observer: &'o mut O) -> Self {
        Self {
            message: DecodedMessage::new(key),
            encoding: text::default_encoding(),
            collect_warnings,
            observer,
        }
    }

    fn finish(self) -> DecodedMessage {
        self.message
    }

    fn warn(&mut self, warning: Warning) {
        debug!("{}", warning);
        self.observer.on_warning(&warning);
        if self.collect_warnings {
            self.message.warnings.push(warning);
        }
    }

    fn step(&mut self, offset: usize, record: &Record<'_>) {
        trace!(
            "Record at offset {}: level {} tag {:#06x} type {:#06x} ({} payload bytes)",
            offset,
            record.level,
            record.tag,
            record.attr_type,
            record.payload.len()
        );
        self.observer.on_record(offset, record);

        if record.is_clamped() {
            self.warn(Warning::ClampedRecord {
                offset,
                tag: record.tag,
                declared: record.declared_len,
                available: record.consumed,
            });
        }

        let attribute = Attribute::from_tag(record.tag);
        if attribute == Some(Attribute::AttachRendData) {
            self.open_attachment(record.payload);
            return;
        }

        match Level::from_u8(record.level) {
            Some(Level::Attachment) => self.apply_attachment(offset, attribute, record),
            Some(Level::Message) => self.apply_message(offset, attribute, record),
            None => self.warn(Warning::UnknownLevel {
                offset,
                level: record.level,
                tag: record.tag,
            }),
        }
    }

    fn open_attachment(&mut self, rendering: &[u8]) {
        self.message.attachments.push(Attachment {
            rendering: rendering.to_vec(),
            ..Attachment::default()
        });
        let index = self.message.attachments.len() - 1;
        trace!("Opened attachment {}", index);
        self.observer.on_attachment(index);
    }

    fn apply_attachment(&mut self, offset: usize, attribute: Option<Attribute>, record: &Record<'_>) {
        let encoding = self.encoding;
        let Some(attachment) = self.message.attachments.last_mut() else {
            self.warn(Warning::OrphanAttachmentAttribute {
                offset,
                tag: record.tag,
            });
            return;
        };

        if let Err(e) = build_attachment(attachment, attribute, record.payload, encoding) {
            self.warn(Warning::PropertyList {
                offset,
                tag: record.tag,
                reason: e.to_string(),
            });
        }
    }

    fn apply_message(&mut self, offset: usize, attribute: Option<Attribute>, record: &Record<'_>) {
        if attribute == Some(Attribute::MsgProps) {
            match decode_properties(record.payload, 0) {
                Ok(properties) => self.apply_message_properties(properties),
                Err(e) => self.warn(Warning::PropertyList {
                    offset,
                    tag: record.tag,
                    reason: e.to_string(),
                }),
            }
            return;
        }

        let Some(field) = message_field_for_attribute(record.tag) else {
            trace!("Skipping message attribute {:#06x}", record.tag);
            return;
        };
        *self.message.field_mut(field) = record.payload.to_vec();

        if field == MessageField::OemCodepage {
            if let Some(encoding) = self
                .message
                .oem_codepage()
                .and_then(text::encoding_for_codepage)
            {
                debug!("Using {} for 8-bit strings", encoding.name());
                self.encoding = encoding;
            }
        }
    }

    fn apply_message_properties(&mut self, properties: Vec<MapiProperty>) {
        for property in &properties {
            if let Some(field) = message_field_for_property(property.tag) {
                *self.message.field_mut(field) = property.string_bytes();
            }
        }
        self.message.attributes.extend(properties);
    }
}

/// Apply one attachment-level record to `attachment`.
///
/// Only a broken property list is reported; the attachment is left as it
/// was in that case.
fn build_attachment(
    attachment: &mut Attachment,
    attribute: Option<Attribute>,
    payload: &[u8],
    encoding: &'static Encoding,
) -> Result<()> {
    match attribute {
        Some(Attribute::AttachModifyDate) => attachment.modification_date = payload.to_vec(),
        Some(Attribute::AttachCreateDate) => attachment.creation_date = payload.to_vec(),
        Some(Attribute::AttachTitle) => attachment.title = text::decode_bytes(payload, encoding),
        Some(Attribute::AttachData) => attachment.data = payload.to_vec(),
        Some(Attribute::AttachTransportFilename) => {
            attachment.transport_filename = Some(text::decode_bytes(payload, encoding));
        }
        Some(Attribute::Attachment) => {
            let properties = decode_properties(payload, 0)?;
            apply_attachment_properties(attachment, properties, encoding);
        }
        _ => {}
    }
    Ok(())
}

fn apply_attachment_properties(
    attachment: &mut Attachment,
    properties: Vec<MapiProperty>,
    encoding: &'static Encoding,
) {
    for property in &properties {
        match property.tag {
            prop_id::ATTACH_FILENAME | prop_id::DISPLAY_NAME => {
                attachment.title = property.text(encoding);
            }
            prop_id::ATTACH_LONG_FILENAME => {
                attachment.long_filename = Some(property.text(encoding));
            }
            prop_id::ATTACH_MIME_TAG => attachment.mime_type = Some(property.text(encoding)),
            prop_id::ATTACH_CONTENT_ID => attachment.content_id = Some(property.text(encoding)),
            prop_id::ATTACH_EXTENSION => attachment.extension = Some(property.text(encoding)),
            _ => {}
        }
    }
    attachment.properties.extend(properties);
}
