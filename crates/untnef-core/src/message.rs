//! Decoded message model.

use crate::error::Result;
use crate::props::{rtf, MapiProperty};
use crate::text;
use std::fmt;

/// An attachment recovered from the stream.
///
/// Dates are kept as the raw attribute bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    /// File name, from `attAttachTitle` or the attachment property list
    pub title: String,
    /// Attachment content
    pub data: Vec<u8>,
    /// Raw `attAttachModifyDate` payload
    pub modification_date: Vec<u8>,
    /// Raw `attAttachCreateDate` payload
    pub creation_date: Vec<u8>,
    /// Raw `attAttachRendData` payload that opened this attachment
    pub rendering: Vec<u8>,
    /// `attAttachTransportFilename`
    pub transport_filename: Option<String>,
    /// `PR_ATTACH_LONG_FILENAME`
    pub long_filename: Option<String>,
    /// `PR_ATTACH_MIME_TAG`
    pub mime_type: Option<String>,
    /// `PR_ATTACH_CONTENT_ID`
    pub content_id: Option<String>,
    /// `PR_ATTACH_EXTENSION`
    pub extension: Option<String>,
    /// Every property from the attachment's property list
    pub properties: Vec<MapiProperty>,
}

impl Attachment {
    /// Best available file name: long name, then title, then transport name
    pub fn filename(&self) -> Option<&str> {
        [
            self.long_filename.as_deref(),
            Some(self.title.as_str()),
            self.transport_filename.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
    }

    /// Looks up a property from the attachment's property list
    pub fn property(&self, tag: u16) -> Option<&MapiProperty> {
        self.properties.iter().rev().find(|prop| prop.tag == tag)
    }
}

/// Message-level fields that attribute and property records can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum MessageField {
    Body,
    BodyHtml,
    RtfBody,
    Subject,
    From,
    MessageClass,
    MessageId,
    ParentId,
    ConversationId,
    DateSent,
    DateReceived,
    DateModified,
    Priority,
    MessageStatus,
    TnefVersion,
    OemCodepage,
    OriginalMessageClass,
}

/// Something the decoder skipped or repaired
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
    /// A record's declared length ran past the end of the input
    ClampedRecord {
        /// Record offset
        offset: usize,
        /// Attribute tag
        tag: u16,
        /// Declared payload length
        declared: u32,
        /// Bytes the record actually occupied
        available: usize,
    },
    /// An attachment-level record arrived before any attachment was opened
    OrphanAttachmentAttribute {
        /// Record offset
        offset: usize,
        /// Attribute tag
        tag: u16,
    },
    /// A property list payload could not be decoded
    PropertyList {
        /// Record offset
        offset: usize,
        /// Attribute tag
        tag: u16,
        /// Decoder error message
        reason: String,
    },
    /// A record carried a level byte that is neither message nor attachment
    UnknownLevel {
        /// Record offset
        offset: usize,
        /// Raw level byte
        level: u8,
        /// Attribute tag
        tag: u16,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ClampedRecord {
                offset,
                tag,
                declared,
                available,
            } => write!(
                f,
                "record {:#06x} at offset {} declares {} payload bytes but only {} bytes remain",
                tag, offset, declared, available
            ),
            Warning::OrphanAttachmentAttribute { offset, tag } => write!(
                f,
                "attachment attribute {:#06x} at offset {} precedes any attachment",
                tag, offset
            ),
            Warning::PropertyList {
                offset,
                tag,
                reason,
            } => write!(
                f,
                "property list in {:#06x} at offset {} ignored: {}",
                tag, offset, reason
            ),
            Warning::UnknownLevel { offset, level, tag } => write!(
                f,
                "record {:#06x} at offset {} has unknown level {}",
                tag, offset, level
            ),
        }
    }
}

/// Everything recovered from one TNEF buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedMessage {
    /// Legacy key from the header, never validated
    pub key: u16,
    /// Plain text body
    pub body: Vec<u8>,
    /// HTML body
    pub body_html: Vec<u8>,
    /// RTF body, still compressed (see [`DecodedMessage::rtf_body_decompressed`])
    pub rtf_body: Vec<u8>,
    /// Attachments in stream order
    pub attachments: Vec<Attachment>,
    /// Message-level MAPI properties
    pub attributes: Vec<MapiProperty>,
    /// Raw `attSubject`
    pub subject: Vec<u8>,
    /// Raw `attFrom`
    pub from: Vec<u8>,
    /// Raw `attMessageClass`
    pub message_class: Vec<u8>,
    /// Raw `attMessageID`
    pub message_id: Vec<u8>,
    /// Raw `attParentID`
    pub parent_id: Vec<u8>,
    /// Raw `attConversationID`
    pub conversation_id: Vec<u8>,
    /// Raw `attDateSent`
    pub date_sent: Vec<u8>,
    /// Raw `attDateRecd`
    pub date_received: Vec<u8>,
    /// Raw `attDateModified`
    pub date_modified: Vec<u8>,
    /// Raw `attPriority`
    pub priority: Vec<u8>,
    /// Raw `attMessageStatus`
    pub message_status: Vec<u8>,
    /// Raw `attTnefVersion`
    pub tnef_version: Vec<u8>,
    /// Raw `attOemCodepage`
    pub oem_codepage: Vec<u8>,
    /// Raw `attOriginalMessageClass`
    pub original_message_class: Vec<u8>,
    /// Repairs and skips, only filled when warnings are enabled
    pub warnings: Vec<Warning>,
}

impl DecodedMessage {
    /// Creates an empty message carrying the header key
    pub fn new(key: u16) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    /// Raw bytes of a message field
    pub fn field(&self, field: MessageField) -> &[u8] {
        match field {
            MessageField::Body => &self.body,
            MessageField::BodyHtml => &self.body_html,
            MessageField::RtfBody => &self.rtf_body,
            MessageField::Subject => &self.subject,
            MessageField::From => &self.from,
            MessageField::MessageClass => &self.message_class,
            MessageField::MessageId => &self.message_id,
            MessageField::ParentId => &self.parent_id,
            MessageField::ConversationId => &self.conversation_id,
            MessageField::DateSent => &self.date_sent,
            MessageField::DateReceived => &self.date_received,
            MessageField::DateModified => &self.date_modified,
            MessageField::Priority => &self.priority,
            MessageField::MessageStatus => &self.message_status,
            MessageField::TnefVersion => &self.tnef_version,
            MessageField::OemCodepage => &self.oem_codepage,
            MessageField::OriginalMessageClass => &self.original_message_class,
        }
    }

    /// Mutable raw bytes of a message field
    pub fn field_mut(&mut self, field: MessageField) -> &mut Vec<u8> {
        match field {
            MessageField::Body => &mut self.body,
            MessageField::BodyHtml => &mut self.body_html,
            MessageField::RtfBody => &mut self.rtf_body,
            MessageField::Subject => &mut self.subject,
            MessageField::From => &mut self.from,
            MessageField::MessageClass => &mut self.message_class,
            MessageField::MessageId => &mut self.message_id,
            MessageField::ParentId => &mut self.parent_id,
            MessageField::ConversationId => &mut self.conversation_id,
            MessageField::DateSent => &mut self.date_sent,
            MessageField::DateReceived => &mut self.date_received,
            MessageField::DateModified => &mut self.date_modified,
            MessageField::Priority => &mut self.priority,
            MessageField::MessageStatus => &mut self.message_status,
            MessageField::TnefVersion => &mut self.tnef_version,
            MessageField::OemCodepage => &mut self.oem_codepage,
            MessageField::OriginalMessageClass => &mut self.original_message_class,
        }
    }

    /// `attTnefVersion` as a number
    pub fn tnef_version(&self) -> Option<u32> {
        read_u32_le(&self.tnef_version)
    }

    /// Primary codepage from `attOemCodepage`
    pub fn oem_codepage(&self) -> Option<u32> {
        read_u32_le(&self.oem_codepage)
    }

    /// Subject decoded with the message codepage
    pub fn subject_text(&self) -> String {
        self.decode_text(&self.subject)
    }

    /// Plain body decoded with the message codepage
    pub fn body_text(&self) -> String {
        self.decode_text(&self.body)
    }

    /// Decompressed RTF body, empty when the message has none
    pub fn rtf_body_decompressed(&self) -> Result<Vec<u8>> {
        if self.rtf_body.is_empty() {
            return Ok(Vec::new());
        }
        rtf::decompress(&self.rtf_body)
    }

    /// Looks up a message-level MAPI property, last occurrence wins
    pub fn property(&self, tag: u16) -> Option<&MapiProperty> {
        self.attributes.iter().rev().find(|prop| prop.tag == tag)
    }

    fn decode_text(&self, bytes: &[u8]) -> String {
        let encoding = self
            .oem_codepage()
            .and_then(text::encoding_for_codepage)
            .unwrap_or_else(text::default_encoding);
        text::decode_bytes(bytes, encoding)
    }
}

fn read_u32_le(bytes: &[u8]) -> Option<u32> {
    let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(raw))
}
