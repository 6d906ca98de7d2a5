//! Numeric tables of the TNEF format.
//!
//! Level markers, attribute tags, MAPI property identifiers and MAPI
//! property types. Everything the router and the builders dispatch on
//! lives here so that no magic numbers appear in the decoding logic.

/// TNEF signature, little-endian u32 at offset 0
pub const TNEF_SIGNATURE: u32 = 0x223e_9f78;

/// Size of the signature plus the legacy key
pub const HEADER_LEN: usize = 6;

/// Records are only framed while strictly more than this many bytes remain
pub const MIN_OBJ_SIZE: usize = 12;

/// Scope of an attribute record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Level {
    /// Applies to the message itself
    Message = 0x01,
    /// Applies to the most recently opened attachment
    Attachment = 0x02,
}

impl Level {
    /// Maps a raw level byte, `None` for anything unassigned
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Level::Message),
            0x02 => Some(Level::Attachment),
            _ => None,
        }
    }
}

/// TNEF attribute identifiers (the low word of the attribute id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum Attribute {
    Owner = 0x0000,
    SentFor = 0x0001,
    Delegate = 0x0002,
    DateStart = 0x0006,
    DateEnd = 0x0007,
    AidOwner = 0x0008,
    RequestRes = 0x0009,
    From = 0x8000,
    Subject = 0x8004,
    DateSent = 0x8005,
    DateRecd = 0x8006,
    MessageStatus = 0x8007,
    MessageClass = 0x8008,
    MessageId = 0x8009,
    ParentId = 0x800a,
    ConversationId = 0x800b,
    Body = 0x800c,
    Priority = 0x800d,
    AttachData = 0x800f,
    AttachTitle = 0x8010,
    AttachMetaFile = 0x8011,
    AttachCreateDate = 0x8012,
    AttachModifyDate = 0x8013,
    DateModified = 0x8020,
    AttachTransportFilename = 0x9001,
    /// Opens a new attachment
    AttachRendData = 0x9002,
    MsgProps = 0x9003,
    RecipTable = 0x9004,
    /// Attachment property list
    Attachment = 0x9005,
    TnefVersion = 0x9006,
    OemCodepage = 0x9007,
    OriginalMessageClass = 0x9008,
}

impl Attribute {
    const ALL: [Attribute; 32] = [
        Attribute::Owner,
        Attribute::SentFor,
        Attribute::Delegate,
        Attribute::DateStart,
        Attribute::DateEnd,
        Attribute::AidOwner,
        Attribute::RequestRes,
        Attribute::From,
        Attribute::Subject,
        Attribute::DateSent,
        Attribute::DateRecd,
        Attribute::MessageStatus,
        Attribute::MessageClass,
        Attribute::MessageId,
        Attribute::ParentId,
        Attribute::ConversationId,
        Attribute::Body,
        Attribute::Priority,
        Attribute::AttachData,
        Attribute::AttachTitle,
        Attribute::AttachMetaFile,
        Attribute::AttachCreateDate,
        Attribute::AttachModifyDate,
        Attribute::DateModified,
        Attribute::AttachTransportFilename,
        Attribute::AttachRendData,
        Attribute::MsgProps,
        Attribute::RecipTable,
        Attribute::Attachment,
        Attribute::TnefVersion,
        Attribute::OemCodepage,
        Attribute::OriginalMessageClass,
    ];

    /// Looks up a raw tag, `None` for tags this table does not name
    pub fn from_tag(tag: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|attr| attr.tag() == tag)
    }

    /// Raw tag value
    pub fn tag(self) -> u16 {
        self as u16
    }
}

/// MAPI property identifiers used by the decoder
pub mod prop_id {
    /// `PR_MESSAGE_CLASS`
    pub const MESSAGE_CLASS: u16 = 0x001a;
    /// `PR_SUBJECT`
    pub const SUBJECT: u16 = 0x0037;
    /// `PR_TRANSPORT_MESSAGE_HEADERS`
    pub const TRANSPORT_MESSAGE_HEADERS: u16 = 0x007d;
    /// `PR_BODY`
    pub const BODY: u16 = 0x1000;
    /// `PR_RTF_COMPRESSED`
    pub const RTF_COMPRESSED: u16 = 0x1009;
    /// `PR_BODY_HTML`
    pub const BODY_HTML: u16 = 0x1013;
    /// `PR_DISPLAY_NAME`
    pub const DISPLAY_NAME: u16 = 0x3001;
    /// `PR_ATTACH_DATA_BIN` / `PR_ATTACH_DATA_OBJ`
    pub const ATTACH_DATA: u16 = 0x3701;
    /// `PR_ATTACH_EXTENSION`
    pub const ATTACH_EXTENSION: u16 = 0x3703;
    /// `PR_ATTACH_FILENAME`
    pub const ATTACH_FILENAME: u16 = 0x3704;
    /// `PR_ATTACH_METHOD`
    pub const ATTACH_METHOD: u16 = 0x3705;
    /// `PR_ATTACH_LONG_FILENAME`
    pub const ATTACH_LONG_FILENAME: u16 = 0x3707;
    /// `PR_ATTACH_MIME_TAG`
    pub const ATTACH_MIME_TAG: u16 = 0x370e;
    /// `PR_ATTACH_CONTENT_ID`
    pub const ATTACH_CONTENT_ID: u16 = 0x3712;
    /// `PR_INTERNET_CPID`
    pub const INTERNET_CPID: u16 = 0x3fde;

    /// First identifier of the named-property range
    pub const NAMED_START: u16 = 0x8000;
}

/// Flag OR-ed into a property type for multi-valued properties
pub const MV_FLAG: u16 = 0x1000;

/// How many bytes a single property value occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueWidth {
    /// Fixed width, before padding to 4 bytes
    Fixed(usize),
    /// Length-prefixed
    Variable,
}

/// MAPI property types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum PropType {
    Unspecified = 0x0000,
    Null = 0x0001,
    Short = 0x0002,
    Long = 0x0003,
    Float = 0x0004,
    Double = 0x0005,
    Currency = 0x0006,
    AppTime = 0x0007,
    Error = 0x000a,
    Boolean = 0x000b,
    Object = 0x000d,
    Int64 = 0x0014,
    String8 = 0x001e,
    Unicode = 0x001f,
    SysTime = 0x0040,
    Clsid = 0x0048,
    Binary = 0x0102,
}

impl PropType {
    /// Maps a raw type (without [`MV_FLAG`]), `None` for unknown types
    pub fn from_u16(value: u16) -> Option<Self> {
        let ty = match value {
            0x0000 => PropType::Unspecified,
            0x0001 => PropType::Null,
            0x0002 => PropType::Short,
            0x0003 => PropType::Long,
            0x0004 => PropType::Float,
            0x0005 => PropType::Double,
            0x0006 => PropType::Currency,
            0x0007 => PropType::AppTime,
            0x000a => PropType::Error,
            0x000b => PropType::Boolean,
            0x000d => PropType::Object,
            0x0014 => PropType::Int64,
            0x001e => PropType::String8,
            0x001f => PropType::Unicode,
            0x0040 => PropType::SysTime,
            0x0048 => PropType::Clsid,
            0x0102 => PropType::Binary,
            _ => return None,
        };
        Some(ty)
    }

    /// Encoded width of one value of this type
    pub fn width(self) -> ValueWidth {
        match self {
            PropType::Unspecified | PropType::Null => ValueWidth::Fixed(0),
            PropType::Short | PropType::Boolean => ValueWidth::Fixed(2),
            PropType::Long | PropType::Float | PropType::Error => ValueWidth::Fixed(4),
            PropType::Double
            | PropType::Currency
            | PropType::AppTime
            | PropType::Int64
            | PropType::SysTime => ValueWidth::Fixed(8),
            PropType::Clsid => ValueWidth::Fixed(16),
            PropType::Object | PropType::String8 | PropType::Unicode | PropType::Binary => {
                ValueWidth::Variable
            }
        }
    }
}
