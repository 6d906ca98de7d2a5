//! # untnef-core
//!
//! A library for decoding Microsoft TNEF (Transport Neutral Encapsulation
//! Format) containers, the `winmail.dat` attachments produced by Outlook
//! and Exchange.
//!
//! This crate provides the core functionality for:
//! - Framing the self-describing attribute records of a TNEF stream
//! - Recovering the message body (plain text, HTML, compressed RTF)
//! - Recovering attachments with their names, content and timestamps
//! - Decoding the nested MAPI property lists carried by some attributes
//!
//! ## Architecture
//!
//! - [`decoder`]: Header validation, record framing and attribute routing
//! - [`props`]: MAPI property lists and compressed RTF
//! - [`message`]: The decoded message model
//! - [`tags`]: Attribute, level and property identifiers
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use std::fs;
//!
//! let data = fs::read("winmail.dat")?;
//! let message = untnef_core::decode(&data)?;
//!
//! println!("body: {}", message.body_text());
//! for attachment in &message.attachments {
//!     println!("{} ({} bytes)", attachment.title, attachment.data.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Robustness
//!
//! Only a missing signature aborts decoding. Truncated records, broken
//! property lists and out-of-place attributes are skipped; enable
//! [`DecoderConfig::collect_warnings`] or pass a [`DecodeObserver`] to see
//! them. The decoder places no bound on input size by default, so callers
//! handling untrusted input should set [`DecoderConfig::max_input_size`].

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod decoder;
pub mod error;
pub mod message;
pub mod props;
pub mod tags;

mod text;

// Re-export primary types for convenience
pub use decoder::{
    decode, decode_file, DecodeObserver, Decoder, DecoderConfig, NullObserver, Record,
    RecordStream, StatsObserver,
};
pub use error::{Error, Result};
pub use message::{Attachment, DecodedMessage, MessageField, Warning};
pub use props::{decode_properties, MapiProperty};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
