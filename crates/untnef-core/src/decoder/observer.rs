//! Diagnostics hook for the decoder.
//!
//! The [`DecodeObserver`] trait sees every framed record, every opened
//! attachment and every warning as the decoder walks the stream. All
//! methods default to no-ops.

use super::frame::Record;
use crate::message::Warning;

/// Trait for watching a decode in progress.
///
/// # Example
///
/// ```
/// use untnef_core::{DecodeObserver, Decoder, Record};
///
/// #[derive(Default)]
/// struct TagLog(Vec<u16>);
///
/// impl DecodeObserver for TagLog {
///     fn on_record(&mut self, _offset: usize, record: &Record<'_>) {
///         self.0.push(record.tag);
///     }
/// }
///
/// let mut log = TagLog::default();
/// let _ = Decoder::new().decode_with(&[0u8; 4], &mut log);
/// assert!(log.0.is_empty());
/// ```
pub trait DecodeObserver {
    /// Called for every framed record, recognized or not
    fn on_record(&mut self, offset: usize, record: &Record<'_>) {
        let _ = (offset, record);
    }

    /// Called when an attachment boundary opens attachment `index`
    fn on_attachment(&mut self, index: usize) {
        let _ = index;
    }

    /// Called for every repair or skip, whether or not warnings are collected
    fn on_warning(&mut self, warning: &Warning) {
        let _ = warning;
    }
}

/// An observer that ignores everything
pub struct NullObserver;

impl DecodeObserver for NullObserver {}

/// An observer that counts what the decoder saw
#[derive(Debug, Default)]
pub struct StatsObserver {
    /// Number of framed records
    pub record_count: usize,
    /// Number of records whose length was clamped
    pub clamped_count: usize,
    /// Number of attachments opened
    pub attachment_count: usize,
    /// Number of warnings
    pub warning_count: usize,
    /// Total bytes consumed by framed records
    pub bytes_framed: usize,
}

impl DecodeObserver for StatsObserver {
    fn on_record(&mut self, _offset: usize, record: &Record<'_>) {
        self.record_count += 1;
        self.bytes_framed += record.consumed;
        if record.is_clamped() {
            self.clamped_count += 1;
        }
    }

    fn on_attachment(&mut self, _index: usize) {
        self.attachment_count += 1;
    }

    fn on_warning(&mut self, _warning: &Warning) {
        self.warning_count += 1;
    }
}
