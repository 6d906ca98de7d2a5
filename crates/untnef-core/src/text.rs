//! Byte string to text conversion.
//!
//! Every helper here drops NUL bytes/characters: TNEF producers pad
//! strings with them and the decoded text must never contain one.

use encoding_rs::{Encoding, UTF_16LE, UTF_8};

/// Encoding used before any codepage is known
pub(crate) fn default_encoding() -> &'static Encoding {
    UTF_8
}

/// Resolve a Windows codepage number to an 8-bit encoding.
///
/// UTF-16 codepages are rejected: 8-bit strings have their NUL bytes
/// stripped before decoding.
pub(crate) fn encoding_for_codepage(codepage: u32) -> Option<&'static Encoding> {
    u16::try_from(codepage)
        .ok()
        .and_then(codepage::to_encoding)
        .filter(|encoding| encoding.is_ascii_compatible())
}

/// Decode an 8-bit string, removing every NUL byte first
pub(crate) fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> String {
    let stripped: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
    let (text, _) = encoding.decode_without_bom_handling(&stripped);
    text.into_owned()
}

/// Decode a UTF-16LE string, removing every NUL character
pub(crate) fn decode_utf16(bytes: &[u8]) -> String {
    let (text, _) = UTF_16LE.decode_without_bom_handling(bytes);
    text.chars().filter(|&c| c != '\0').collect()
}
