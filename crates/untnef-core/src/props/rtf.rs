//! Compressed RTF (`PR_RTF_COMPRESSED`) decompression.
//!
//! The stream starts with a 16-byte header:
//!
//! ```text
//! [4] compressed size (counts everything after this field)
//! [4] uncompressed size
//! [4] "LZFu" (compressed) or "MELA" (stored)
//! [4] CRC-32 of the compressed data (not checked)
//! ```
//!
//! LZFu is an LZ77 variant over a 4096-byte ring dictionary that starts
//! out holding a fixed RTF prefix. Each control byte describes the next
//! eight tokens, least significant bit first: a clear bit is a literal
//! byte, a set bit is a big-endian word of 12-bit dictionary offset and
//! 4-bit length (plus 2). A reference to the current write position ends
//! the stream.

use crate::error::{Error, Result};
use bytes::Buf;

const RTF_HEADER_LEN: usize = 16;
const DICT_SIZE: usize = 4096;

const MAGIC_COMPRESSED: u32 = 0x7546_5a4c;
const MAGIC_UNCOMPRESSED: u32 = 0x414c_454d;

const PREBUF: &[u8] = b"{\\rtf1\\ansi\\mac\\deff0\\deftab720{\\fonttbl;}\
{\\f0\\fnil \\froman \\fswiss \\fmodern \\fscript \\fdecor MS Sans SerifSymbolArial\
Times New RomanCourier{\\colortbl\\red0\\green0\\blue0\r\n\\par \\pard\\plain\\f0\
\\fs20\\b\\i\\u\\tab\\tx";

/// Decompress a `PR_RTF_COMPRESSED` value into plain RTF.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() < RTF_HEADER_LEN {
        return Err(Error::rtf(format!(
            "header needs {} bytes, have {}",
            RTF_HEADER_LEN,
            data.len()
        )));
    }

    let mut header = &data[..RTF_HEADER_LEN];
    let compressed_size = header.get_u32_le() as usize;
    let raw_size = header.get_u32_le() as usize;
    let magic = header.get_u32_le();
    let _crc = header.get_u32_le();

    let end = compressed_size
        .saturating_add(4)
        .clamp(RTF_HEADER_LEN, data.len());
    let body = &data[RTF_HEADER_LEN..end];

    match magic {
        MAGIC_COMPRESSED => Ok(inflate(body, raw_size)),
        MAGIC_UNCOMPRESSED => Ok(body[..raw_size.min(body.len())].to_vec()),
        other => Err(Error::rtf(format!("unknown compression type {:#010x}", other))),
    }
}

fn inflate(input: &[u8], raw_size: usize) -> Vec<u8> {
    let mut dict = [0u8; DICT_SIZE];
    dict[..PREBUF.len()].copy_from_slice(PREBUF);
    let mut write = PREBUF.len();

    let mut out = Vec::with_capacity(raw_size.min(input.len().saturating_mul(9)));
    let mut pos = 0;

    'stream: while pos < input.len() {
        let control = input[pos];
        pos += 1;

        for bit in 0..8 {
            if pos >= input.len() {
                break 'stream;
            }

            if control & (1 << bit) == 0 {
                let byte = input[pos];
                pos += 1;
                out.push(byte);
                dict[write] = byte;
                write = (write + 1) % DICT_SIZE;
                continue;
            }

            if pos + 1 >= input.len() {
                break 'stream;
            }
            let word = u16::from_be_bytes([input[pos], input[pos + 1]]);
            pos += 2;

            let offset = (word >> 4) as usize;
            let len = (word & 0x0f) as usize + 2;
            if offset == write {
                break 'stream;
            }

            for i in 0..len {
                let byte = dict[(offset + i) % DICT_SIZE];
                out.push(byte);
                dict[write] = byte;
                write = (write + 1) % DICT_SIZE;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prebuf_length() {
        assert_eq!(PREBUF.len(), 207);
    }

    #[test]
    fn test_decompress_lzfu() {
        let data = [
            0x2d, 0x00, 0x00, 0x00, 0x2b, 0x00, 0x00, 0x00, 0x4c, 0x5a, 0x46, 0x75, 0xf1, 0xc5,
            0xc7, 0xa7, 0x03, 0x00, 0x0a, 0x00, 0x72, 0x63, 0x70, 0x67, 0x31, 0x32, 0x35, 0x42,
            0x32, 0x0a, 0xf3, 0x20, 0x68, 0x65, 0x6c, 0x09, 0x00, 0x20, 0x62, 0x77, 0x05, 0xb0,
            0x6c, 0x64, 0x7d, 0x0a, 0x80, 0x0f, 0xa0,
        ];
        let rtf = decompress(&data).unwrap();
        assert_eq!(
            String::from_utf8(rtf).unwrap(),
            "{\\rtf1\\ansi\\ansicpg1252\\pard hello world}\r\n"
        );
    }

    #[test]
    fn test_decompress_stored() {
        let mut data = Vec::new();
        data.extend_from_slice(&(12u32 + 5).to_le_bytes());
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(b"MELA");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(b"{\\rtf");
        assert_eq!(decompress(&data).unwrap(), b"{\\rtf");
    }

    #[test]
    fn test_decompress_unknown_magic() {
        let mut data = vec![0u8; 16];
        data[8..12].copy_from_slice(b"ABCD");
        let err = decompress(&data).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_decompress_truncated_header() {
        assert!(decompress(&[0x2d, 0x00]).is_err());
    }

    #[test]
    fn test_decompress_truncated_body_does_not_panic() {
        let data = [
            0x2d, 0x00, 0x00, 0x00, 0x2b, 0x00, 0x00, 0x00, 0x4c, 0x5a, 0x46, 0x75, 0xf1, 0xc5,
            0xc7, 0xa7, 0x03, 0x00, 0x0a, 0x00, 0x72,
        ];
        for cut in RTF_HEADER_LEN..=data.len() {
            assert!(decompress(&data[..cut]).is_ok());
        }
    }
}
