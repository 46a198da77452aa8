//! Chunk framing: four big-endian length octets, four type octets,
//! `length` payload octets, four big-endian CRC octets.
//!
//! Unlike a lenient reader that shrugs off a bad CRC and moves on, every
//! chunk here is validated as it is read: a short read, an over-cap
//! length, or a CRC mismatch all abort the decode immediately.

use crate::crc::crc32;
use crate::error::ChunkError;

const LENGTH_SIZE: usize = 4;
const TYPE_SIZE: usize = 4;
const CRC_SIZE: usize = 4;

pub const IHDR: [u8; 4] = *b"IHDR";
pub const PLTE: [u8; 4] = *b"PLTE";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";
pub const TRNS: [u8; 4] = *b"tRNS";

/// One fully-validated chunk: framing consumed, CRC checked.
#[derive(Debug)]
pub struct RawChunk<'a> {
    pub chunk_type: [u8; 4],
    pub data: &'a [u8],
}

impl<'a> RawChunk<'a> {
    /// ASCII rendering of the chunk type, for error messages and logging.
    /// Falls back to a lossy rendering if the bytes are somehow non-ASCII
    /// (the type field is defined to be ASCII letters, but a malformed
    /// stream could still carry arbitrary bytes there).
    pub fn type_name(&self) -> String {
        String::from_utf8_lossy(&self.chunk_type).into_owned()
    }

    /// Bit 5 (0x20) of the first type octet distinguishes critical
    /// (clear, uppercase letter) from ancillary (set, lowercase letter)
    /// chunks, per the PNG chunk-naming convention.
    pub fn is_critical(&self) -> bool {
        self.chunk_type[0] & 0x20 == 0
    }
}

/// Iterates the chunks of a PNG byte stream that follows the 8-byte
/// signature, enforcing the per-chunk length cap and CRC on every chunk
/// as it is produced.
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    max_chunk_bytes: u32,
    stopped: bool,
}

impl<'a> ChunkReader<'a> {
    pub fn new(data: &'a [u8], max_chunk_bytes: u32) -> Self {
        Self { data, pos: 0, max_chunk_bytes, stopped: false }
    }

    /// Byte offset of the next unread chunk (used by the caller to detect
    /// trailing bytes after IEND).
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ChunkError> {
        let end = self.pos.checked_add(n).ok_or(ChunkError::ShortRead)?;
        if end > self.data.len() {
            return Err(ChunkError::ShortRead);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<RawChunk<'a>, ChunkError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.stopped || self.pos >= self.data.len() {
            return None;
        }

        let result = (|| -> Result<RawChunk<'a>, ChunkError> {
            let length_bytes = self.take(LENGTH_SIZE)?;
            let length = u32::from_be_bytes([
                length_bytes[0],
                length_bytes[1],
                length_bytes[2],
                length_bytes[3],
            ]);

            let type_bytes = self.take(TYPE_SIZE)?;
            let chunk_type = [type_bytes[0], type_bytes[1], type_bytes[2], type_bytes[3]];

            // The spec's hard ceiling (length must fit in 31 bits) applies
            // unconditionally, regardless of how `max_chunk_bytes` is configured.
            if length > i32::MAX as u32 {
                return Err(ChunkError::TooLarge {
                    chunk_type: String::from_utf8_lossy(&chunk_type).into_owned(),
                    length,
                    max: i32::MAX as u32,
                });
            }

            if length > self.max_chunk_bytes {
                return Err(ChunkError::TooLarge {
                    chunk_type: String::from_utf8_lossy(&chunk_type).into_owned(),
                    length,
                    max: self.max_chunk_bytes,
                });
            }

            let data = self.take(length as usize)?;
            let crc_bytes = self.take(CRC_SIZE)?;
            let stored_crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

            let mut crc_input = Vec::with_capacity(TYPE_SIZE + data.len());
            crc_input.extend_from_slice(&chunk_type);
            crc_input.extend_from_slice(data);
            if crc32(&crc_input) != stored_crc {
                return Err(ChunkError::CrcMismatch {
                    chunk_type: String::from_utf8_lossy(&chunk_type).into_owned(),
                });
            }

            Ok(RawChunk { chunk_type, data })
        })();

        if result.is_err() {
            self.stopped = true;
        }
        Some(result)
    }
}
