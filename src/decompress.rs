//! Concatenates the payloads of every IDAT chunk and inflates the result as
//! a single zlib stream (RFC 1950 wrapping RFC 1951), the way the image
//! data of a PNG is specified to be split and rejoined.

use log::trace;

use crate::error::DecodeError;

/// Inflates a zlib-wrapped DEFLATE stream.
pub fn inflate(idat: &[u8]) -> Result<Vec<u8>, DecodeError> {
    trace!("inflating {} bytes of zlib stream", idat.len());
    inflate::inflate_bytes_zlib(idat).map_err(DecodeError::Decompress)
}
