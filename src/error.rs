use std::fmt;
use std::io;

/// Everything that can go wrong while decoding a PNG byte stream.
///
/// Every variant is fatal: a decode either returns a complete `RgbaImage`
/// or one of these, never a partial result alongside an error.
#[derive(Debug)]
pub enum DecodeError {
    /// The underlying byte source failed or was truncated.
    Io(io::Error),
    /// The first 8 octets did not match the PNG magic signature.
    BadSignature,
    /// A chunk's framing or CRC was invalid.
    BadChunk(ChunkError),
    /// IHDR was malformed, or described an illegal geometry / method / colour combination.
    BadHeader(String),
    /// A chunk-ordering or multiplicity rule from the container format was broken.
    OrderingViolation(String),
    /// PLTE payload was malformed or duplicated.
    BadPalette(String),
    /// tRNS payload was the wrong size for the colour type, present where forbidden, or duplicated.
    BadTransparency(String),
    /// The zlib/DEFLATE stream failed to inflate, or inflated to the wrong length.
    Decompress(String),
    /// A scanline's leading filter-type octet was out of range, or the scanline was truncated.
    BadFilter(String),
    /// Decoded pixel data was inconsistent with the declared geometry (e.g. a palette index out of range).
    BadPixelData(String),
    /// The image is Adam7-interlaced and `DecodeOptions::allow_interlace` is false.
    UnsupportedInterlace,
}

/// The specific chunk-reader failure behind `DecodeError::BadChunk`.
#[derive(Debug)]
pub enum ChunkError {
    /// EOF reached mid-chunk (length, type, payload, or CRC were not all present).
    ShortRead,
    /// The declared chunk length exceeded `DecodeOptions::max_chunk_bytes`.
    TooLarge { chunk_type: String, length: u32, max: u32 },
    /// The computed CRC-32 over (type ‖ payload) did not match the stored CRC.
    CrcMismatch { chunk_type: String },
    /// A critical (uppercase first letter) chunk type this decoder does not recognise.
    UnknownCritical { chunk_type: String },
}

impl fmt::Display for ChunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkError::ShortRead => write!(f, "chunk truncated before its declared length"),
            ChunkError::TooLarge { chunk_type, length, max } => write!(
                f,
                "chunk '{}' declares {} bytes, exceeding the {}-byte cap",
                chunk_type, length, max
            ),
            ChunkError::CrcMismatch { chunk_type } => {
                write!(f, "CRC mismatch in chunk '{}'", chunk_type)
            }
            ChunkError::UnknownCritical { chunk_type } => {
                write!(f, "unknown critical chunk '{}'", chunk_type)
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io(e) => write!(f, "I/O error: {}", e),
            DecodeError::BadSignature => write!(f, "not a PNG file: bad signature"),
            DecodeError::BadChunk(e) => write!(f, "bad chunk: {}", e),
            DecodeError::BadHeader(msg) => write!(f, "bad IHDR: {}", msg),
            DecodeError::OrderingViolation(msg) => write!(f, "chunk ordering violation: {}", msg),
            DecodeError::BadPalette(msg) => write!(f, "bad PLTE: {}", msg),
            DecodeError::BadTransparency(msg) => write!(f, "bad tRNS: {}", msg),
            DecodeError::Decompress(msg) => write!(f, "decompression failed: {}", msg),
            DecodeError::BadFilter(msg) => write!(f, "bad scanline filter: {}", msg),
            DecodeError::BadPixelData(msg) => write!(f, "bad pixel data: {}", msg),
            DecodeError::UnsupportedInterlace => {
                write!(f, "Adam7 interlacing encountered with allow_interlace = false")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::Io(e)
    }
}

impl From<ChunkError> for DecodeError {
    fn from(e: ChunkError) -> Self {
        DecodeError::BadChunk(e)
    }
}

/// Convenience alias used throughout the crate.
pub type DecodeResult<T> = Result<T, DecodeError>;
