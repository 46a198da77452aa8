/// Destination channel order for the RGBA normaliser.
///
/// `Bgra` is the order required by device-independent bitmaps on the host
/// presentation collaborator; `Rgba` is the canonical order for any
/// non-GDI consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Rgba,
    Bgra,
}

impl Default for ByteOrder {
    fn default() -> Self {
        ByteOrder::Rgba
    }
}

/// Tunables recognised by the decoder.
///
/// # Example
/// ```no_run
/// use pngdecode::{decode_file_with_options, DecodeOptions, ByteOrder};
///
/// let options = DecodeOptions {
///     byte_order: ByteOrder::Bgra,
///     ..DecodeOptions::default()
/// };
/// let image = decode_file_with_options("image.png", &options).unwrap();
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Chunks whose declared length exceeds this many bytes are rejected with `ChunkTooLarge`.
    pub max_chunk_bytes: u32,
    /// Channel order of the returned pixel buffer.
    pub byte_order: ByteOrder,
    /// Whether an Adam7-interlaced image should be reconstructed (`true`) or rejected
    /// with `UnsupportedInterlace` (`false`).
    pub allow_interlace: bool,
}

/// 100 MiB, the recommended per-chunk cap.
pub const DEFAULT_MAX_CHUNK_BYTES: u32 = 100 * 1024 * 1024;

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            byte_order: ByteOrder::default(),
            allow_interlace: true,
        }
    }
}
