//! A from-scratch PNG decoder: chunked container parsing with CRC-32
//! verification, zlib/DEFLATE decompression, the five scanline filters,
//! Adam7 de-interlacing, and normalisation of every legal colour type and
//! bit depth down to 8-bit-per-channel RGBA.
//!
//! ```no_run
//! let image = pngdecode::decode_file("image.png").unwrap();
//! println!("{}x{}, {} bytes", image.width, image.height, image.pixels.len());
//! ```

mod chunk;
mod config;
mod crc;
mod decoder;
mod decompress;
mod error;
mod filter;
mod header;
mod interlace;
mod normalize;
mod palette;
mod transparency;

pub use config::{ByteOrder, DecodeOptions};
pub use decoder::{
    decode_bytes, decode_bytes_with_options, decode_file, decode_file_with_options, decode_reader,
    decode_reader_with_options, RgbaImage,
};
pub use error::{ChunkError, DecodeError, DecodeResult};
pub use header::{ColorType, Interlace};
