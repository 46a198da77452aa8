//! Ties the container, decompression, defiltering, interlace and
//! normalisation stages together into the four public entry points.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace, warn};

use crate::chunk::{ChunkReader, IDAT, IEND, IHDR, PLTE, TRNS};
use crate::config::{ByteOrder, DecodeOptions};
use crate::decompress;
use crate::error::{ChunkError, DecodeError, DecodeResult};
use crate::filter;
use crate::header::{self, Header, Interlace};
use crate::interlace;
use crate::normalize;
use crate::palette::Palette;
use crate::transparency::{self, Transparency};

pub const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// A fully decoded PNG raster: tightly packed RGBA (or BGRA, per
/// `DecodeOptions::byte_order`) bytes, four per pixel, in row-major order.
#[derive(Debug, Clone)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

struct Ancillary {
    header: Option<Header>,
    palette: Option<Palette>,
    transparency: Option<Transparency>,
    idat: Vec<u8>,
    seen_idat: bool,
    /// Set once a non-IDAT, non-IEND chunk is seen after the IDAT run has
    /// started; a further IDAT chunk at that point means the run was split,
    /// which §3's "all IDAT chunks form a single contiguous run" forbids.
    idat_run_broken: bool,
    seen_iend: bool,
}

impl Ancillary {
    fn new() -> Self {
        Self {
            header: None,
            palette: None,
            transparency: None,
            idat: Vec::new(),
            seen_idat: false,
            idat_run_broken: false,
            seen_iend: false,
        }
    }
}

/// Decodes a PNG from an in-memory byte slice, using default options.
pub fn decode_bytes(bytes: &[u8]) -> DecodeResult<RgbaImage> {
    decode_bytes_with_options(bytes, &DecodeOptions::default())
}

/// Decodes a PNG from an in-memory byte slice, with caller-supplied options.
pub fn decode_bytes_with_options(bytes: &[u8], options: &DecodeOptions) -> DecodeResult<RgbaImage> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(DecodeError::BadSignature);
    }
    let body = &bytes[SIGNATURE.len()..];

    let mut state = Ancillary::new();
    let mut reader = ChunkReader::new(body, options.max_chunk_bytes);

    while let Some(chunk) = reader.next() {
        let chunk = chunk?;
        trace!("read chunk '{}', {} bytes", chunk.type_name(), chunk.data.len());
        if state.seen_iend {
            return Err(DecodeError::OrderingViolation("chunk found after IEND".to_string()));
        }

        match chunk.chunk_type {
            t if t == IHDR => {
                if state.header.is_some() {
                    return Err(DecodeError::OrderingViolation("duplicate IHDR".to_string()));
                }
                let parsed = header::parse(chunk.data)?;
                debug!(
                    "IHDR: {}x{} depth={} color_type={:?} interlace={:?}",
                    parsed.width, parsed.height, parsed.bit_depth, parsed.color_type, parsed.interlace
                );
                state.header = Some(parsed);
            }
            t if t == PLTE => {
                let header = state.header.as_ref().ok_or_else(|| {
                    DecodeError::OrderingViolation("PLTE before IHDR".to_string())
                })?;
                if state.palette.is_some() {
                    return Err(DecodeError::OrderingViolation("duplicate PLTE".to_string()));
                }
                if state.seen_idat {
                    return Err(DecodeError::OrderingViolation("PLTE after IDAT".to_string()));
                }
                if !header.color_type.allows_palette() {
                    return Err(DecodeError::OrderingViolation(format!(
                        "PLTE is not permitted alongside colour type {:?}",
                        header.color_type
                    )));
                }
                state.palette = Some(Palette::from_chunk(chunk.data)?);
            }
            t if t == TRNS => {
                let header = state.header.as_ref().ok_or_else(|| {
                    DecodeError::OrderingViolation("tRNS before IHDR".to_string())
                })?;
                if state.transparency.is_some() {
                    return Err(DecodeError::OrderingViolation("duplicate tRNS".to_string()));
                }
                if state.seen_idat {
                    return Err(DecodeError::OrderingViolation("tRNS after IDAT".to_string()));
                }
                let palette_len = state.palette.as_ref().map(Palette::len);
                state.transparency = Some(transparency::parse(chunk.data, header, palette_len)?);
            }
            t if t == IDAT => {
                if state.header.is_none() {
                    return Err(DecodeError::OrderingViolation("IDAT before IHDR".to_string()));
                }
                if state.idat_run_broken {
                    return Err(DecodeError::OrderingViolation(
                        "IDAT chunks are not contiguous".to_string(),
                    ));
                }
                state.seen_idat = true;
                state.idat.extend_from_slice(chunk.data);
            }
            t if t == IEND => {
                if !chunk.data.is_empty() {
                    return Err(DecodeError::OrderingViolation(
                        "IEND must have zero-length payload".to_string(),
                    ));
                }
                state.seen_iend = true;
            }
            other => {
                if chunk.is_critical() {
                    return Err(DecodeError::BadChunk(ChunkError::UnknownCritical {
                        chunk_type: String::from_utf8_lossy(&other).into_owned(),
                    }));
                }
                if state.seen_idat {
                    state.idat_run_broken = true;
                }
                warn!("skipping unrecognised ancillary chunk '{}'", chunk.type_name());
            }
        }
    }

    if !state.seen_iend {
        return Err(DecodeError::OrderingViolation("stream ended before IEND".to_string()));
    }
    let header = state.header.ok_or_else(|| DecodeError::OrderingViolation("missing IHDR".to_string()))?;
    if header.color_type == crate::header::ColorType::Palette && state.palette.is_none() {
        return Err(DecodeError::OrderingViolation("PALETTE colour type with no PLTE chunk".to_string()));
    }
    if !state.seen_idat {
        return Err(DecodeError::OrderingViolation("no IDAT chunks present".to_string()));
    }

    build_image(&header, state.palette.as_ref(), state.transparency.as_ref(), &state.idat, options)
}

fn build_image(
    header: &Header,
    palette: Option<&Palette>,
    transparency: Option<&Transparency>,
    idat: &[u8],
    options: &DecodeOptions,
) -> DecodeResult<RgbaImage> {
    if header.interlace == Interlace::Adam7 && !options.allow_interlace {
        return Err(DecodeError::UnsupportedInterlace);
    }

    let inflated = decompress::inflate(idat)?;
    let channels = header.color_type.channels();
    let bpp = filter::bytes_per_pixel(channels, header.bit_depth);

    let out = match header.interlace {
        Interlace::None => {
            let stride = filter::scanline_stride(header.width, channels, header.bit_depth);
            let rows = filter::defilter(&inflated, header.height, stride, bpp)?;
            normalize::normalize(&rows, header.width, header, palette, transparency)?
        }
        Interlace::Adam7 => {
            let mut out = vec![[0u8, 0, 0, 0]; (header.width as u64 * header.height as u64) as usize];
            let mut offset = 0usize;
            for pass in 0..7 {
                let (pass_width, pass_height) = interlace::pass_dimensions(pass, header.width, header.height);
                if pass_width == 0 || pass_height == 0 {
                    continue;
                }
                let stride = filter::scanline_stride(pass_width, channels, header.bit_depth);
                let byte_len = (stride + 1) * pass_height as usize;
                let end = offset.checked_add(byte_len).ok_or_else(|| {
                    DecodeError::BadFilter("Adam7 pass length overflow".to_string())
                })?;
                if end > inflated.len() {
                    return Err(DecodeError::BadFilter(format!(
                        "Adam7 pass {} needs {} bytes but only {} remain",
                        pass,
                        byte_len,
                        inflated.len() - offset
                    )));
                }
                let rows = filter::defilter(&inflated[offset..end], pass_height, stride, bpp)?;
                offset = end;
                let pixels = normalize::normalize(&rows, pass_width, header, palette, transparency)?;
                interlace::scatter(pass, header.width, &pixels, pass_width, pass_height, &mut out);
            }
            if offset != inflated.len() {
                return Err(DecodeError::BadFilter(format!(
                    "Adam7 passes consumed {} bytes but {} were inflated",
                    offset,
                    inflated.len()
                )));
            }
            out
        }
    };

    let pixels = flatten(&out, options.byte_order);
    debug!("decoded {}x{} image", header.width, header.height);
    Ok(RgbaImage { width: header.width, height: header.height, pixels })
}

fn flatten(pixels: &[[u8; 4]], byte_order: ByteOrder) -> Vec<u8> {
    let mut flat = Vec::with_capacity(pixels.len() * 4);
    for &[r, g, b, a] in pixels {
        match byte_order {
            ByteOrder::Rgba => flat.extend_from_slice(&[r, g, b, a]),
            ByteOrder::Bgra => flat.extend_from_slice(&[b, g, r, a]),
        }
    }
    flat
}

/// Decodes a PNG read fully from `reader`, using default options.
pub fn decode_reader<R: Read>(reader: R) -> DecodeResult<RgbaImage> {
    decode_reader_with_options(reader, &DecodeOptions::default())
}

/// Decodes a PNG read fully from `reader`, with caller-supplied options.
pub fn decode_reader_with_options<R: Read>(mut reader: R, options: &DecodeOptions) -> DecodeResult<RgbaImage> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_bytes_with_options(&bytes, options)
}

/// Decodes a PNG at `path` on disk, using default options.
pub fn decode_file<P: AsRef<Path>>(path: P) -> DecodeResult<RgbaImage> {
    decode_file_with_options(path, &DecodeOptions::default())
}

/// Decodes a PNG at `path` on disk, with caller-supplied options.
pub fn decode_file_with_options<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> DecodeResult<RgbaImage> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let image = decode_bytes_with_options(&bytes, options);
    if let Err(ref e) = image {
        warn!("decode failed: {}", e);
    }
    image
}
