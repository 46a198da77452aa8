//! Normalisation: turns a reconstructed scanline (still in its native
//! colour type and bit depth) into one RGBA byte quadruple per pixel.
//!
//! Bit-depths below 8 pack more than one sample per byte, and this packing
//! is agnostic of channel boundaries — a GRAY_ALPHA row at bit depth 4
//! would pack gray and alpha samples back to back in the same bitstream.
//! GRAY and PALETTE are the only colour types that can have a sub-byte bit
//! depth, and both read through the same `extract_sample` below rather
//! than each hand-rolling their own shift-and-mask.

use crate::error::DecodeError;
use crate::header::{ColorType, Header};
use crate::palette::Palette;
use crate::transparency::Transparency;

const OPAQUE: u8 = 255;
const TRANSPARENT: u8 = 0;

/// Reads the `sample_index`-th fixed-width sample out of a scanline packed
/// at `bit_depth` bits per sample, MSB-first within each byte.
fn extract_sample(row: &[u8], sample_index: usize, bit_depth: u8) -> Result<u16, DecodeError> {
    match bit_depth {
        1 | 2 | 4 => {
            let samples_per_byte = 8 / bit_depth as usize;
            let byte_index = sample_index / samples_per_byte;
            let byte = *row.get(byte_index).ok_or_else(|| {
                DecodeError::BadPixelData("scanline too short for its declared width".to_string())
            })?;
            let within = sample_index % samples_per_byte;
            let shift = 8 - bit_depth as usize - within * bit_depth as usize;
            let mask = ((1u16 << bit_depth) - 1) as u8;
            Ok(((byte >> shift) & mask) as u16)
        }
        8 => {
            let byte = *row.get(sample_index).ok_or_else(|| {
                DecodeError::BadPixelData("scanline too short for its declared width".to_string())
            })?;
            Ok(byte as u16)
        }
        16 => {
            let byte_index = sample_index * 2;
            let hi = *row.get(byte_index).ok_or_else(|| {
                DecodeError::BadPixelData("scanline too short for its declared width".to_string())
            })?;
            let lo = *row.get(byte_index + 1).ok_or_else(|| {
                DecodeError::BadPixelData("scanline too short for its declared width".to_string())
            })?;
            Ok(u16::from_be_bytes([hi, lo]))
        }
        other => Err(DecodeError::BadPixelData(format!("unsupported bit depth {}", other))),
    }
}

/// Scales a sample of `bit_depth` bits up to the full 0..=255 range by bit
/// replication (the standard `value * 255 / max` scaling, not a left shift,
/// so that the maximum sample value always maps to 255).
fn scale_to_8(value: u16, bit_depth: u8) -> u8 {
    match bit_depth {
        8 => value as u8,
        16 => (value >> 8) as u8,
        _ => {
            let max = (1u16 << bit_depth) - 1;
            ((value as u32 * 255) / max as u32) as u8
        }
    }
}

/// Converts one reconstructed (defiltered) scanline into `width` RGBA
/// pixels.
pub fn row_to_pixels(
    row: &[u8],
    width: u32,
    header: &Header,
    palette: Option<&Palette>,
    transparency: Option<&Transparency>,
) -> Result<Vec<[u8; 4]>, DecodeError> {
    let channels = header.color_type.channels() as usize;
    let bit_depth = header.bit_depth;
    let mut pixels = Vec::with_capacity(width as usize);

    for px in 0..width as usize {
        let base = px * channels;
        let pixel = match header.color_type {
            ColorType::Gray => {
                let raw = extract_sample(row, base, bit_depth)?;
                let v = scale_to_8(raw, bit_depth);
                let alpha = match transparency {
                    Some(Transparency::GrayKey(key)) if *key == raw => TRANSPARENT,
                    _ => OPAQUE,
                };
                [v, v, v, alpha]
            }
            ColorType::Rgb => {
                let r = extract_sample(row, base, bit_depth)?;
                let g = extract_sample(row, base + 1, bit_depth)?;
                let b = extract_sample(row, base + 2, bit_depth)?;
                let alpha = match transparency {
                    Some(Transparency::RgbKey(kr, kg, kb)) if *kr == r && *kg == g && *kb == b => TRANSPARENT,
                    _ => OPAQUE,
                };
                [scale_to_8(r, bit_depth), scale_to_8(g, bit_depth), scale_to_8(b, bit_depth), alpha]
            }
            ColorType::Palette => {
                let index = extract_sample(row, base, bit_depth)? as usize;
                let palette = palette.ok_or_else(|| {
                    DecodeError::BadPixelData("palette colour type with no PLTE chunk".to_string())
                })?;
                let rgb = palette.get(index).ok_or_else(|| {
                    DecodeError::BadPixelData(format!("palette index {} out of range", index))
                })?;
                let alpha = match transparency {
                    Some(Transparency::Palette(alphas)) => alphas.get(index).copied().unwrap_or(OPAQUE),
                    _ => OPAQUE,
                };
                [rgb[0], rgb[1], rgb[2], alpha]
            }
            ColorType::GrayAlpha => {
                let v = extract_sample(row, base, bit_depth)?;
                let a = extract_sample(row, base + 1, bit_depth)?;
                let v8 = scale_to_8(v, bit_depth);
                [v8, v8, v8, scale_to_8(a, bit_depth)]
            }
            ColorType::Rgba => {
                let r = extract_sample(row, base, bit_depth)?;
                let g = extract_sample(row, base + 1, bit_depth)?;
                let b = extract_sample(row, base + 2, bit_depth)?;
                let a = extract_sample(row, base + 3, bit_depth)?;
                [scale_to_8(r, bit_depth), scale_to_8(g, bit_depth), scale_to_8(b, bit_depth), scale_to_8(a, bit_depth)]
            }
        };
        pixels.push(pixel);
    }

    Ok(pixels)
}

/// Normalises every reconstructed row of a (non-interlaced, or single
/// Adam7 pass) image into a flat, row-major RGBA pixel buffer.
pub fn normalize(
    rows: &[Vec<u8>],
    width: u32,
    header: &Header,
    palette: Option<&Palette>,
    transparency: Option<&Transparency>,
) -> Result<Vec<[u8; 4]>, DecodeError> {
    let mut pixels = Vec::with_capacity(rows.len() * width as usize);
    for row in rows {
        pixels.extend(row_to_pixels(row, width, header, palette, transparency)?);
    }
    Ok(pixels)
}
