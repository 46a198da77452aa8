//! Scanline defiltering: each row of the inflated stream is prefixed with a
//! filter-type octet, and must be reconstructed in row order because Up,
//! Average and Paeth all reference the *already reconstructed* previous row.

use crate::error::DecodeError;

/// The five filter types a PNG scanline may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterType {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}

impl FilterType {
    fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(FilterType::None),
            1 => Ok(FilterType::Sub),
            2 => Ok(FilterType::Up),
            3 => Ok(FilterType::Average),
            4 => Ok(FilterType::Paeth),
            other => Err(DecodeError::BadFilter(format!("unknown filter type {}", other))),
        }
    }
}

/// Bytes per whole pixel, rounding sub-byte depths up to 1 — the distance a
/// Sub/Average/Paeth predictor looks back for its "left" neighbour.
pub fn bytes_per_pixel(channels: u8, bit_depth: u8) -> usize {
    let bits = channels as usize * bit_depth as usize;
    (bits + 7) / 8
}

/// Number of bytes a single (unfiltered) scanline occupies, not counting
/// the leading filter-type octet.
pub fn scanline_stride(width: u32, channels: u8, bit_depth: u8) -> usize {
    let bits_per_pixel = channels as usize * bit_depth as usize;
    let bits = bits_per_pixel * width as usize;
    (bits + 7) / 8
}

fn paeth_predictor(a: i32, b: i32, c: i32) -> u8 {
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();
    if pa <= pb && pa <= pc {
        a as u8
    } else if pb <= pc {
        b as u8
    } else {
        c as u8
    }
}

/// Reverses scanline filtering over `inflated`, returning `height` raw rows
/// of `stride` bytes each.
///
/// `inflated` must be exactly `height * (stride + 1)` bytes: one filter-type
/// octet plus `stride` data bytes per row, with no gaps or padding between
/// rows (this is how the `inflate` output from a non-interlaced, or a
/// single Adam7 pass, image is laid out).
pub fn defilter(inflated: &[u8], height: u32, stride: usize, bpp: usize) -> Result<Vec<Vec<u8>>, DecodeError> {
    let row_len = stride + 1;
    let expected = row_len * height as usize;
    if inflated.len() != expected {
        return Err(DecodeError::BadFilter(format!(
            "expected {} bytes of filtered scanlines, got {}",
            expected,
            inflated.len()
        )));
    }

    let mut rows: Vec<Vec<u8>> = Vec::with_capacity(height as usize);
    let mut previous = vec![0u8; stride];

    for r in 0..height as usize {
        let row_start = r * row_len;
        let filter = FilterType::from_u8(inflated[row_start])?;
        let filtered = &inflated[row_start + 1..row_start + 1 + stride];

        let mut current = vec![0u8; stride];
        for x in 0..stride {
            let raw_left = if x >= bpp { current[x - bpp] as i32 } else { 0 };
            let raw_up = previous[x] as i32;
            let raw_up_left = if x >= bpp { previous[x - bpp] as i32 } else { 0 };

            let value = match filter {
                FilterType::None => filtered[x],
                FilterType::Sub => filtered[x].wrapping_add(raw_left as u8),
                FilterType::Up => filtered[x].wrapping_add(raw_up as u8),
                FilterType::Average => {
                    let avg = ((raw_left + raw_up) / 2) as u8;
                    filtered[x].wrapping_add(avg)
                }
                FilterType::Paeth => {
                    filtered[x].wrapping_add(paeth_predictor(raw_left, raw_up, raw_up_left))
                }
            };
            current[x] = value;
        }

        rows.push(current.clone());
        previous = current;
    }

    Ok(rows)
}
