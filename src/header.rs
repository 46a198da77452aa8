//! IHDR: the fixed 13-byte chunk every PNG starts with.

use crate::error::DecodeError;

/// PNG colour type, as declared in IHDR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Gray,
    Rgb,
    Palette,
    GrayAlpha,
    Rgba,
}

impl ColorType {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ColorType::Gray),
            2 => Some(ColorType::Rgb),
            3 => Some(ColorType::Palette),
            4 => Some(ColorType::GrayAlpha),
            6 => Some(ColorType::Rgba),
            _ => None,
        }
    }

    /// Number of samples per pixel in the source raster (before any RGBA
    /// normalisation), used to compute bytes-per-pixel and scanline stride.
    pub fn channels(self) -> u8 {
        match self {
            ColorType::Gray => 1,
            ColorType::Rgb => 3,
            ColorType::Palette => 1,
            ColorType::GrayAlpha => 2,
            ColorType::Rgba => 4,
        }
    }

    fn allowed_bit_depths(self) -> &'static [u8] {
        match self {
            ColorType::Gray => &[1, 2, 4, 8, 16],
            ColorType::Rgb => &[8, 16],
            ColorType::Palette => &[1, 2, 4, 8],
            ColorType::GrayAlpha => &[8, 16],
            ColorType::Rgba => &[8, 16],
        }
    }

    pub fn allows_palette(self) -> bool {
        !matches!(self, ColorType::Gray | ColorType::GrayAlpha)
    }

    pub fn allows_transparency(self) -> bool {
        !matches!(self, ColorType::GrayAlpha | ColorType::Rgba)
    }
}

/// Whether the raster is stored straight or Adam7-interlaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interlace {
    None,
    Adam7,
}

#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub interlace: Interlace,
}

const IHDR_LEN: usize = 13;

/// Parses and validates an IHDR payload.
pub fn parse(data: &[u8]) -> Result<Header, DecodeError> {
    if data.len() != IHDR_LEN {
        return Err(DecodeError::BadHeader(format!(
            "IHDR payload must be {} bytes, got {}",
            IHDR_LEN,
            data.len()
        )));
    }

    let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let bit_depth = data[8];
    let color_type_raw = data[9];
    let compression_method = data[10];
    let filter_method = data[11];
    let interlace_method = data[12];

    if width == 0 || width & 0x8000_0000 != 0 {
        return Err(DecodeError::BadHeader(format!("illegal width {}", width)));
    }
    if height == 0 || height & 0x8000_0000 != 0 {
        return Err(DecodeError::BadHeader(format!("illegal height {}", height)));
    }

    let color_type = ColorType::from_u8(color_type_raw)
        .ok_or_else(|| DecodeError::BadHeader(format!("unknown colour type {}", color_type_raw)))?;

    if !color_type.allowed_bit_depths().contains(&bit_depth) {
        return Err(DecodeError::BadHeader(format!(
            "bit depth {} is not legal for colour type {:?}",
            bit_depth, color_type
        )));
    }

    if compression_method != 0 {
        return Err(DecodeError::BadHeader(format!(
            "unsupported compression method {}",
            compression_method
        )));
    }
    if filter_method != 0 {
        return Err(DecodeError::BadHeader(format!("unsupported filter method {}", filter_method)));
    }

    let interlace = match interlace_method {
        0 => Interlace::None,
        1 => Interlace::Adam7,
        other => {
            return Err(DecodeError::BadHeader(format!("unsupported interlace method {}", other)))
        }
    };

    Ok(Header { width, height, bit_depth, color_type, interlace })
}
