//! tRNS: simple transparency. Its shape depends entirely on the colour type
//! it rides alongside, so unlike PLTE there is no single fixed record size.

use crate::error::DecodeError;
use crate::header::{ColorType, Header};

/// A parsed tRNS chunk, still in its colour-type-specific shape.
#[derive(Debug, Clone)]
pub enum Transparency {
    /// One alpha byte per palette entry, in palette order. Entries not
    /// covered are fully opaque (255).
    Palette(Vec<u8>),
    /// The single full-precision (not 8-bit scaled) gray sample that should
    /// be rendered fully transparent.
    GrayKey(u16),
    /// The single full-precision RGB triple that should be rendered fully
    /// transparent.
    RgbKey(u16, u16, u16),
}

/// Parses a tRNS payload against the colour type declared in IHDR.
///
/// GRAY_ALPHA and RGBA already carry a per-pixel alpha channel, so a tRNS
/// chunk alongside either is a container-rule violation, not merely
/// redundant.
pub fn parse(data: &[u8], header: &Header, palette_len: Option<usize>) -> Result<Transparency, DecodeError> {
    match header.color_type {
        ColorType::GrayAlpha | ColorType::Rgba => Err(DecodeError::BadTransparency(format!(
            "tRNS is not permitted alongside colour type {:?}",
            header.color_type
        ))),
        ColorType::Palette => {
            let palette_len = palette_len.ok_or_else(|| {
                DecodeError::BadTransparency("tRNS for a palette image requires PLTE first".to_string())
            })?;
            if data.is_empty() {
                return Err(DecodeError::BadTransparency(
                    "tRNS for a palette image must supply at least one entry".to_string(),
                ));
            }
            if data.len() > palette_len {
                return Err(DecodeError::BadTransparency(format!(
                    "tRNS has {} entries, more than the {} in PLTE",
                    data.len(),
                    palette_len
                )));
            }
            Ok(Transparency::Palette(data.to_vec()))
        }
        ColorType::Gray => {
            if data.len() != 2 {
                return Err(DecodeError::BadTransparency(format!(
                    "tRNS for a gray image must be 2 bytes, got {}",
                    data.len()
                )));
            }
            Ok(Transparency::GrayKey(u16::from_be_bytes([data[0], data[1]])))
        }
        ColorType::Rgb => {
            if data.len() != 6 {
                return Err(DecodeError::BadTransparency(format!(
                    "tRNS for an RGB image must be 6 bytes, got {}",
                    data.len()
                )));
            }
            Ok(Transparency::RgbKey(
                u16::from_be_bytes([data[0], data[1]]),
                u16::from_be_bytes([data[2], data[3]]),
                u16::from_be_bytes([data[4], data[5]]),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Interlace;

    fn header(color_type: ColorType, bit_depth: u8) -> Header {
        Header { width: 4, height: 4, bit_depth, color_type, interlace: Interlace::None }
    }

    #[test]
    fn rejects_trns_on_rgba() {
        let h = header(ColorType::Rgba, 8);
        assert!(parse(&[0, 0], &h, None).is_err());
    }

    #[test]
    fn rejects_trns_on_gray_alpha() {
        let h = header(ColorType::GrayAlpha, 8);
        assert!(parse(&[0, 0], &h, None).is_err());
    }

    #[test]
    fn parses_gray_key() {
        let h = header(ColorType::Gray, 16);
        let t = parse(&[0x01, 0x02], &h, None).unwrap();
        assert!(matches!(t, Transparency::GrayKey(0x0102)));
    }

    #[test]
    fn parses_rgb_key() {
        let h = header(ColorType::Rgb, 8);
        let t = parse(&[0, 1, 0, 2, 0, 3], &h, None).unwrap();
        assert!(matches!(t, Transparency::RgbKey(1, 2, 3)));
    }

    #[test]
    fn palette_trns_cannot_exceed_palette_length() {
        let h = header(ColorType::Palette, 8);
        assert!(parse(&[255, 0, 128], &h, Some(2)).is_err());
        assert!(parse(&[255, 0], &h, Some(2)).is_ok());
    }

    #[test]
    fn palette_trns_without_plte_is_rejected() {
        let h = header(ColorType::Palette, 8);
        assert!(parse(&[255], &h, None).is_err());
    }

    #[test]
    fn palette_trns_cannot_be_empty() {
        let h = header(ColorType::Palette, 8);
        assert!(parse(&[], &h, Some(4)).is_err());
    }
}
