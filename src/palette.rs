//! PLTE: the RGB colour table used by `ColorType::Palette`, and legally
//! permitted (but rarely present) alongside `Rgb`/`Rgba` as a suggested
//! palette for quantizing viewers — this decoder only makes use of it
//! when the colour type requires it.

use crate::error::DecodeError;

const ENTRY_SIZE: usize = 3;
const MAX_ENTRIES: usize = 256;

/// An ordered list of up to 256 RGB colours.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<[u8; 3]>,
}

impl Palette {
    /// Parses a PLTE payload: a sequence of 3-byte RGB entries.
    pub fn from_chunk(data: &[u8]) -> Result<Self, DecodeError> {
        if data.is_empty() || data.len() % ENTRY_SIZE != 0 {
            return Err(DecodeError::BadPalette(format!(
                "PLTE length {} is not a positive multiple of 3",
                data.len()
            )));
        }
        let count = data.len() / ENTRY_SIZE;
        if count > MAX_ENTRIES {
            return Err(DecodeError::BadPalette(format!(
                "PLTE has {} entries, more than the {} a palette index can address",
                count, MAX_ENTRIES
            )));
        }
        let entries = data.chunks_exact(ENTRY_SIZE).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up entry `index`, returning `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<[u8; 3]> {
        self.entries.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_palette() {
        let data = [1, 2, 3, 4, 5, 6];
        let palette = Palette::from_chunk(&data).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0), Some([1, 2, 3]));
        assert_eq!(palette.get(1), Some([4, 5, 6]));
        assert_eq!(palette.get(2), None);
    }

    #[test]
    fn rejects_empty_palette() {
        assert!(Palette::from_chunk(&[]).is_err());
    }

    #[test]
    fn rejects_length_not_multiple_of_three() {
        assert!(Palette::from_chunk(&[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn rejects_too_many_entries() {
        let data = vec![0u8; 257 * 3];
        assert!(Palette::from_chunk(&data).is_err());
    }

    #[test]
    fn accepts_maximum_sized_palette() {
        let data = vec![7u8; 256 * 3];
        let palette = Palette::from_chunk(&data).unwrap();
        assert_eq!(palette.len(), 256);
    }
}
