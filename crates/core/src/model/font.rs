//! Packed font codes carried by text runs.

use crate::error::{ObmlError, Result};

/// Pixel sizes indexed by `code >> 1`.
const FONT_SIZES: [u8; 4] = [11, 13, 15, 18];

/// A text run's font: bit 0 is the bold flag, the remaining bits select a size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FontCode(pub u8);

impl FontCode {
    pub const fn is_bold(self) -> bool {
        self.0 & 1 != 0
    }

    /// The size selector with the bold bit cleared.
    pub const fn size_code(self) -> u8 {
        self.0 & !1
    }

    /// Pixel size for this code.
    ///
    /// Unknown size codes are a lookup failure for the consumer; the decoder
    /// itself never rejects a font byte.
    pub fn pixel_size(self) -> Result<u8> {
        FONT_SIZES
            .get(usize::from(self.size_code() >> 1))
            .copied()
            .ok_or(ObmlError::UnknownFontSize(self.size_code()))
    }
}
