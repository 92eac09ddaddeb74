//! ARGB colors as stored in content chunks.

/// A color stored as four bytes in alpha, red, green, blue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Both alpha 0 and alpha 255 mean fully opaque.
    pub const fn is_opaque(&self) -> bool {
        self.a == 0 || self.a == 0xff
    }

    /// CSS color value, `#rrggbb` when opaque and `rgba()` otherwise.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                f64::from(self.a) / 255.0
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_alpha_is_opaque() {
        assert!(Color::new(0, 1, 2, 3).is_opaque());
        assert!(Color::new(255, 1, 2, 3).is_opaque());
        assert!(!Color::new(128, 1, 2, 3).is_opaque());
    }

    #[test]
    fn test_to_css() {
        assert_eq!(Color::new(0, 0xff, 0x80, 0x00).to_css(), "#ff8000");
        assert_eq!(Color::new(255, 0, 0, 0).to_css(), "#000000");
        assert_eq!(
            Color::new(51, 10, 20, 30).to_css(),
            "rgba(10, 20, 30, 0.200)"
        );
    }
}
