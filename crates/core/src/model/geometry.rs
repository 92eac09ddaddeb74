//! Coordinates, regions and the running coordinate cursor.

/// Mask for the 24-bit y component.
pub const Y_MASK: u32 = 0x00ff_ffff;

/// A 16-bit x and 24-bit y pair, used for both positions and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Coords {
    pub x: u16,
    pub y: u32,
}

impl Coords {
    pub const fn new(x: u16, y: u32) -> Self {
        Self { x, y: y & Y_MASK }
    }
}

/// One rectangle of a link or skipped annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Region {
    pub position: Coords,
    pub size: Coords,
}

/// Running absolute position for relative (delta-encoded) coordinates.
///
/// Owned by one decode session. x wraps at 2^16, y at 2^24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordCursor {
    last: Coords,
}

impl CoordCursor {
    pub const fn new() -> Self {
        Self {
            last: Coords { x: 0, y: 0 },
        }
    }

    /// Add `delta` to the cursor and return the new absolute position.
    pub fn advance(&mut self, delta: Coords) -> Coords {
        self.last = Coords {
            x: self.last.x.wrapping_add(delta.x),
            y: self.last.y.wrapping_add(delta.y) & Y_MASK,
        };
        self.last
    }

    pub const fn position(&self) -> Coords {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_accumulates() {
        let mut cursor = CoordCursor::new();
        assert_eq!(cursor.advance(Coords::new(10, 20)), Coords::new(10, 20));
        assert_eq!(cursor.advance(Coords::new(5, 5)), Coords::new(15, 25));
    }

    #[test]
    fn test_cursor_wraps() {
        let mut cursor = CoordCursor::new();
        cursor.advance(Coords::new(0xfff0, 0xff_fff0));
        assert_eq!(cursor.advance(Coords::new(0x20, 0x20)), Coords::new(0x10, 0x10));
    }
}
