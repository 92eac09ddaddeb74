//! Sequential big-endian primitive reader.
//!
//! Every structural read in the format goes through [`ObmlReader`]: fixed
//! width integers, 16-bit length-prefixed blobs and strings, ARGB colors and
//! coordinate pairs. The reader knows nothing about chunks; it only moves
//! forward and reports its offset for framing checks.

use std::fmt::Debug;
use std::io::{self, Read};

use byteorder::{BigEndian, ByteOrder};
use tracing::trace;

use crate::error::{ObmlError, Result};
use crate::model::{Color, CoordCursor, Coords};

/// Forward-only cursor over an OBML byte stream.
pub struct ObmlReader<R> {
    inner: R,
    pos: u64,
    trace: bool,
}

impl<R: Read> ObmlReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pos: 0,
            trace: false,
        }
    }

    /// Echo every primitive read to the `obml::read` trace target.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub const fn traces(&self) -> bool {
        self.trace
    }

    /// Current offset from the start of the stream.
    pub const fn tell(&self) -> u64 {
        self.pos
    }

    fn record<T: Debug>(&self, kind: &str, value: T) -> T {
        if self.trace {
            trace!(target: "obml::read", offset = self.pos, "{kind} {value:?}");
        }
        value
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ObmlError::Truncated {
                offset: self.pos,
                wanted: buf.len(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read exactly `len` raw bytes.
    pub fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(self.record("raw", buf))
    }

    /// Read and discard `len` bytes of unknown meaning.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read(len).map(drop)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.fixed::<1>()?;
        Ok(self.record("byte", byte))
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        let buf = self.fixed::<2>()?;
        Ok(self.record("short", BigEndian::read_u16(&buf)))
    }

    pub fn read_u24_be(&mut self) -> Result<u32> {
        let buf = self.fixed::<3>()?;
        Ok(self.record("medium", BigEndian::read_u24(&buf)))
    }

    /// Read a u16 length followed by that many bytes.
    pub fn read_blob(&mut self) -> Result<Vec<u8>> {
        let len = self.read_u16_be()?;
        self.read(usize::from(len))
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.pos;
        let blob = self.read_blob()?;
        let text = String::from_utf8(blob)
            .map_err(|source| ObmlError::InvalidEncoding { offset, source })?;
        Ok(self.record("str", text))
    }

    /// Read a URL, replacing a leading NUL with `base`.
    pub fn read_url(&mut self, base: &str) -> Result<String> {
        let url = self.read_string()?;
        let url = match url.strip_prefix('\0') {
            Some(rest) => format!("{base}{rest}"),
            None => url,
        };
        Ok(self.record("url", url))
    }

    /// Read four bytes in alpha, red, green, blue order.
    pub fn read_color(&mut self) -> Result<Color> {
        let [a, r, g, b] = self.fixed::<4>()?;
        Ok(self.record("color", Color::new(a, r, g, b)))
    }

    /// Read a u16 x and u24 y.
    ///
    /// With a cursor the pair is a delta: it is added to the cursor and the
    /// resulting absolute position is returned. Without one the raw values
    /// are returned and no cursor is touched.
    pub fn read_coords(&mut self, cursor: Option<&mut CoordCursor>) -> Result<Coords> {
        let x = self.read_u16_be()?;
        let y = self.read_u24_be()?;
        let raw = Coords::new(x, y);
        let coords = match cursor {
            Some(cursor) => cursor.advance(raw),
            None => raw,
        };
        Ok(self.record("coords", coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &[u8]) -> ObmlReader<Cursor<&[u8]>> {
        ObmlReader::new(Cursor::new(data))
    }

    #[test]
    fn test_fixed_width_integers() {
        let mut r = reader(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16_be().unwrap(), 0x0203);
        assert_eq!(r.read_u24_be().unwrap(), 0x04_0506);
        assert_eq!(r.tell(), 6);
    }

    #[test]
    fn test_truncated_reports_offset() {
        let mut r = reader(&[0x00, 0x05, b'a', b'b']);
        let err = r.read_blob().unwrap_err();
        assert!(matches!(err, ObmlError::Truncated { offset: 2, wanted: 5 }));
    }
}
