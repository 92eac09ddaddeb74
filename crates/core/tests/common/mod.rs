//! Builders for synthetic saved pages.
//!
//! Every section length and the outer size prefix are computed from the
//! bytes actually emitted, so a page built with the default deltas frames
//! exactly. The `*_delta` fields skew one declared length for framing tests.

#![allow(dead_code)]

use byteorder::{BigEndian, WriteBytesExt};

pub type Pair = (u16, u32);

pub const BASE_URL: &str = "http://example.com/";

/// Append-only byte buffer with the format's primitive encodings.
#[derive(Debug, Clone, Default)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn u16(mut self, v: u16) -> Self {
        self.0.write_u16::<BigEndian>(v).unwrap();
        self
    }

    pub fn u24(mut self, v: u32) -> Self {
        self.0.write_u24::<BigEndian>(v).unwrap();
        self
    }

    pub fn raw(mut self, v: &[u8]) -> Self {
        self.0.extend_from_slice(v);
        self
    }

    pub fn zeros(self, len: usize) -> Self {
        self.raw(&vec![0; len])
    }

    pub fn blob(self, v: &[u8]) -> Self {
        self.u16(u16::try_from(v.len()).unwrap()).raw(v)
    }

    pub fn string(self, s: &str) -> Self {
        self.blob(s.as_bytes())
    }

    pub fn coords(self, (x, y): Pair) -> Self {
        self.u16(x).u24(y)
    }

    pub fn color(self, [a, r, g, b]: [u8; 4]) -> Self {
        self.u8(a).u8(r).u8(g).u8(b)
    }

    pub fn regions(self, regions: &[(Pair, Pair)]) -> Self {
        let count = u8::try_from(regions.len()).unwrap();
        regions
            .iter()
            .fold(self.u8(count), |b, &(pos, size)| b.coords(pos).coords(size))
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

fn adjust(len: usize, delta: i64) -> u32 {
    u32::try_from(len as i64 + delta).unwrap()
}

/// A complete page for one format revision.
#[derive(Debug, Clone)]
pub struct PageBuilder {
    pub version: u8,
    pub title: String,
    pub url_base: String,
    pub url: String,
    pub dimensions: Pair,
    pub metadata: Vec<u8>,
    pub links: Vec<u8>,
    pub content: Vec<u8>,
    pub files: Vec<Vec<u8>>,
    pub link_len_delta: i64,
    pub files_len_delta: i64,
    pub size_delta: i64,
}

impl PageBuilder {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            title: "Test page".to_string(),
            url_base: BASE_URL.to_string(),
            url: "\0index.html".to_string(),
            dimensions: (240, 1000),
            metadata: Vec::new(),
            links: Vec::new(),
            content: Vec::new(),
            files: Vec::new(),
            link_len_delta: 0,
            files_len_delta: 0,
            size_delta: 0,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn metadata(mut self, chunk: Vec<u8>) -> Self {
        self.metadata.extend(chunk);
        self
    }

    pub fn link(mut self, chunk: Vec<u8>) -> Self {
        self.links.extend(chunk);
        self
    }

    pub fn content(mut self, chunk: Vec<u8>) -> Self {
        self.content.extend(chunk);
        self
    }

    pub fn file(mut self, data: &[u8]) -> Self {
        self.files.push(data.to_vec());
        self
    }

    /// Bytes from the version byte (inclusive) to the end of the page.
    fn body(&self) -> Vec<u8> {
        let magic: &[u8] = if self.version == 16 {
            &[0, 0]
        } else {
            &[0, 0, 0, 2, 0]
        };
        let trailer = match self.version {
            6 => 1,
            12 | 13 => 5,
            _ => 6,
        };
        let files = self
            .files
            .iter()
            .fold(Bytes::new(), |b, f| b.blob(f))
            .build();

        Bytes::new()
            .u8(self.version)
            .coords(self.dimensions)
            .raw(magic)
            .string(&self.title)
            .blob(b"")
            .string(&self.url_base)
            .string(&self.url)
            .zeros(trailer)
            .raw(&self.metadata)
            .u8(b'S')
            .u24(adjust(self.links.len(), self.link_len_delta))
            .raw(&self.links)
            .raw(&self.content)
            .u8(b'S')
            .u24(adjust(files.len(), self.files_len_delta))
            .raw(&files)
            .build()
    }

    pub fn build(&self) -> Vec<u8> {
        let body = self.body();
        // Both framings count the bytes after the final size prefix.
        let size = adjust(body.len(), self.size_delta);
        let prefix = if self.version == 16 {
            Bytes::new().u24(0x02_d355).u8(16).u24(size)
        } else {
            Bytes::new().u24(size)
        };
        prefix.raw(&body).build()
    }
}

// === Metadata chunks ===

pub fn config() -> Vec<u8> {
    Bytes::new().u8(b'C').zeros(23).build()
}

pub fn meta(data: &[u8]) -> Vec<u8> {
    Bytes::new().u8(b'M').zeros(2).blob(data).build()
}

// === Link chunks ===

/// A region link; `url_first` selects the v13+ field order.
pub fn link(
    tag: u8,
    regions: &[(Pair, Pair)],
    url: &str,
    link_type: &str,
    url_first: bool,
) -> Vec<u8> {
    let b = Bytes::new().u8(tag).regions(regions);
    if url_first {
        b.string(url).zeros(2).string(link_type).build()
    } else {
        b.string(link_type).string(url).build()
    }
}

pub fn option_list(options: &[(&str, &str)]) -> Vec<u8> {
    options
        .iter()
        .fold(
            Bytes::new().u8(0x00).u8(0).u8(u8::try_from(options.len()).unwrap()),
            |b, (value, label)| b.string(value).string(label),
        )
        .build()
}

pub fn annotated_skip(tag: u8, regions: &[(Pair, Pair)]) -> Vec<u8> {
    Bytes::new()
        .u8(tag)
        .regions(regions)
        .string("note")
        .zeros(2)
        .string("more")
        .build()
}

pub fn pair_skip(tag: u8, regions: &[(Pair, Pair)]) -> Vec<u8> {
    Bytes::new()
        .u8(tag)
        .regions(regions)
        .string("first")
        .string("second")
        .build()
}

pub fn scroll_anchor(regions: &[(Pair, Pair)], target: Pair, name: &str) -> Vec<u8> {
    let record = Bytes::new().coords(target).string(name).build();
    Bytes::new()
        .u8(b'N')
        .regions(regions)
        .string("anchor")
        .blob(&record)
        .build()
}

// === Content chunks ===

pub fn rect(pos: Pair, size: Pair, color: [u8; 4]) -> Vec<u8> {
    Bytes::new()
        .u8(b'B')
        .coords(pos)
        .coords(size)
        .color(color)
        .build()
}

/// Text with an explicit font code (before v16).
pub fn text(pos: Pair, size: Pair, color: [u8; 4], font: u8, text: &str) -> Vec<u8> {
    Bytes::new()
        .u8(b'T')
        .coords(pos)
        .coords(size)
        .color(color)
        .u8(font)
        .string(text)
        .build()
}

/// v16 text: bold flag plus auxiliary records.
pub fn text_v16(
    pos: Pair,
    size: Pair,
    color: [u8; 4],
    bold: bool,
    aux: &[(u8, &[u8])],
    text: &str,
) -> Vec<u8> {
    Bytes::new()
        .u8(b'T')
        .coords(pos)
        .coords(size)
        .color(color)
        .u8(0)
        .u8(u8::from(bold))
        .raw(&auxiliary(aux))
        .string(text)
        .build()
}

/// Image placeholder before v15.
pub fn image(pos: Pair, size: Pair, color: [u8; 4], address: u32) -> Vec<u8> {
    Bytes::new()
        .u8(b'I')
        .coords(pos)
        .coords(size)
        .color(color)
        .zeros(3)
        .u24(address)
        .build()
}

pub fn image_v16(
    pos: Pair,
    size: Pair,
    color: [u8; 4],
    address: u32,
    aux: &[(u8, &[u8])],
) -> Vec<u8> {
    Bytes::new()
        .u8(b'I')
        .coords(pos)
        .coords(size)
        .color(color)
        .u24(address)
        .raw(&auxiliary(aux))
        .build()
}

/// Form field; `trailer` is 3 before v16 and 5 on v16.
pub fn form(
    pos: Pair,
    size: Pair,
    color: [u8; 4],
    kind: u8,
    id: &str,
    value: &str,
    trailer: usize,
) -> Vec<u8> {
    Bytes::new()
        .u8(b'F')
        .coords(pos)
        .coords(size)
        .color(color)
        .u8(kind)
        .u8(0)
        .string(id)
        .string(value)
        .zeros(trailer)
        .build()
}

pub fn link_offsets() -> Vec<u8> {
    Bytes::new().u8(b'L').u24(1).u24(2).u24(3).build()
}

pub fn padding() -> Vec<u8> {
    Bytes::new().u8(b'z').zeros(6).build()
}

fn auxiliary(records: &[(u8, &[u8])]) -> Vec<u8> {
    records
        .iter()
        .fold(
            Bytes::new().u8(u8::try_from(records.len()).unwrap()),
            |b, (kind, data)| b.u8(*kind).blob(data),
        )
        .build()
}
