//! Per-revision layout descriptors.
//!
//! The five known on-wire revisions differ in field order, field presence,
//! coordinate encoding and which chunk tags each section accepts. All of
//! that is described here as data; the section decoders only look up the
//! descriptor for the detected version and dispatch on its tag tables.
//! Supporting a new revision means adding a variant and one [`Layout`].

use std::fmt;

use crate::error::{ObmlError, Result};

/// A known format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Version {
    V6,
    V12,
    V13,
    V15,
    V16,
}

impl Version {
    /// Map a version byte, rejecting unknown revisions.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            6 => Ok(Self::V6),
            12 => Ok(Self::V12),
            13 => Ok(Self::V13),
            15 => Ok(Self::V15),
            16 => Ok(Self::V16),
            other => Err(ObmlError::UnknownVersion(other)),
        }
    }

    pub const fn byte(self) -> u8 {
        match self {
            Self::V6 => 6,
            Self::V12 => 12,
            Self::V13 => 13,
            Self::V15 => 15,
            Self::V16 => 16,
        }
    }

    pub fn layout(self) -> &'static Layout {
        match self {
            Self::V6 => &V6,
            Self::V12 => &V12,
            Self::V13 => &V13,
            Self::V15 => &V15,
            Self::V16 => &V16,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.byte())
    }
}

/// Outer size value every v16 file starts with before its real size/version pair.
pub const V16_SIZE_SENTINEL: u32 = 0x02_d355;

/// Fixed bytes following the page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magic {
    /// One of several accepted values of the same length.
    OneOf(&'static [&'static [u8]]),
    Exact(&'static [u8]),
}

impl Magic {
    pub fn len(&self) -> usize {
        match self {
            Self::OneOf(values) => values[0].len(),
            Self::Exact(value) => value.len(),
        }
    }

    pub fn accepts(&self, found: &[u8]) -> bool {
        match self {
            Self::OneOf(values) => values.iter().any(|value| *value == found),
            Self::Exact(value) => *value == found,
        }
    }

    pub const fn describe(&self) -> &'static str {
        match self {
            Self::OneOf(_) => "00 00 or ff ff",
            Self::Exact(_) => "00 00 00 02 00",
        }
    }
}

/// Unused bytes closing the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTrailer {
    Bytes(usize),
    /// A u16 followed by a u24.
    ShortMedium,
}

/// Order of the URL and type strings in link chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkFieldOrder {
    /// URL, two unknown bytes, type string.
    UrlFirst,
    /// Type string, then URL.
    TypeFirst,
}

/// Whether content geometry is stored as deltas from a running cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordMode {
    Absolute,
    Relative,
}

/// Origin for embedded file addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAddressing {
    /// Offset from the start of the whole record stream.
    FromStreamStart,
    /// Offset from the start of the embedded file sub-stream.
    FromFilesStart,
}

/// Metadata section chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataChunk {
    /// Fixed 23-byte record of unknown meaning.
    Config,
    /// Two bytes and a blob of unknown meaning.
    Meta,
    /// Declares the link section length and ends the metadata section.
    LinksStart,
}

/// Link section chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChunk {
    OptionList,
    /// Regions plus URL and type; image links drop small regions.
    Links { image: bool },
    /// Regions, blob, two bytes, blob; skipped.
    AnnotatedSkip,
    /// Regions and two blobs; skipped.
    PairSkip,
    /// Regions, blob, and a nested scroll target record.
    ScrollAnchor,
}

/// Layout of content `I` chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    /// Coords, size, color, three unknown bytes, u24 address.
    Legacy,
    /// Coords, size, color, 14 unknown bytes; the address field is unknown.
    Unaddressed,
    /// Coords, size, color, u24 address, 1-2 auxiliary records.
    Addressed,
}

/// Layout of content `T` chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    /// Coords, size, color, font byte, text.
    Coded,
    /// Coords, size, color, one byte, bold bit, 0-1 auxiliary records, text.
    Auxiliary,
}

/// Content section chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChunk {
    Rect,
    FormField,
    Image(ImageLayout),
    /// Three u24 offsets into the link section; skipped.
    LinkOffsets,
    Meta,
    /// Embedded files; always the last chunk of the section.
    Files,
    Text(TextLayout),
    /// Six bytes of padding.
    Padding,
}

/// Everything that varies between revisions.
#[derive(Debug)]
pub struct Layout {
    pub version: Version,
    /// False when the header itself cannot be decoded for this revision.
    pub header_supported: bool,
    pub magic: Magic,
    pub header_trailer: HeaderTrailer,
    /// Bytes between `total_start` and the first byte counted by the size prefix.
    pub size_prefix_len: u64,
    pub link_fields: LinkFieldOrder,
    pub content_coords: CoordMode,
    /// Unknown bytes closing a form field chunk.
    pub form_trailer: usize,
    pub file_addressing: FileAddressing,
    pub metadata_tags: &'static [(u8, MetadataChunk)],
    pub link_tags: &'static [(u8, LinkChunk)],
    pub content_tags: &'static [(u8, ContentChunk)],
}

impl Layout {
    pub fn metadata_chunk(&self, tag: u8) -> Option<MetadataChunk> {
        lookup(self.metadata_tags, tag)
    }

    pub fn link_chunk(&self, tag: u8) -> Option<LinkChunk> {
        lookup(self.link_tags, tag)
    }

    pub fn content_chunk(&self, tag: u8) -> Option<ContentChunk> {
        lookup(self.content_tags, tag)
    }
}

fn lookup<T: Copy>(table: &[(u8, T)], tag: u8) -> Option<T> {
    table
        .iter()
        .find_map(|&(known, chunk)| (known == tag).then_some(chunk))
}

const LEGACY_MAGIC: Magic = Magic::Exact(b"\x00\x00\x00\x02\x00");

const METADATA_LEGACY: &[(u8, MetadataChunk)] = &[
    (b'M', MetadataChunk::Meta),
    (b'S', MetadataChunk::LinksStart),
];

const METADATA_MODERN: &[(u8, MetadataChunk)] = &[
    (b'C', MetadataChunk::Config),
    (b'M', MetadataChunk::Meta),
    (b'S', MetadataChunk::LinksStart),
];

const LINK_V6: &[(u8, LinkChunk)] = &[
    (0x00, LinkChunk::OptionList),
    (b'i', LinkChunk::Links { image: true }),
    (b'L', LinkChunk::Links { image: false }),
    (b'P', LinkChunk::Links { image: false }),
    (b'w', LinkChunk::Links { image: false }),
    (b'W', LinkChunk::Links { image: false }),
    (b'C', LinkChunk::PairSkip),
    (b'I', LinkChunk::PairSkip),
    (b'N', LinkChunk::PairSkip),
    (b'S', LinkChunk::PairSkip),
];

const LINK_V12: &[(u8, LinkChunk)] = &[
    (0x00, LinkChunk::OptionList),
    (b'i', LinkChunk::Links { image: true }),
    (b'L', LinkChunk::Links { image: false }),
    (b'P', LinkChunk::Links { image: false }),
    (b'w', LinkChunk::Links { image: false }),
    (b'W', LinkChunk::Links { image: false }),
    (b'C', LinkChunk::PairSkip),
    (b'I', LinkChunk::PairSkip),
    (b'N', LinkChunk::ScrollAnchor),
    (b'S', LinkChunk::PairSkip),
];

const LINK_V13: &[(u8, LinkChunk)] = &[
    (0x00, LinkChunk::OptionList),
    (b'i', LinkChunk::Links { image: true }),
    (b'L', LinkChunk::Links { image: false }),
    (b'P', LinkChunk::Links { image: false }),
    (b'w', LinkChunk::Links { image: false }),
    (b'W', LinkChunk::Links { image: false }),
    (b'S', LinkChunk::AnnotatedSkip),
];

const LINK_MODERN: &[(u8, LinkChunk)] = &[
    (0x00, LinkChunk::OptionList),
    (b'i', LinkChunk::Links { image: true }),
    (b'L', LinkChunk::Links { image: false }),
    (b'P', LinkChunk::Links { image: false }),
    (b'w', LinkChunk::Links { image: false }),
    (b'W', LinkChunk::Links { image: false }),
    (b'C', LinkChunk::AnnotatedSkip),
    (b'I', LinkChunk::AnnotatedSkip),
    (b'N', LinkChunk::AnnotatedSkip),
    (b'S', LinkChunk::AnnotatedSkip),
];

const CONTENT_LEGACY: &[(u8, ContentChunk)] = &[
    (b'B', ContentChunk::Rect),
    (b'F', ContentChunk::FormField),
    (b'I', ContentChunk::Image(ImageLayout::Legacy)),
    (b'L', ContentChunk::LinkOffsets),
    (b'M', ContentChunk::Meta),
    (b'S', ContentChunk::Files),
    (b'T', ContentChunk::Text(TextLayout::Coded)),
];

const CONTENT_V15: &[(u8, ContentChunk)] = &[
    (b'B', ContentChunk::Rect),
    (b'F', ContentChunk::FormField),
    (b'I', ContentChunk::Image(ImageLayout::Unaddressed)),
    (b'L', ContentChunk::LinkOffsets),
    (b'M', ContentChunk::Meta),
    (b'S', ContentChunk::Files),
    (b'T', ContentChunk::Text(TextLayout::Coded)),
];

const CONTENT_V16: &[(u8, ContentChunk)] = &[
    (b'B', ContentChunk::Rect),
    (b'F', ContentChunk::FormField),
    (b'I', ContentChunk::Image(ImageLayout::Addressed)),
    (b'L', ContentChunk::LinkOffsets),
    (b'M', ContentChunk::Meta),
    (b'S', ContentChunk::Files),
    (b'T', ContentChunk::Text(TextLayout::Auxiliary)),
    (b'z', ContentChunk::Padding),
];

static V6: Layout = Layout {
    version: Version::V6,
    header_supported: true,
    magic: LEGACY_MAGIC,
    header_trailer: HeaderTrailer::Bytes(1),
    size_prefix_len: 3,
    link_fields: LinkFieldOrder::TypeFirst,
    content_coords: CoordMode::Absolute,
    form_trailer: 3,
    file_addressing: FileAddressing::FromStreamStart,
    metadata_tags: METADATA_LEGACY,
    link_tags: LINK_V6,
    content_tags: CONTENT_LEGACY,
};

static V12: Layout = Layout {
    version: Version::V12,
    header_supported: true,
    magic: LEGACY_MAGIC,
    header_trailer: HeaderTrailer::ShortMedium,
    size_prefix_len: 3,
    link_fields: LinkFieldOrder::TypeFirst,
    content_coords: CoordMode::Absolute,
    form_trailer: 3,
    file_addressing: FileAddressing::FromFilesStart,
    metadata_tags: METADATA_LEGACY,
    link_tags: LINK_V12,
    content_tags: CONTENT_LEGACY,
};

static V13: Layout = Layout {
    version: Version::V13,
    header_supported: true,
    magic: LEGACY_MAGIC,
    header_trailer: HeaderTrailer::ShortMedium,
    size_prefix_len: 3,
    link_fields: LinkFieldOrder::UrlFirst,
    content_coords: CoordMode::Absolute,
    form_trailer: 3,
    file_addressing: FileAddressing::FromFilesStart,
    metadata_tags: METADATA_LEGACY,
    link_tags: LINK_V13,
    content_tags: CONTENT_LEGACY,
};

// Files of this revision are rejected at the header; the remaining fields
// record what is known about its later sections.
static V15: Layout = Layout {
    version: Version::V15,
    header_supported: false,
    magic: LEGACY_MAGIC,
    header_trailer: HeaderTrailer::Bytes(6),
    size_prefix_len: 3,
    link_fields: LinkFieldOrder::UrlFirst,
    content_coords: CoordMode::Relative,
    form_trailer: 5,
    file_addressing: FileAddressing::FromFilesStart,
    metadata_tags: METADATA_MODERN,
    link_tags: LINK_MODERN,
    content_tags: CONTENT_V15,
};

static V16: Layout = Layout {
    version: Version::V16,
    header_supported: true,
    magic: Magic::OneOf(&[b"\x00\x00", b"\xff\xff"]),
    header_trailer: HeaderTrailer::Bytes(6),
    size_prefix_len: 7,
    link_fields: LinkFieldOrder::UrlFirst,
    content_coords: CoordMode::Relative,
    form_trailer: 5,
    file_addressing: FileAddressing::FromFilesStart,
    metadata_tags: METADATA_MODERN,
    link_tags: LINK_MODERN,
    content_tags: CONTENT_V16,
};
