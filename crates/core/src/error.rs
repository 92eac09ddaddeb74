//! Error types for the OBML decoder.

use std::fmt;

use thiserror::Error;

use crate::version::Version;

/// The byte range a chunk tag or framing check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Metadata,
    Links,
    Content,
    Files,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Metadata => "metadata",
            Self::Links => "link",
            Self::Content => "content",
            Self::Files => "embedded file",
        })
    }
}

/// Primary error type for OBML decoding.
///
/// Every variant except [`ObmlError::UnknownFontSize`] is fatal to the decode
/// session that raised it.
#[derive(Error, Debug)]
pub enum ObmlError {
    #[error("truncated input at offset {offset}: wanted {wanted} more bytes")]
    Truncated { offset: u64, wanted: usize },

    #[error("invalid UTF-8 in string at offset {offset}")]
    InvalidEncoding {
        offset: u64,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("unknown format version {0}")]
    UnknownVersion(u8),

    #[error("bad magic at offset {offset}: expected {expected}, got {found:02x?}")]
    BadMagic {
        offset: u64,
        expected: &'static str,
        found: Vec<u8>,
    },

    #[error("unknown chunk tag {tag:#04x} in {section} section (version {version}) at offset {offset}")]
    UnknownChunkTag {
        section: Section,
        tag: u8,
        version: Version,
        offset: u64,
    },

    #[error("{section} section ended at offset {found}, expected {expected}")]
    FramingMismatch {
        section: Section,
        expected: u64,
        found: u64,
    },

    #[error("unsupported variant: {0}")]
    UnsupportedVariant(String),

    #[error("unknown font size code {0}")]
    UnknownFontSize(u8),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for ObmlError.
pub type Result<T> = std::result::Result<T, ObmlError>;
