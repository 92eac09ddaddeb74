//! Header decoding and version detection.

use std::io::Read;

use tracing::debug;

use super::PageState;
use crate::error::{ObmlError, Result};
use crate::model::{CoordCursor, PageHeader};
use crate::reader::ObmlReader;
use crate::version::{HeaderTrailer, V16_SIZE_SENTINEL, Version};

/// Decode the header, returning the session state for the remaining sections.
///
/// ```text
/// [u24] expected size          v16: sentinel, then [u24] size [u8] 16 again
/// [u8]  version
/// [coords] page dimensions
/// [..]  magic (2 bytes on v16, 5 bytes before)
/// [str] title  [blob] unused  [str] URL base  [url] page URL
/// [..]  trailer (6 bytes v15+, 1 byte v6, u16 + u24 otherwise)
/// ```
pub(crate) fn read<R: Read>(reader: &mut ObmlReader<R>) -> Result<(PageState, PageHeader)> {
    let total_start = reader.tell();
    let mut expected_size = reader.read_u24_be()?;
    let version = Version::from_byte(reader.read_u8()?)?;

    if version == Version::V16 {
        if expected_size != V16_SIZE_SENTINEL {
            return Err(ObmlError::BadMagic {
                offset: total_start,
                expected: "v16 size sentinel 02 d3 55",
                found: expected_size.to_be_bytes()[1..].to_vec(),
            });
        }
        expected_size = reader.read_u24_be()?;
        let inner = reader.read_u8()?;
        if inner != Version::V16.byte() {
            return Err(ObmlError::UnknownVersion(inner));
        }
    }

    let layout = version.layout();
    if !layout.header_supported {
        return Err(ObmlError::UnsupportedVariant(format!(
            "version {version} header"
        )));
    }

    let content_end = total_start + u64::from(expected_size) + layout.size_prefix_len;
    debug!(%version, content_end, "detected version");

    let dimensions = reader.read_coords(None)?;

    let magic_offset = reader.tell();
    let magic = reader.read(layout.magic.len())?;
    if !layout.magic.accepts(&magic) {
        return Err(ObmlError::BadMagic {
            offset: magic_offset,
            expected: layout.magic.describe(),
            found: magic,
        });
    }

    let title = reader.read_string()?;
    reader.read_blob()?;
    let url_base = reader.read_string()?;
    let url = reader.read_url(&url_base)?;

    match layout.header_trailer {
        HeaderTrailer::Bytes(len) => reader.skip(len)?,
        HeaderTrailer::ShortMedium => {
            reader.read_u16_be()?;
            reader.read_u24_be()?;
        }
    }

    let page = PageState {
        layout,
        total_start,
        content_end,
        url_base,
        cursor: CoordCursor::new(),
    };
    let header = PageHeader {
        title,
        url,
        dimensions,
    };
    Ok((page, header))
}
