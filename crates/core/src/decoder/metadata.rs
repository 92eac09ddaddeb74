//! Metadata section: unknown records up to the link section marker.

use std::io::Read;

use super::PageState;
use crate::error::{Result, Section};
use crate::reader::ObmlReader;
use crate::version::MetadataChunk;

/// Length of the unknown `C` record.
const CONFIG_RECORD_LEN: usize = 23;

/// Decode one metadata chunk.
///
/// Returns the declared link section length when the chunk ends the section.
pub(crate) fn read_chunk<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &PageState,
) -> Result<Option<u32>> {
    let offset = reader.tell();
    let tag = reader.read_u8()?;
    let chunk = page
        .layout
        .metadata_chunk(tag)
        .ok_or_else(|| page.unknown_tag(Section::Metadata, tag, offset))?;

    match chunk {
        MetadataChunk::Config => reader.skip(CONFIG_RECORD_LEN)?,
        MetadataChunk::Meta => {
            reader.skip(2)?;
            reader.read_blob()?;
        }
        MetadataChunk::LinksStart => return Ok(Some(reader.read_u24_be()?)),
    }
    Ok(None)
}
