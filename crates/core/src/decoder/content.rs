//! Content section: boxes, text, form fields, images and embedded files.

use std::collections::VecDeque;
use std::io::Read;

use super::PageState;
use crate::blobs::BlobIndex;
use crate::error::{ObmlError, Result, Section};
use crate::model::geometry::Y_MASK;
use crate::model::{
    BoxFill, Coords, EmbeddedFile, Event, FontCode, FormField, InputKind, PageBox, TextRun,
};
use crate::reader::ObmlReader;
use crate::version::{ContentChunk, FileAddressing, ImageLayout, TextLayout};

/// Native widget chrome missing from stored checkbox/radio bounds.
const CHROME_INSET: u16 = 8;

/// What the content loop does after a chunk.
pub(crate) enum ContentStep {
    Continue,
    /// The embedded file sub-stream spans `start..end`.
    Files { start: u64, end: u64 },
}

/// Decode one content chunk, queueing any events it produces.
pub(crate) fn read_chunk<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &mut PageState,
    blobs: &mut BlobIndex,
    out: &mut VecDeque<Event>,
) -> Result<ContentStep> {
    let offset = reader.tell();
    let tag = reader.read_u8()?;
    let chunk = page
        .layout
        .content_chunk(tag)
        .ok_or_else(|| page.unknown_tag(Section::Content, tag, offset))?;

    match chunk {
        ContentChunk::Rect => {
            let position = reader.read_coords(page.content_cursor())?;
            let size = reader.read_coords(None)?;
            let color = reader.read_color()?;
            out.push_back(Event::Box(PageBox {
                position,
                size,
                color,
                fill: BoxFill::Solid,
            }));
        }
        ContentChunk::FormField => {
            out.push_back(Event::Input(read_form_field(reader, page)?));
        }
        ContentChunk::Image(layout) => {
            let image = read_image(reader, page, layout)?;
            if let Some(address) = image.image_address() {
                blobs.declare_placeholder(address);
            }
            out.push_back(Event::Box(image));
        }
        ContentChunk::LinkOffsets => {
            // Offsets into the link section; nothing consumes them.
            for _ in 0..3 {
                reader.read_u24_be()?;
            }
        }
        ContentChunk::Meta => {
            reader.skip(2)?;
            reader.read_blob()?;
        }
        ContentChunk::Files => {
            let len = reader.read_u24_be()?;
            let start = reader.tell();
            return Ok(ContentStep::Files {
                start,
                end: start + u64::from(len),
            });
        }
        ContentChunk::Text(layout) => {
            out.push_back(Event::Text(read_text(reader, page, layout)?));
        }
        ContentChunk::Padding => reader.skip(6)?,
    }
    Ok(ContentStep::Continue)
}

fn read_form_field<R: Read>(reader: &mut ObmlReader<R>, page: &mut PageState) -> Result<FormField> {
    let mut position = reader.read_coords(page.content_cursor())?;
    let mut size = reader.read_coords(None)?;
    let color = reader.read_color()?;
    let kind_tag = reader.read_u8()?;
    reader.skip(1)?;
    let id = reader.read_string()?;
    let value = reader.read_string()?;
    reader.skip(page.layout.form_trailer)?;

    let kind = InputKind::from_tag(kind_tag).ok_or_else(|| {
        ObmlError::UnsupportedVariant(format!("form field kind {kind_tag:#04x}"))
    })?;
    if kind.needs_chrome_correction() {
        position = Coords::new(
            position.x.saturating_sub(CHROME_INSET),
            position.y.saturating_sub(u32::from(CHROME_INSET)),
        );
        size = Coords::new(
            size.x.saturating_add(CHROME_INSET),
            (size.y + u32::from(CHROME_INSET)).min(Y_MASK),
        );
    }

    Ok(FormField {
        kind,
        id,
        value,
        position,
        size,
        color,
    })
}

fn read_image<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &mut PageState,
    layout: ImageLayout,
) -> Result<PageBox> {
    let position = reader.read_coords(page.content_cursor())?;
    let size = reader.read_coords(None)?;
    let color = reader.read_color()?;

    let address = match layout {
        ImageLayout::Legacy => {
            reader.skip(3)?;
            reader.read_u24_be()?
        }
        ImageLayout::Unaddressed => {
            reader.skip(14)?;
            return Err(ObmlError::UnsupportedVariant(format!(
                "version {} image chunk has no known blob address",
                page.layout.version
            )));
        }
        ImageLayout::Addressed => {
            let address = reader.read_u24_be()?;
            skip_auxiliary(reader, 1..=2, "image")?;
            address
        }
    };

    Ok(PageBox {
        position,
        size,
        color,
        fill: BoxFill::Image { address },
    })
}

fn read_text<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &mut PageState,
    layout: TextLayout,
) -> Result<TextRun> {
    let position = reader.read_coords(page.content_cursor())?;
    let size = reader.read_coords(None)?;
    let color = reader.read_color()?;

    let font = match layout {
        TextLayout::Coded => FontCode(reader.read_u8()?),
        TextLayout::Auxiliary => {
            reader.skip(1)?;
            let font = FontCode(4 | (reader.read_u8()? & 1));
            skip_auxiliary(reader, 0..=1, "text")?;
            font
        }
    };
    let text = reader.read_string()?;

    Ok(TextRun {
        text,
        font,
        color,
        position,
        size,
    })
}

/// Skip a u8-counted list of (kind byte, blob) records of unknown meaning.
fn skip_auxiliary<R: Read>(
    reader: &mut ObmlReader<R>,
    allowed: std::ops::RangeInclusive<u8>,
    chunk: &str,
) -> Result<()> {
    let count = reader.read_u8()?;
    if !allowed.contains(&count) {
        return Err(ObmlError::UnsupportedVariant(format!(
            "{chunk} chunk with {count} auxiliary records"
        )));
    }
    for _ in 0..count {
        reader.read_u8()?;
        reader.read_blob()?;
    }
    Ok(())
}

/// Read one embedded file.
///
/// The address is the offset of the file's length prefix, measured from
/// the stream start (v6) or from the start of the file sub-stream.
pub(crate) fn read_file<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &PageState,
    files_start: u64,
) -> Result<EmbeddedFile> {
    let origin = match page.layout.file_addressing {
        FileAddressing::FromStreamStart => page.total_start,
        FileAddressing::FromFilesStart => files_start,
    };
    let address = u32::try_from(reader.tell() - origin).map_err(|_| {
        ObmlError::UnsupportedVariant(format!("embedded file beyond offset {}", u32::MAX))
    })?;
    let data = reader.read_blob()?;
    Ok(EmbeddedFile { address, data })
}
