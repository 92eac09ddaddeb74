//! Link section: clickable regions, option lists and skipped annotations.

use std::collections::VecDeque;
use std::io::Read;

use super::PageState;
use crate::error::{Result, Section};
use crate::model::{Event, Link, LinkKind, Region, SelectOption};
use crate::reader::ObmlReader;
use crate::version::{LinkChunk, LinkFieldOrder};

/// Image link regions at or below this size in either axis are dropped.
const MIN_IMAGE_LINK_SIZE: u32 = 16;

/// Scheme of internal links that have no renderable target.
const INTERNAL_SCHEME: &str = "b:";

/// Decode one link chunk, queueing any events it produces.
pub(crate) fn read_chunk<R: Read>(
    reader: &mut ObmlReader<R>,
    page: &PageState,
    out: &mut VecDeque<Event>,
) -> Result<()> {
    let offset = reader.tell();
    let tag = reader.read_u8()?;
    let chunk = page
        .layout
        .link_chunk(tag)
        .ok_or_else(|| page.unknown_tag(Section::Links, tag, offset))?;

    match chunk {
        LinkChunk::OptionList => {
            reader.skip(1)?;
            let count = reader.read_u8()?;
            let options = (0..count)
                .map(|_| {
                    Ok(SelectOption {
                        value: reader.read_string()?,
                        label: reader.read_string()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            out.push_back(Event::OptionList(options));
        }
        LinkChunk::Links { image } => {
            let regions = read_regions(reader)?;
            let (url, link_type) = match page.layout.link_fields {
                LinkFieldOrder::UrlFirst => {
                    let url = reader.read_url(&page.url_base)?;
                    reader.skip(2)?;
                    (url, reader.read_string()?)
                }
                LinkFieldOrder::TypeFirst => {
                    let link_type = reader.read_string()?;
                    (reader.read_url(&page.url_base)?, link_type)
                }
            };

            if image {
                let shown = regions.into_iter().filter(|region| {
                    u32::from(region.size.x) > MIN_IMAGE_LINK_SIZE
                        && region.size.y > MIN_IMAGE_LINK_SIZE
                });
                push_links(out, LinkKind::Image, tag, shown, &url, Some(&link_type));
            } else if !url.starts_with(INTERNAL_SCHEME) {
                push_links(out, LinkKind::Plain, tag, regions, &url, Some(&link_type));
            }
        }
        LinkChunk::AnnotatedSkip => {
            read_regions(reader)?;
            reader.read_blob()?;
            reader.skip(2)?;
            reader.read_blob()?;
        }
        LinkChunk::PairSkip => {
            read_regions(reader)?;
            reader.read_blob()?;
            reader.read_blob()?;
        }
        LinkChunk::ScrollAnchor => {
            let regions = read_regions(reader)?;
            reader.read_blob()?;
            let target = reader.read_blob()?;

            // The target is its own small record: coordinates, then a name.
            let mut nested = ObmlReader::new(target.as_slice()).with_trace(reader.traces());
            let position = nested.read_coords(None)?;
            nested.read_string()?;

            let url = format!("javascript:window.scroll({}, {})", position.x, position.y);
            push_links(out, LinkKind::Anchor, tag, regions, &url, None);
        }
    }
    Ok(())
}

/// Read a u8 count followed by that many absolute (position, size) pairs.
fn read_regions<R: Read>(reader: &mut ObmlReader<R>) -> Result<Vec<Region>> {
    let count = reader.read_u8()?;
    (0..count)
        .map(|_| {
            Ok(Region {
                position: reader.read_coords(None)?,
                size: reader.read_coords(None)?,
            })
        })
        .collect()
}

fn push_links(
    out: &mut VecDeque<Event>,
    kind: LinkKind,
    tag: u8,
    regions: impl IntoIterator<Item = Region>,
    url: &str,
    link_type: Option<&str>,
) {
    out.extend(regions.into_iter().map(|region| {
        Event::Link(Link {
            kind,
            tag,
            region,
            url: url.to_string(),
            link_type: link_type.map(str::to_string),
        })
    }));
}
