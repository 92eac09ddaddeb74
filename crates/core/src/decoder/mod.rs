//! Section-by-section decoding of a saved page into events.
//!
//! A file is three length-framed sections walked strictly forward:
//!
//! ```text
//! [header]    size prefix, version, dimensions, magic, title, URL
//! [metadata]  tagged chunks until `S`, which declares the link section length
//! [links]     tagged link/skip chunks, exactly `length` bytes
//! [content]   tagged layout chunks, ending with the embedded file chunk `S`
//! ```
//!
//! [`Decoder`] is a pull iterator: each call to `next` decodes at most one
//! chunk (or one embedded file) and hands out the events it produced.

mod content;
mod header;
mod links;
mod metadata;

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use tracing::{debug, info};

use crate::blobs::{BlobIndex, BlobReport};
use crate::error::{ObmlError, Result, Section};
use crate::model::{CoordCursor, Event};
use crate::reader::ObmlReader;
use crate::version::{CoordMode, Layout, Version};

use content::ContentStep;

/// Decoder configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Echo every primitive read at trace level.
    pub trace: bool,
}

/// Per-file session state established by the header.
pub(crate) struct PageState {
    pub layout: &'static Layout,
    pub total_start: u64,
    pub content_end: u64,
    pub url_base: String,
    pub cursor: CoordCursor,
}

impl PageState {
    /// Cursor to thread through content geometry reads, if this revision
    /// stores positions as deltas.
    pub fn content_cursor(&mut self) -> Option<&mut CoordCursor> {
        match self.layout.content_coords {
            CoordMode::Relative => Some(&mut self.cursor),
            CoordMode::Absolute => None,
        }
    }

    pub fn unknown_tag(&self, section: Section, tag: u8, offset: u64) -> ObmlError {
        ObmlError::UnknownChunkTag {
            section,
            tag,
            version: self.layout.version,
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Metadata,
    Links { end: u64 },
    Content,
    Files { start: u64, end: u64 },
}

enum State {
    Header,
    Page { page: PageState, stage: Stage },
    Done,
}

/// Lazy, single-pass decoder over one saved page.
///
/// Yields events in stream order. The first error ends the sequence; events
/// already yielded belong to a failed decode and should be discarded.
pub struct Decoder<R> {
    reader: ObmlReader<R>,
    state: State,
    pending: VecDeque<Event>,
    blobs: BlobIndex,
    version: Option<Version>,
    report: Option<BlobReport>,
}

impl<R: Read> Decoder<R> {
    pub fn new(source: R) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: R, options: DecodeOptions) -> Self {
        Self {
            reader: ObmlReader::new(source).with_trace(options.trace),
            state: State::Header,
            pending: VecDeque::new(),
            blobs: BlobIndex::new(),
            version: None,
            report: None,
        }
    }

    /// Detected format revision, once the header has been decoded.
    ///
    /// Stays available after the decode has finished.
    pub const fn version(&self) -> Option<Version> {
        self.version
    }

    /// Current byte offset in the source.
    pub const fn offset(&self) -> u64 {
        self.reader.tell()
    }

    /// Image/file join result, available once the content section has ended.
    pub fn blob_report(&self) -> Option<&BlobReport> {
        self.report.as_ref()
    }

    fn step(&mut self) -> Result<()> {
        let Self {
            reader,
            state,
            pending,
            blobs,
            version,
            report,
        } = self;

        match state {
            State::Header => {
                let (page, header) = header::read(reader)?;
                *version = Some(page.layout.version);
                pending.push_back(Event::Header(header));
                *state = State::Page {
                    page,
                    stage: Stage::Metadata,
                };
            }
            State::Page { page, stage } => match *stage {
                Stage::Metadata => {
                    if let Some(len) = metadata::read_chunk(reader, page)? {
                        let start = reader.tell();
                        debug!(start, len, "link section");
                        *stage = Stage::Links {
                            end: start + u64::from(len),
                        };
                    }
                }
                Stage::Links { end } => {
                    if reader.tell() < end {
                        links::read_chunk(reader, page, pending)?;
                    } else {
                        expect_offset(reader, Section::Links, end)?;
                        debug!(start = end, "content section");
                        *stage = Stage::Content;
                    }
                }
                Stage::Content => {
                    if let ContentStep::Files { start, end } =
                        content::read_chunk(reader, page, blobs, pending)?
                    {
                        debug!(start, end, "embedded files");
                        *stage = Stage::Files { start, end };
                    }
                }
                Stage::Files { start, end } => {
                    if reader.tell() < end {
                        let file = content::read_file(reader, page, start)?;
                        blobs.record_file(file.address);
                        pending.push_back(Event::File(file));
                    } else {
                        expect_offset(reader, Section::Files, end)?;
                        expect_offset(reader, Section::Content, page.content_end)?;
                        *report = Some(blobs.finish());
                        *state = State::Done;
                    }
                }
            },
            State::Done => {}
        }
        Ok(())
    }
}

fn expect_offset<R: Read>(reader: &ObmlReader<R>, section: Section, expected: u64) -> Result<()> {
    let found = reader.tell();
    if found != expected {
        return Err(ObmlError::FramingMismatch {
            section,
            expected,
            found,
        });
    }
    Ok(())
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if matches!(self.state, State::Done) {
                return None;
            }
            if let Err(e) = self.step() {
                self.state = State::Done;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<R: Read> FusedIterator for Decoder<R> {}

/// Decode a whole in-memory page.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<Event>> {
    Decoder::new(data).collect()
}

/// Decode a whole page from disk.
pub fn decode_file(path: impl AsRef<Path>, options: DecodeOptions) -> Result<Vec<Event>> {
    let path = path.as_ref();
    info!("Decoding saved page: {}", path.display());
    let file = File::open(path)?;
    Decoder::with_options(BufReader::new(file), options).collect()
}
