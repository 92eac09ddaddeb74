//! obml - a decoder for saved mobile browser pages (OBML).
//!
//! Saved pages are a versioned binary container split into three
//! length-framed sections: header, link table and content stream. The
//! [`Decoder`] walks them forward and yields typed page [`Event`]s;
//! [`converter::HtmlConverter`] turns those events back into a page.
//!
//! ```no_run
//! use obml_core::{Decoder, Event};
//!
//! let data = std::fs::read("page.obml16")?;
//! for event in Decoder::new(data.as_slice()) {
//!     if let Event::Header(header) = event? {
//!         println!("{}", header.title);
//!     }
//! }
//! # Ok::<(), obml_core::ObmlError>(())
//! ```

pub mod blobs;
pub mod converter;
pub mod decoder;
pub mod error;
pub mod image;
pub mod model;
pub mod reader;
pub mod utils;
pub mod version;

pub use blobs::BlobReport;
pub use decoder::{DecodeOptions, Decoder, decode_bytes, decode_file};
pub use error::{ObmlError, Result};
pub use model::Event;
pub use version::Version;
