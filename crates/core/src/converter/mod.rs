//! Output converters for decoded page events.
//!
//! - HtmlConverter: absolutely positioned HTML, one element per event

mod html;

pub use html::HtmlConverter;
