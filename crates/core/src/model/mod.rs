//! Page model types - geometry, colors, fonts and decoded events.
//!
//! This module contains the types that cross from the decoder to consumers:
//! - `geometry` - coordinates, regions and the relative-coordinate cursor
//! - `color` - ARGB colors
//! - `font` - packed font codes
//! - `event` - the closed set of decoded page events

pub mod color;
pub mod event;
pub mod font;
pub mod geometry;

// Re-export main types for convenience
pub use color::Color;
pub use event::{
    BoxFill, EmbeddedFile, Event, FormField, InputKind, Link, LinkKind, OptionList, PageBox,
    PageHeader, SelectOption, TextRun,
};
pub use font::FontCode;
pub use geometry::{CoordCursor, Coords, Region};
