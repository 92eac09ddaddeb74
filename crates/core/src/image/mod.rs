//! Embedded image export.
//!
//! This module writes the files carried in a page's embedded file stream to
//! disk so converted pages can reference them.

pub mod writer;

pub use writer::*;
