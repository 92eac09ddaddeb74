//! Decoded page events.
//!
//! Events are the only values the decoder hands to consumers. They are
//! produced in stream order and never revisited.

use super::color::Color;
use super::font::FontCode;
use super::geometry::{Coords, Region};

/// One decoded record of a saved page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "data", rename_all = "snake_case"))]
pub enum Event {
    Header(PageHeader),
    Text(TextRun),
    Box(PageBox),
    Input(FormField),
    Link(Link),
    OptionList(OptionList),
    File(EmbeddedFile),
}

/// Page title, resolved URL and page dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageHeader {
    pub title: String,
    pub url: String,
    pub dimensions: Coords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextRun {
    pub text: String,
    pub font: FontCode,
    pub color: Color,
    pub position: Coords,
    pub size: Coords,
}

/// What fills a box: its own color, or an embedded image joined by address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoxFill {
    Solid,
    Image { address: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageBox {
    pub position: Coords,
    pub size: Coords,
    pub color: Color,
    pub fill: BoxFill,
}

impl PageBox {
    /// Blob address of the image backing this box, if any.
    pub const fn image_address(&self) -> Option<u32> {
        match self.fill {
            BoxFill::Image { address } => Some(address),
            BoxFill::Solid => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputKind {
    Textarea,
    Checkbox,
    Radio,
    Select,
    Text,
}

impl InputKind {
    /// Map a form chunk's kind byte.
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'a' => Some(Self::Textarea),
            b'c' => Some(Self::Checkbox),
            b'r' => Some(Self::Radio),
            b's' => Some(Self::Select),
            b'x' => Some(Self::Text),
            _ => None,
        }
    }

    /// Checkboxes and radio buttons are stored without their native chrome.
    pub const fn needs_chrome_correction(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormField {
    pub kind: InputKind,
    pub id: String,
    pub value: String,
    pub position: Coords,
    pub size: Coords,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LinkKind {
    /// Any region link other than an image link; the chunk tag is kept on
    /// [`Link::tag`].
    Plain,
    Image,
    /// In-page scroll target synthesized from a v12 anchor chunk.
    Anchor,
}

/// A clickable rectangle. Multi-region link chunks produce one per region.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Link {
    pub kind: LinkKind,
    /// Tag of the chunk this link came from (`L`, `P`, `w`, `W`, `i` or `N`).
    pub tag: u8,
    pub region: Region,
    pub url: String,
    /// Type string stored next to the URL; anchors have none.
    pub link_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Selection data for a `select` form field.
pub type OptionList = Vec<SelectOption>;

/// Raw bytes of an embedded file, keyed by blob address.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EmbeddedFile {
    pub address: u32,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for EmbeddedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFile")
            .field("address", &self.address)
            .field("len", &self.data.len())
            .finish()
    }
}
