//! HTML Converter - outputs a page with absolutely positioned elements.

use std::collections::VecDeque;
use std::io::Write;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::model::{
    BoxFill, Event, FormField, InputKind, Link, PageBox, PageHeader, SelectOption, TextRun,
};
use crate::utils::{css_box, enc, make_compat_str};

const STYLESHEET: &str = "\
body { margin: 0; background: #fff; }
.page { position: relative; overflow: hidden; }
.page > * { position: absolute; margin: 0; padding: 0; border: 0; box-sizing: border-box; }
.t { white-space: pre; overflow: hidden; font-family: sans-serif; line-height: 1; }
.l { display: block; }
";

/// HTML Converter - writes one positioned element per layout event.
///
/// Image boxes are rendered as `<img>` when a source is registered for their
/// blob address, otherwise as a box filled with their placeholder color.
///
/// Option lists precede the form fields in a page and are consumed in order
/// by `select` fields. Lists left over when the page closes are written as
/// `<datalist id="options-N">`.
pub struct HtmlConverter<W: Write> {
    /// Output writer
    outfp: W,
    /// Image sources by blob address
    images: FxHashMap<u32, String>,
    /// Scale factor
    scale: f64,
    /// Option lists not yet claimed by a select field
    options: VecDeque<Vec<SelectOption>>,
    /// Whether the document head has been written
    started: bool,
}

impl<W: Write> HtmlConverter<W> {
    /// Create a new HTML converter.
    pub fn new(outfp: W) -> Self {
        Self::with_images(outfp, FxHashMap::default())
    }

    /// Create a converter with known image sources.
    pub fn with_images(outfp: W, images: FxHashMap<u32, String>) -> Self {
        Self {
            outfp,
            images,
            scale: 1.0,
            options: VecDeque::new(),
            started: false,
        }
    }

    /// Get scale factor.
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Set scale factor.
    pub const fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Register the source of the image stored at `address`.
    pub fn set_image(&mut self, address: u32, src: impl Into<String>) {
        self.images.insert(address, src.into());
    }

    /// Write the document head and open the page container.
    fn write_header(&mut self, header: Option<&PageHeader>) -> Result<()> {
        let title = header.map_or("", |h| h.title.as_str());
        write!(
            self.outfp,
            "<!DOCTYPE html>\n<html><head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head><body>\n",
            enc(&make_compat_str(title)),
            STYLESHEET
        )?;
        match header {
            Some(h) => {
                writeln!(
                    self.outfp,
                    "<p class=\"source\"><a href=\"{}\">{}</a></p>",
                    enc(&h.url),
                    enc(&h.url)
                )?;
                writeln!(
                    self.outfp,
                    "<div class=\"page\" style=\"width:{}px; height:{}px;\">",
                    (f64::from(h.dimensions.x) * self.scale) as i64,
                    (f64::from(h.dimensions.y) * self.scale) as i64
                )?;
            }
            None => writeln!(self.outfp, "<div class=\"page\">")?,
        }
        self.started = true;
        Ok(())
    }

    /// Write footer.
    fn write_footer(&mut self) -> Result<()> {
        self.outfp.write_all(b"</div>\n</body></html>\n")?;
        Ok(())
    }

    /// Receive and render one event.
    pub fn receive_event(&mut self, event: &Event) -> Result<()> {
        if let Event::Header(header) = event {
            if !self.started {
                self.write_header(Some(header))?;
            }
            return Ok(());
        }
        if !self.started {
            self.write_header(None)?;
        }

        match event {
            Event::Header(_) => Ok(()),
            Event::Text(text) => self.place_text(text),
            Event::Box(page_box) => self.place_box(page_box),
            Event::Input(field) => self.place_input(field),
            Event::Link(link) => self.place_link(link),
            Event::OptionList(options) => {
                self.options.push_back(options.clone());
                Ok(())
            }
            // Embedded files are referenced through their image boxes.
            Event::File(_) => Ok(()),
        }
    }

    /// Place a text run.
    fn place_text(&mut self, text: &TextRun) -> Result<()> {
        let size = text.font.pixel_size()?;
        let weight = if text.font.is_bold() {
            " font-weight:bold;"
        } else {
            ""
        };
        writeln!(
            self.outfp,
            "<div class=\"t\" style=\"{} color:{}; font-size:{}px;{}\">{}</div>",
            css_box(text.position, text.size, self.scale),
            text.color.to_css(),
            (f64::from(size) * self.scale) as i64,
            weight,
            enc(&make_compat_str(&text.text))
        )?;
        Ok(())
    }

    /// Place a solid or image-backed box.
    fn place_box(&mut self, page_box: &PageBox) -> Result<()> {
        let geometry = css_box(page_box.position, page_box.size, self.scale);
        let src = match page_box.fill {
            BoxFill::Image { address } => self.images.get(&address),
            BoxFill::Solid => None,
        };
        match src {
            Some(src) => writeln!(
                self.outfp,
                "<img class=\"i\" src=\"{}\" alt=\"\" style=\"{}\">",
                enc(src),
                geometry
            )?,
            None => writeln!(
                self.outfp,
                "<div class=\"b\" style=\"{} background:{};\"></div>",
                geometry,
                page_box.color.to_css()
            )?,
        }
        Ok(())
    }

    /// Place a form control.
    fn place_input(&mut self, field: &FormField) -> Result<()> {
        let geometry = css_box(field.position, field.size, self.scale);
        let name = enc(&field.id);
        let value = enc(&field.value);
        let color = field.color.to_css();
        match field.kind {
            InputKind::Textarea => writeln!(
                self.outfp,
                "<textarea name=\"{name}\" style=\"{geometry} color:{color};\">{value}</textarea>"
            )?,
            InputKind::Select => {
                write!(
                    self.outfp,
                    "<select name=\"{name}\" style=\"{geometry} color:{color};\">"
                )?;
                match self.options.pop_front() {
                    Some(options) => self.write_options(&options, Some(field.value.as_str()))?,
                    None => write!(self.outfp, "<option>{value}</option>")?,
                }
                self.outfp.write_all(b"</select>\n")?;
            }
            InputKind::Checkbox | InputKind::Radio | InputKind::Text => {
                let kind = match field.kind {
                    InputKind::Checkbox => "checkbox",
                    InputKind::Radio => "radio",
                    _ => "text",
                };
                writeln!(
                    self.outfp,
                    "<input type=\"{kind}\" name=\"{name}\" value=\"{value}\" style=\"{geometry} color:{color};\">"
                )?
            }
        }
        Ok(())
    }

    /// Place a transparent clickable region.
    fn place_link(&mut self, link: &Link) -> Result<()> {
        writeln!(
            self.outfp,
            "<a class=\"l\" href=\"{}\" style=\"{}\"></a>",
            enc(&link.url),
            css_box(link.region.position, link.region.size, self.scale)
        )?;
        Ok(())
    }

    /// Write `<option>` elements, marking the one whose value is `selected`.
    fn write_options(&mut self, options: &[SelectOption], selected: Option<&str>) -> Result<()> {
        for option in options {
            let mark = if selected == Some(option.value.as_str()) {
                " selected"
            } else {
                ""
            };
            write!(
                self.outfp,
                "<option value=\"{}\"{}>{}</option>",
                enc(&option.value),
                mark,
                enc(&make_compat_str(&option.label))
            )?;
        }
        Ok(())
    }

    /// Write option lists no select field claimed.
    fn write_unclaimed_options(&mut self) -> Result<()> {
        let mut index = 0;
        while let Some(options) = self.options.pop_front() {
            write!(self.outfp, "<datalist id=\"options-{index}\">")?;
            self.write_options(&options, None)?;
            self.outfp.write_all(b"</datalist>\n")?;
            index += 1;
        }
        Ok(())
    }

    /// Finish the document and flush the writer.
    pub fn close(&mut self) -> Result<()> {
        if !self.started {
            self.write_header(None)?;
        }
        self.write_unclaimed_options()?;
        self.write_footer()?;
        self.outfp.flush()?;
        Ok(())
    }

    /// Consume the converter, returning the writer.
    pub fn into_inner(self) -> W {
        self.outfp
    }
}
