//! Indenting XML writer.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::base::{ConvertError, IndentationStyle};

/// Writes XML into an in-memory buffer, indenting every level with the
/// literal string of the configured [`IndentationStyle`].
///
/// Attributes always stay on the element's line.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    pub fn new(indentation: IndentationStyle) -> Self {
        let unit = indentation.indent_chars();
        // Every style is one character repeated; the writer takes it in that form.
        let indent_char = unit.as_bytes().first().copied().unwrap_or(b' ');
        Self {
            writer: Writer::new_with_indent(Vec::new(), indent_char, unit.len()),
        }
    }

    /// `<?xml version="1.0" encoding="utf-8"?>`
    pub fn declaration(&mut self) -> Result<(), ConvertError> {
        self.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
    }

    pub fn start(&mut self, element: BytesStart<'_>) -> Result<(), ConvertError> {
        self.event(Event::Start(element))
    }

    pub fn empty(&mut self, element: BytesStart<'_>) -> Result<(), ConvertError> {
        self.event(Event::Empty(element))
    }

    pub fn end(&mut self, name: &str) -> Result<(), ConvertError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub fn text(&mut self, text: &str) -> Result<(), ConvertError> {
        self.event(Event::Text(BytesText::new(text)))
    }

    /// `<name ...>text</name>` on a single line.
    pub fn text_element(
        &mut self,
        element: BytesStart<'_>,
        text: &str,
    ) -> Result<(), ConvertError> {
        let end = element.to_end().into_owned();
        self.start(element)?;
        self.text(text)?;
        self.event(Event::End(end))
    }

    pub fn finish(self) -> Result<String, ConvertError> {
        Ok(String::from_utf8(self.writer.into_inner())?)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), ConvertError> {
        self.writer.write_event(event).map_err(ConvertError::write)
    }
}
