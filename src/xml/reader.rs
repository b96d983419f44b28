//! Namespace-aware streaming reader.
//!
//! Wraps `quick_xml::NsReader` and hands out owned, namespace-resolved
//! events. On top of the tokenizer's own checks it enforces the document
//! rules the converters rely on: exactly one root element, no character
//! data outside it, no element left open at end of input, and nesting no
//! deeper than [`MAX_DEPTH`].
//!
//! A reader built with [`XmlEventReader::fragment`] accepts a sequence of
//! root elements instead of exactly one.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use tokio_util::sync::CancellationToken;

use super::{MAX_DEPTH, QualifiedName};
use crate::base::{ConvertError, checkpoint};

/// Owned event produced by [`XmlEventReader`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// Start tag. Self-closing tags are followed by a synthetic [`XmlEvent::End`].
    Start(StartTag),
    End,
    /// Character data (entities resolved, CDATA included verbatim).
    Text(String),
}

/// A resolved start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct StartTag {
    pub name: QualifiedName,
    pub prefix: Option<String>,
    /// Regular attributes; namespace declarations are kept in `namespaces`.
    pub attributes: Vec<XmlAttribute>,
    /// Prefix bindings declared on this tag (`""` for the default namespace).
    pub namespaces: Vec<(String, String)>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: QualifiedName,
    pub value: String,
}

/// Streaming reader with cancellation checks between events.
pub struct XmlEventReader<'a> {
    reader: NsReader<&'a [u8]>,
    cancel: &'a CancellationToken,
    /// Names of currently open elements, innermost last.
    open: Vec<String>,
    seen_root: bool,
    multiple_roots: bool,
    pending_end: bool,
}

impl<'a> XmlEventReader<'a> {
    pub fn new(text: &'a str, cancel: &'a CancellationToken) -> Self {
        Self {
            reader: NsReader::from_str(text),
            cancel,
            open: Vec::new(),
            seen_root: false,
            multiple_roots: false,
            pending_end: false,
        }
    }

    /// Reader for a sequence of top-level elements.
    pub fn fragment(text: &'a str, cancel: &'a CancellationToken) -> Self {
        Self {
            multiple_roots: true,
            ..Self::new(text, cancel)
        }
    }

    /// Current nesting depth (0 outside the root element).
    fn depth(&self) -> usize {
        self.open.len()
    }

    /// Next event, or `None` once the document is complete.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ConvertError> {
        checkpoint(self.cancel)?;

        if self.pending_end {
            self.pending_end = false;
            self.open.pop();
            return Ok(Some(XmlEvent::End));
        }

        loop {
            let read = self
                .reader
                .read_resolved_event()
                .map(|(ns, event)| (owned_namespace(ns), event));

            let (namespace, event) = match read {
                Ok(pair) => pair,
                Err(e) => {
                    return Err(ConvertError::xml(format!(
                        "XML parse error at position {}: {e}",
                        self.reader.error_position()
                    )));
                }
            };

            match event {
                Event::Start(e) => {
                    let tag = self.start_tag(namespace?, &e, false)?;
                    return Ok(Some(XmlEvent::Start(tag)));
                }
                Event::Empty(e) => {
                    let tag = self.start_tag(namespace?, &e, true)?;
                    self.pending_end = true;
                    return Ok(Some(XmlEvent::Start(tag)));
                }
                Event::End(_) => {
                    self.open.pop();
                    return Ok(Some(XmlEvent::End));
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| self.error_at(e))?
                        .into_owned();
                    if let Some(text) = self.character_data(text)? {
                        return Ok(Some(XmlEvent::Text(text)));
                    }
                }
                Event::CData(c) => {
                    let text = String::from_utf8_lossy(&c).into_owned();
                    if let Some(text) = self.character_data(text)? {
                        return Ok(Some(XmlEvent::Text(text)));
                    }
                }
                Event::Eof => return self.finish(),
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }
    }

    fn start_tag(
        &mut self,
        namespace: Option<String>,
        e: &BytesStart<'_>,
        self_closing: bool,
    ) -> Result<StartTag, ConvertError> {
        if self.open.is_empty() {
            if self.seen_root && !self.multiple_roots {
                return Err(self.error_at("There are multiple root elements."));
            }
            self.seen_root = true;
        }
        if self.depth() >= MAX_DEPTH {
            return Err(self.error_at(format!(
                "Elements are nested deeper than the limit of {MAX_DEPTH}."
            )));
        }

        let raw = utf8(e.name().as_ref())?;
        let local = utf8(e.local_name().as_ref())?;
        let prefix = e.name().prefix().map(|p| utf8(p.as_ref())).transpose()?;

        let mut attributes = Vec::new();
        let mut namespaces = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| self.error_at(err))?;
            let key = utf8(attr.key.as_ref())?;
            let value = attr
                .unescape_value()
                .map_err(|err| self.error_at(err))?
                .into_owned();

            if key == "xmlns" {
                namespaces.push((String::new(), value));
                continue;
            }
            if let Some(declared) = key.strip_prefix("xmlns:") {
                namespaces.push((declared.to_string(), value));
                continue;
            }

            let (resolved, attr_local) = self.reader.resolve_attribute(attr.key);
            let attr_namespace = match resolved {
                ResolveResult::Bound(ns) => Some(utf8(ns.as_ref())?),
                ResolveResult::Unbound => None,
                ResolveResult::Unknown(p) => {
                    return Err(undeclared_prefix(&p));
                }
            };
            attributes.push(XmlAttribute {
                name: QualifiedName::new(attr_namespace, utf8(attr_local.as_ref())?),
                value,
            });
        }

        self.open.push(raw);

        Ok(StartTag {
            name: QualifiedName::new(namespace, local),
            prefix,
            attributes,
            namespaces,
            self_closing,
        })
    }

    /// Character data is only allowed inside the root element; whitespace
    /// outside it is dropped.
    fn character_data(&self, text: String) -> Result<Option<String>, ConvertError> {
        if !self.open.is_empty() {
            return Ok(Some(text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        Err(self.error_at("Data at the root level is invalid."))
    }

    fn finish(&self) -> Result<Option<XmlEvent>, ConvertError> {
        if !self.open.is_empty() {
            return Err(self.error_at(format!(
                "Unexpected end of file has occurred. The following elements are not closed: {}.",
                self.open.join(", ")
            )));
        }
        if !self.seen_root {
            return Err(ConvertError::xml("Root element is missing."));
        }
        Ok(None)
    }

    fn error_at(&self, message: impl std::fmt::Display) -> ConvertError {
        ConvertError::xml(format!(
            "XML parse error at position {}: {message}",
            self.reader.buffer_position()
        ))
    }
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>, ConvertError> {
    match resolved {
        ResolveResult::Bound(ns) => utf8(ns.as_ref()).map(Some),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(p) => Err(undeclared_prefix(&p)),
    }
}

fn undeclared_prefix(prefix: &[u8]) -> ConvertError {
    ConvertError::xml(format!(
        "'{}' is an undeclared prefix.",
        String::from_utf8_lossy(prefix)
    ))
}

fn utf8(bytes: &[u8]) -> Result<String, ConvertError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ConvertError::xml(format!("Invalid UTF-8 in name: {e}")))
}
