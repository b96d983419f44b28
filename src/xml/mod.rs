//! XML primitives on top of `quick-xml`.
//!
//! - [`XmlEventReader`] - namespace-resolving streaming reader that enforces
//!   document well-formedness and checks cancellation between events
//! - [`parse_fragment`] / [`XmlElement`] - small element tree used by the schema
//!   compiler, keeping in-scope prefix bindings for QName-valued attributes
//! - [`XmlWriter`] - indenting writer driven by an [`IndentationStyle`]
//!
//! [`IndentationStyle`]: crate::base::IndentationStyle

mod dom;
mod name;
mod reader;
mod writer;

pub use dom::{XmlElement, XmlNode, parse_fragment};
pub use name::QualifiedName;
pub use reader::{StartTag, XmlAttribute, XmlEvent, XmlEventReader};
pub use writer::XmlWriter;

/// Deepest element nesting accepted by [`XmlEventReader`]. The schema
/// compiler and the sample synthesizer bound their own recursion by it too.
pub const MAX_DEPTH: usize = 256;

/// XML Schema namespace.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
/// XML Schema instance namespace (`xsi:type`, `xsi:nil`, ...).
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
