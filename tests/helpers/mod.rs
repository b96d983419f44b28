//! Shared helpers for integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use tokio_util::sync::CancellationToken;
use xmlxsd::{ConversionDirection, ConversionResult, IndentationStyle, convert};

/// Run one conversion that is never cancelled.
pub fn run(input: &str, direction: ConversionDirection) -> ConversionResult {
    convert(input, direction, IndentationStyle::TwoSpaces, &CancellationToken::new())
        .expect("conversion was not cancelled")
}

pub fn xml_to_xsd(input: &str) -> String {
    let result = run(input, ConversionDirection::XmlToSchema);
    assert!(result.succeeded, "inference failed: {}", result.text);
    result.text
}

pub fn xsd_to_xml(input: &str) -> String {
    let result = run(input, ConversionDirection::SchemaToXml);
    assert!(result.succeeded, "synthesis failed: {}", result.text);
    result.text
}

/// Local name of the first element in `xml`.
pub fn first_element_name(xml: &str) -> String {
    let start = xml
        .match_indices('<')
        .map(|(i, _)| i + 1)
        .find(|&i| !matches!(xml.as_bytes().get(i), Some(b'?' | b'!' | b'/')))
        .expect("no element in output");
    let name: String = xml[start..]
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect();
    name.rsplit(':').next().unwrap_or_default().to_string()
}

/// Collapse indentation so outputs can be compared structurally.
pub fn compact(text: &str) -> String {
    text.lines().map(str::trim).collect()
}
