#![allow(clippy::unwrap_used, clippy::expect_used)]

use rstest::rstest;
use xmlxsd::{ConversionDirection, IndentationStyle, convert};
use tokio_util::sync::CancellationToken;

use crate::helpers::{compact, first_element_name, xml_to_xsd, xsd_to_xml};

#[rstest]
#[case::empty_root("<root/>")]
#[case::text_root("<count>42</count>")]
#[case::attributes(r#"<config version="2" debug="true"/>"#)]
#[case::nested("<library><book><title>T</title><year>1999</year></book><book><title>U</title></book></library>")]
#[case::mixed("<p>Some <b>bold</b> text</p>")]
#[case::out_of_order("<list><a/><b/><a/><c>1</c></list>")]
#[case::default_namespace(r#"<feed xmlns="urn:feed"><entry><id>1</id></entry></feed>"#)]
#[case::prefixed_root(r#"<f:feed xmlns:f="urn:feed"><f:entry/></f:feed>"#)]
#[case::foreign_child(r#"<a xmlns="urn:one"><b xmlns="urn:two">x</b></a>"#)]
#[case::prefixed_foreign_child(r#"<doc xmlns:m="urn:meta"><m:info id="1"/><body/></doc>"#)]
#[case::declaration("<?xml version=\"1.0\"?>\n<!-- comment -->\n<doc><when>2024-05-01</when></doc>")]
fn test_round_trip_keeps_root_name(#[case] xml: &str) {
    let schema = xml_to_xsd(xml);
    let sample = xsd_to_xml(&schema);
    assert_eq!(first_element_name(&sample), first_element_name(xml), "{schema}\n---\n{sample}");
}

#[test]
fn test_round_trip_reproduces_simple_structure() {
    let schema = xml_to_xsd("<root><a>x</a><b>1</b></root>");
    let sample = xsd_to_xml(&schema);
    assert_eq!(sample, "<root>\n  <a>sampleValue</a>\n  <b>sampleValue</b>\n</root>");
}

#[test]
fn test_round_trip_across_namespaces() {
    let schema = xml_to_xsd(r#"<a xmlns="urn:one"><b xmlns="urn:two">x</b></a>"#);
    assert_eq!(schema.matches("<xs:schema").count(), 2, "{schema}");

    let sample = xsd_to_xml(&schema);
    assert_eq!(
        compact(&sample),
        r#"<a xmlns="urn:one"><b xmlns="urn:two">sampleValue</b></a><b xmlns="urn:two">sampleValue</b>"#
    );
}

#[test]
fn test_inference_is_idempotent() {
    let xml = r#"<orders xmlns="urn:shop">
        <order id="1" priority="high"><item sku="A" qty="2"/><item sku="B" qty="1"/><note>rush</note></order>
        <order id="2"><item sku="C" qty="10"/><total>12.50</total></order>
    </orders>"#;
    let styles = [
        IndentationStyle::TwoSpaces,
        IndentationStyle::FourSpaces,
        IndentationStyle::OneTab,
    ];
    for style in styles {
        let to_xsd = || {
            convert(xml, ConversionDirection::XmlToSchema, style, &CancellationToken::new())
                .unwrap()
        };
        let (first, second) = (to_xsd(), to_xsd());
        assert!(first.succeeded);
        assert_eq!(first.text.as_bytes(), second.text.as_bytes());
    }
}

#[test]
fn test_inferred_schema_compiles() {
    let schema = xml_to_xsd(
        r#"<catalog><product id="p1"><name>Pen</name><price currency="EUR">1.20</price><tag>office</tag><tag>ink</tag></product></catalog>"#,
    );
    let sample = xsd_to_xml(&schema);
    assert!(sample.starts_with("<catalog>"), "{sample}");
    assert!(sample.contains(r#"<product id="sampleValue">"#), "{sample}");
    assert!(sample.contains("<name>sampleValue</name>"), "{sample}");
    assert!(sample.contains("<tag>sampleValue</tag>"), "{sample}");
}
