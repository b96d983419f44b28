#![allow(clippy::unwrap_used, clippy::expect_used)]

use rstest::rstest;
use tokio_util::sync::CancellationToken;

use super::*;

fn xsd(input: &str) -> String {
    let result = convert_to_xsd(input, IndentationStyle::TwoSpaces, &CancellationToken::new());
    assert!(result.succeeded, "inference failed: {}", result.text);
    result.text
}

#[test]
fn test_simple_root() {
    let text = xsd("<root>5</root>");
    assert_eq!(
        text,
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<xs:schema attributeFormDefault=\"unqualified\" elementFormDefault=\"qualified\" ",
            "xmlns:xs=\"http://www.w3.org/2001/XMLSchema\">\n",
            "  <xs:element name=\"root\" type=\"xs:unsignedByte\"/>\n",
            "</xs:schema>"
        )
    );
}

#[test]
fn test_sequence_with_cardinalities() {
    let text = xsd(
        "<root>
           <item><name>a</name><tag>x</tag><tag>y</tag></item>
           <item><name>b</name></item>
         </root>",
    );
    assert!(text.contains(r#"<xs:element maxOccurs="unbounded" name="item">"#), "{text}");
    assert!(text.contains(r#"<xs:element name="name" type="xs:string"/>"#), "{text}");
    assert!(
        text.contains(r#"<xs:element minOccurs="0" maxOccurs="unbounded" name="tag" type="xs:string"/>"#),
        "{text}"
    );
    assert!(text.contains("<xs:sequence>"));
}

#[test]
fn test_new_child_keeps_document_order() {
    let text = xsd("<r><p><a/><c/></p><p><a/><b/><c/></p></r>");
    let a = text.find(r#"name="a""#).unwrap();
    let b = text.find(r#"name="b""#).unwrap();
    let c = text.find(r#"name="c""#).unwrap();
    assert!(a < b && b < c, "{text}");
    assert!(text.contains(r#"<xs:element minOccurs="0" name="b">"#), "{text}");
    assert!(!text.contains("xs:choice"));
}

#[test]
fn test_out_of_order_children_become_choice() {
    let text = xsd("<r><a/><b/><a/></r>");
    assert!(
        text.contains(r#"<xs:choice minOccurs="0" maxOccurs="unbounded">"#),
        "{text}"
    );
    assert!(!text.contains("xs:sequence"));
}

#[test]
fn test_attributes_and_simple_content() {
    let text = xsd(r#"<r><price currency="EUR">1.5</price><price>2</price></r>"#);
    assert!(text.contains("<xs:simpleContent>"), "{text}");
    assert!(text.contains(r#"<xs:extension base="xs:decimal">"#), "{text}");
    assert!(text.contains(r#"<xs:attribute name="currency" type="xs:string"/>"#), "{text}");
}

#[test]
fn test_required_attribute_and_xsi_ignored() {
    let text = xsd(
        r#"<r xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:noNamespaceSchemaLocation="r.xsd" id="1"/>"#,
    );
    assert!(
        text.contains(r#"<xs:attribute name="id" type="xs:unsignedByte" use="required"/>"#),
        "{text}"
    );
    assert!(!text.contains("noNamespaceSchemaLocation"));
}

#[test]
fn test_mixed_content() {
    let text = xsd("<p>Hello <b>world</b>!</p>");
    assert!(text.contains(r#"<xs:complexType mixed="true">"#), "{text}");
}

#[test]
fn test_empty_element_gets_empty_complex_type() {
    let text = xsd("<r><e/></r>");
    assert!(text.contains("<xs:element name=\"e\">\n          <xs:complexType/>"), "{text}");
}

#[test]
fn test_target_namespace() {
    let text = xsd(r#"<r xmlns="urn:test"><a>1</a></r>"#);
    assert!(
        text.contains(r#"<xs:schema xmlns="urn:test" attributeFormDefault="unqualified""#),
        "{text}"
    );
    assert!(text.contains(r#"targetNamespace="urn:test""#), "{text}");
}

#[test]
fn test_foreign_namespace_child_is_imported() {
    let text = xsd(r#"<r xmlns="urn:a" xmlns:b="urn:b"><b:x>1</b:x></r>"#);
    assert!(text.contains(r#"xmlns:q1="urn:b""#), "{text}");
    assert!(text.contains(r#"<xs:import namespace="urn:b"/>"#), "{text}");
    assert!(text.contains(r#"<xs:element ref="q1:x"/>"#), "{text}");
    assert_eq!(text.matches("<xs:schema").count(), 2);
    assert!(text.contains(r#"targetNamespace="urn:b""#));
}

#[rstest]
#[case::two(IndentationStyle::TwoSpaces, "\n  <xs:element")]
#[case::four(IndentationStyle::FourSpaces, "\n    <xs:element")]
#[case::tab(IndentationStyle::OneTab, "\n\t<xs:element")]
fn test_indentation_is_applied(#[case] style: IndentationStyle, #[case] expected: &str) {
    let result = convert_to_xsd("<root/>", style, &CancellationToken::new());
    assert!(result.text.contains(expected), "{}", result.text);
}

#[test]
fn test_output_is_deterministic() {
    let input = r#"<shop><item id="1"><n>a</n></item><item><n>b</n><p>2.5</p></item></shop>"#;
    assert_eq!(xsd(input), xsd(input));
}

#[rstest]
#[case("")]
#[case("   \n\t")]
fn test_blank_input(#[case] input: &str) {
    let result = convert_to_xsd(input, IndentationStyle::TwoSpaces, &CancellationToken::new());
    assert_eq!(result, ConversionResult::empty());
}

#[test]
fn test_malformed_input_reports_parser_message() {
    let result = convert_to_xsd(
        "<a><b></a>",
        IndentationStyle::TwoSpaces,
        &CancellationToken::new(),
    );
    assert!(!result.succeeded);
    assert!(!result.text.trim().is_empty());
}

#[test]
fn test_cancelled_is_blank_failure() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = convert_to_xsd("<root/>", IndentationStyle::TwoSpaces, &cancel);
    assert!(result.is_blank_failure());
}
