#![allow(clippy::unwrap_used, clippy::expect_used)]

use rstest::rstest;
use tokio_util::sync::CancellationToken;
use xmlxsd::{ConversionDirection, ConversionResult, IndentationStyle, MAX_DEPTH, convert};

use crate::helpers::run;

#[rstest]
fn test_blank_input(
    #[values(ConversionDirection::XmlToSchema, ConversionDirection::SchemaToXml)]
    direction: ConversionDirection,
    #[values("", " ", "\n\t  \r\n")] input: &str,
) {
    assert_eq!(run(input, direction), ConversionResult::failure(""));
}

#[rstest]
#[case::unbalanced("<a><b></a>")]
#[case::unclosed("<a><b>")]
#[case::two_roots("<a/><b/>")]
#[case::text_only("just text")]
#[case::bad_prefix("<p:a/>")]
fn test_malformed_xml_has_diagnostic(#[case] input: &str) {
    let result = run(input, ConversionDirection::XmlToSchema);
    assert!(!result.succeeded);
    assert!(!result.text.trim().is_empty(), "no diagnostic for {input:?}");
}

#[rstest]
#[case::not_a_schema("<root/>")]
#[case::undeclared_type(
    r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"><xs:element name="a" type="Missing"/></xs:schema>"#
)]
#[case::malformed(r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">"#)]
fn test_invalid_schema_has_diagnostic(#[case] input: &str) {
    let result = run(input, ConversionDirection::SchemaToXml);
    assert!(!result.succeeded);
    assert!(!result.text.trim().is_empty());
}

#[test]
fn test_cancelled_conversion_yields_nothing() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = convert(
        "<root/>",
        ConversionDirection::XmlToSchema,
        IndentationStyle::TwoSpaces,
        &cancel,
    );
    assert_eq!(result, None);
}

#[rstest]
fn test_nesting_past_limit_has_diagnostic(
    #[values(ConversionDirection::XmlToSchema, ConversionDirection::SchemaToXml)]
    direction: ConversionDirection,
) {
    let depth = MAX_DEPTH + 1;
    let input = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
    let result = run(&input, direction);
    assert!(!result.succeeded);
    assert!(
        result.text.contains("nested deeper than the limit"),
        "{}",
        result.text
    );
}

#[test]
fn test_nesting_at_limit_converts() {
    let input = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
    assert!(run(&input, ConversionDirection::XmlToSchema).succeeded);
}

#[test]
fn test_deeply_nested_schema_has_diagnostic() {
    // Each level opens element, complexType and sequence.
    let levels = MAX_DEPTH / 3 + 1;
    let open = r#"<xs:element name="e"><xs:complexType><xs:sequence>"#.repeat(levels);
    let close = "</xs:sequence></xs:complexType></xs:element>".repeat(levels);
    let input = format!(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">{open}{close}</xs:schema>"#
    );
    let result = run(&input, ConversionDirection::SchemaToXml);
    assert!(!result.succeeded);
    assert!(
        result.text.contains("nested deeper than the limit"),
        "{}",
        result.text
    );
}
