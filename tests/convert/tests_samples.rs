#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::helpers::{compact, xsd_to_xml};

#[test]
fn test_two_required_children() {
    let sample = xsd_to_xml(
        r#"<?xml version="1.0" encoding="utf-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="root">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="a" type="xs:string"/>
        <xs:element name="b" type="xs:string"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#,
    );
    assert_eq!(compact(&sample), "<root><a>sampleValue</a><b>sampleValue</b></root>");
}

#[test]
fn test_wildcard_position() {
    let sample = xsd_to_xml(
        r###"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <xsd:element name="envelope">
    <xsd:complexType>
      <xsd:sequence>
        <xsd:element name="header" type="xsd:string"/>
        <xsd:any namespace="##other" processContents="lax" minOccurs="0"/>
        <xsd:element name="footer" type="xsd:string"/>
      </xsd:sequence>
    </xsd:complexType>
  </xsd:element>
</xsd:schema>"###,
    );
    assert_eq!(
        compact(&sample),
        "<envelope><header>sampleValue</header><anyElement>sampleValue</anyElement><footer>sampleValue</footer></envelope>"
    );
    assert_eq!(sample.matches("<anyElement>sampleValue</anyElement>").count(), 1);
}

#[test]
fn test_extension_and_groups() {
    let sample = xsd_to_xml(
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns="urn:po" targetNamespace="urn:po" elementFormDefault="qualified">
  <xs:group name="Address">
    <xs:sequence>
      <xs:element name="street" type="xs:string"/>
      <xs:element name="city" type="xs:string"/>
    </xs:sequence>
  </xs:group>
  <xs:complexType name="Party">
    <xs:sequence>
      <xs:element name="name" type="xs:string"/>
    </xs:sequence>
  </xs:complexType>
  <xs:complexType name="Customer">
    <xs:complexContent>
      <xs:extension base="Party">
        <xs:sequence>
          <xs:group ref="Address"/>
        </xs:sequence>
      </xs:extension>
    </xs:complexContent>
  </xs:complexType>
  <xs:element name="customer" type="Customer"/>
</xs:schema>"#,
    );
    assert_eq!(
        compact(&sample),
        r#"<customer xmlns="urn:po"><name>sampleValue</name><street>sampleValue</street><city>sampleValue</city></customer>"#
    );
}
