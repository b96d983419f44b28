//! Conversion direction and the content-type labels it implies.

use serde::{Deserialize, Serialize};

/// Selects which algorithm the orchestrator invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversionDirection {
    /// Infer a schema from an XML instance.
    #[default]
    XmlToSchema,
    /// Synthesize a sample instance from an XSD schema.
    SchemaToXml,
}

impl ConversionDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::XmlToSchema => Self::SchemaToXml,
            Self::SchemaToXml => Self::XmlToSchema,
        }
    }

    /// Label declared on the input surface for this direction.
    pub fn input_language(self) -> SurfaceLanguage {
        match self {
            Self::XmlToSchema => SurfaceLanguage::Xml,
            Self::SchemaToXml => SurfaceLanguage::Xsd,
        }
    }

    /// Label declared on the output surface for this direction.
    pub fn output_language(self) -> SurfaceLanguage {
        self.input_language().swapped()
    }

    /// Operation tag used when reporting unexpected failures.
    pub fn operation_tag(self) -> &'static str {
        match self {
            Self::XmlToSchema => "Xml to Xsd Converter",
            Self::SchemaToXml => "Xsd to Xml Converter",
        }
    }
}

/// Sub-language label of a text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLanguage {
    #[default]
    Xml,
    Xsd,
}

impl SurfaceLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Xsd => "xsd",
        }
    }

    fn swapped(self) -> Self {
        match self {
            Self::Xml => Self::Xsd,
            Self::Xsd => Self::Xml,
        }
    }
}
