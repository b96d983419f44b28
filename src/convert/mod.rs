//! Conversion orchestrator.
//!
//! Dispatches on [`ConversionDirection`] and normalizes the adapter outcome:
//!
//! | adapter result              | token cancelled | outcome                      |
//! |-----------------------------|-----------------|------------------------------|
//! | success                     | -               | passed through               |
//! | failure with diagnostic     | -               | passed through               |
//! | failure, blank text         | yes             | `None` (dropped)             |
//! | failure, blank text         | no              | direction-specific message   |
//!
//! Blank input never reaches an adapter and yields an empty failed result.

use tokio_util::sync::CancellationToken;

use crate::base::{ConversionDirection, ConversionResult, IndentationStyle};
use crate::infer::convert_to_xsd;
use crate::sample::{ChoicePolicy, convert_to_xml};

/// Shown when XML input could not be turned into a schema.
pub const INVALID_XML_MESSAGE: &str = "Invalid XML";

/// Shown when XSD input could not be turned into a sample.
pub const INVALID_XSD_MESSAGE: &str = "Invalid XSD";

/// Formatting and synthesis options for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub indentation: IndentationStyle,
    pub choice_policy: ChoicePolicy,
}

impl ConvertOptions {
    pub fn new(indentation: IndentationStyle) -> Self {
        Self {
            indentation,
            ..Self::default()
        }
    }
}

/// Convert `input` in `direction`. `None` means the attempt was cancelled
/// and its result must not be shown.
pub fn convert(
    input: &str,
    direction: ConversionDirection,
    indentation: IndentationStyle,
    cancel: &CancellationToken,
) -> Option<ConversionResult> {
    convert_with(input, direction, &ConvertOptions::new(indentation), cancel)
}

pub fn convert_with(
    input: &str,
    direction: ConversionDirection,
    options: &ConvertOptions,
    cancel: &CancellationToken,
) -> Option<ConversionResult> {
    if input.trim().is_empty() {
        return Some(ConversionResult::empty());
    }

    let result = match direction {
        ConversionDirection::XmlToSchema => convert_to_xsd(input, options.indentation, cancel),
        ConversionDirection::SchemaToXml => {
            convert_to_xml(input, options.indentation, options.choice_policy, cancel)
        }
    };

    if !result.is_blank_failure() {
        return Some(result);
    }
    if cancel.is_cancelled() {
        tracing::trace!(operation = direction.operation_tag(), "conversion cancelled");
        return None;
    }

    Some(ConversionResult::failure(invalid_input_message(direction)))
}

/// Generic diagnostic for input that failed without a specific message.
pub fn invalid_input_message(direction: ConversionDirection) -> &'static str {
    match direction {
        ConversionDirection::XmlToSchema => INVALID_XML_MESSAGE,
        ConversionDirection::SchemaToXml => INVALID_XSD_MESSAGE,
    }
}
