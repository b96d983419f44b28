//! XSD schema to sample XML instance.
//!
//! The synthesizer walks the compiled schema's top-level element
//! declarations and expands each one recursively:
//!
//! - simple type: `<name>sampleValue</name>`
//! - complex type whose content is a sequence: every item in order;
//!   elements recurse, wildcards become `<anyElement>sampleValue</anyElement>`,
//!   choices are expanded according to [`ChoicePolicy`]
//! - any other content shape: an empty element
//!
//! Required attributes are written with their fixed or default value. A
//! complex type that is already being expanded further up the tree yields an
//! empty element, as does expansion past [`MAX_DEPTH`] levels.
//!
//! [`MAX_DEPTH`]: crate::xml::MAX_DEPTH

mod synth;


use tokio_util::sync::CancellationToken;

use crate::base::{
    ConversionDirection, ConversionResult, ConvertError, IndentationStyle, checkpoint,
};
use crate::schema::compile_schema;

pub use synth::{
    ChoicePolicy, PLACEHOLDER_VALUE, SampleContent, SampleElement, WILDCARD_ELEMENT, synthesize,
    write_sample,
};

/// Compile `input` as XSD and serialize a sample instance of it.
pub fn convert_to_xml(
    input: &str,
    indentation: IndentationStyle,
    policy: ChoicePolicy,
    cancel: &CancellationToken,
) -> ConversionResult {
    if input.trim().is_empty() {
        return ConversionResult::empty();
    }

    match sample_text(input, indentation, policy, cancel) {
        Ok(text) => ConversionResult::success(text),
        Err(ConvertError::Cancelled) => ConversionResult::empty(),
        Err(e) if e.is_user_facing() => ConversionResult::failure(e.to_string()),
        Err(e) => {
            tracing::error!(
                operation = ConversionDirection::SchemaToXml.operation_tag(),
                error = %e,
                "sample synthesis failed"
            );
            ConversionResult::empty()
        }
    }
}

fn sample_text(
    input: &str,
    indentation: IndentationStyle,
    policy: ChoicePolicy,
    cancel: &CancellationToken,
) -> Result<String, ConvertError> {
    let set = compile_schema(input, cancel)?;
    checkpoint(cancel)?;
    let roots = synthesize(&set, policy, cancel)?;
    checkpoint(cancel)?;
    write_sample(&roots, indentation)
}
