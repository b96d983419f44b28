//! XML instance to XSD schema inference.
//!
//! ```text
//! text ──XmlEventReader──▶ engine::infer ──▶ InferredSet ──emit──▶ XSD text
//! ```
//!
//! [`convert_to_xsd`] is the adapter the orchestrator calls. It never fails:
//! malformed XML is reported through the result text, cancellation and
//! unexpected failures produce an empty failed result.

mod emit;
mod engine;
mod types;

#[cfg(test)]
mod tests;

use tokio_util::sync::CancellationToken;

use crate::base::{
    ConversionDirection, ConversionResult, ConvertError, IndentationStyle, checkpoint,
};

pub use emit::write_schemas;
pub use engine::{AttributeShape, ChildUse, ElementShape, InferredSet, ShapeId, infer};
pub use types::{TypeSet, ValueType};

/// Infer a schema from `input` and serialize it with `indentation`.
pub fn convert_to_xsd(
    input: &str,
    indentation: IndentationStyle,
    cancel: &CancellationToken,
) -> ConversionResult {
    if input.trim().is_empty() {
        return ConversionResult::empty();
    }

    match infer_text(input, indentation, cancel) {
        Ok(text) => ConversionResult::success(text),
        Err(ConvertError::Cancelled) => ConversionResult::empty(),
        Err(e) if e.is_user_facing() => ConversionResult::failure(e.to_string()),
        Err(e) => {
            tracing::error!(
                operation = ConversionDirection::XmlToSchema.operation_tag(),
                error = %e,
                "schema inference failed"
            );
            ConversionResult::empty()
        }
    }
}

fn infer_text(
    input: &str,
    indentation: IndentationStyle,
    cancel: &CancellationToken,
) -> Result<String, ConvertError> {
    let set = infer(input, cancel)?;
    checkpoint(cancel)?;
    let text = write_schemas(&set, indentation, cancel)?;
    checkpoint(cancel)?;
    Ok(text)
}
