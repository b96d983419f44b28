//! Foundation types for the converter.
//!
//! This module provides the value types every other layer speaks:
//! - [`ConversionDirection`] - which algorithm a conversion runs
//! - [`IndentationStyle`] - the Formatting Policy (indent literal per level)
//! - [`ConversionResult`] - uniform outcome of one conversion attempt
//! - [`ConvertError`] - internal failure taxonomy
//! - [`checkpoint`] - cooperative cancellation check
//!
//! This module has NO dependencies on other xmlxsd modules.

mod cancel;
mod direction;
mod error;
mod indentation;
mod result;

pub use cancel::checkpoint;
pub use direction::{ConversionDirection, SurfaceLanguage};
pub use error::ConvertError;
pub use indentation::IndentationStyle;
pub use result::ConversionResult;
