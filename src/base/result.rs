//! Uniform outcome of one conversion attempt.

/// Text produced by a conversion plus whether it succeeded.
///
/// A failed result may still carry a diagnostic (for example a parser
/// message), or be empty when there was nothing to convert.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversionResult {
    pub text: String,
    pub succeeded: bool,
}

impl ConversionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: true,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: false,
        }
    }

    /// Failed result with no diagnostic.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the result failed without any diagnostic text.
    pub fn is_blank_failure(&self) -> bool {
        !self.succeeded && self.text.trim().is_empty()
    }
}
