//! Formatting Policy: indentation choice to literal indent string.

use serde::{Deserialize, Serialize};

/// Indentation applied by the serializer at every nesting level.
///
/// The set is closed; persisted values outside it are rejected when the
/// settings are deserialized rather than mapped to a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndentationStyle {
    #[default]
    TwoSpaces,
    FourSpaces,
    OneTab,
}

impl IndentationStyle {
    /// Literal string written for one indent level.
    pub fn indent_chars(self) -> &'static str {
        match self {
            Self::TwoSpaces => "  ",
            Self::FourSpaces => "    ",
            Self::OneTab => "\t",
        }
    }

    /// Generate the indentation for the given depth.
    pub fn indent(self, level: usize) -> String {
        self.indent_chars().repeat(level)
    }
}
