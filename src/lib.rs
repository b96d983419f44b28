//! # xmlxsd-base
//!
//! XML to XSD schema inference and XSD to sample XML synthesis, behind a
//! cancellable single-flight conversion pipeline.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! pipeline  → single-flight controller, text surfaces
//!   ↓
//! settings  → persisted direction / indentation / choice policy
//!   ↓
//! convert   → direction dispatch, outcome normalization
//!   ↓
//! infer     → XML instance → XSD (inference engine + writer)
//! sample    → XSD → sample XML instance
//!   ↓
//! schema    → XSD compilation into element/type arenas
//!   ↓
//! xml       → streaming reader, element tree, indenting writer
//!   ↓
//! base      → direction, indentation, result, errors, cancellation
//! ```

// ============================================================================
// MODULES (dependency order: base → xml → schema → infer/sample → convert → settings → pipeline)
// ============================================================================

/// Foundation types: direction, indentation, result, errors
pub mod base;

/// XML primitives over quick-xml
pub mod xml;

/// XSD compilation: schema set, declarations, content particles
pub mod schema;

/// Schema inference from an XML instance
pub mod infer;

/// Sample instance synthesis from a schema
pub mod sample;

/// Conversion orchestrator
pub mod convert;

/// Persisted converter settings
pub mod settings;

/// Single-flight conversion pipeline
pub mod pipeline;

// Re-export the conversion surface
pub use base::{ConversionDirection, ConversionResult, ConvertError, IndentationStyle};
pub use convert::{
    ConvertOptions, INVALID_XML_MESSAGE, INVALID_XSD_MESSAGE, convert, convert_with,
};
pub use pipeline::{ConversionPipeline, DataKind, MemorySurface, TextSurface};
pub use sample::ChoicePolicy;
pub use settings::{ConverterSettings, JsonSettingsStore, MemorySettingsStore, SettingsStore};
pub use xml::MAX_DEPTH;
