//! Compiled XML Schema model.
//!
//! [`compile_schema`] parses XSD text, one or more `xs:schema` documents, and
//! resolves it into a [`SchemaSet`]: global element declarations in document
//! order, with every element and type stored in arenas and addressed by
//! [`ElementId`] / [`TypeId`] so that recursive content models are
//! representable.
//!
//! ## Content model
//!
//! ```text
//! ElementDecl ──type──▶ TypeDefinition
//!                        ├─ Simple(SimpleType)
//!                        └─ Complex(ComplexType) ──content──▶ Particle
//!                                                   ├─ Element
//!                                                   ├─ Sequence(Vec<Particle>)
//!                                                   ├─ Choice(Vec<Particle>)
//!                                                   ├─ All(Vec<Particle>)
//!                                                   ├─ Any
//!                                                   └─ Empty
//! ```
//!
//! Only the common content-model shapes are modelled. Facets, identity
//! constraints, substitution groups and `import`/`include` resolution are
//! outside the model.

mod compile;
mod model;


pub use compile::compile_schema;
pub use model::{
    AttributeDecl, AttributeUse, ComplexType, ElementDecl, ElementId, MaxOccurs, Occurs,
    Particle, Schema, SchemaSet, SimpleType, TypeDefinition, TypeId,
};
