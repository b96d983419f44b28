//! Schema set, declarations and content particles.

use crate::xml::QualifiedName;

/// Index of an element declaration in [`SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) usize);

/// Index of a type definition in [`SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) usize);

/// A compiled set of schemas sharing one declaration arena.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    pub(crate) schemas: Vec<Schema>,
    pub(crate) elements: Vec<ElementDecl>,
    pub(crate) types: Vec<TypeDefinition>,
}

/// One schema document of a set.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub target_namespace: Option<String>,
    /// Top-level element declarations in document order.
    pub elements: Vec<ElementId>,
}

#[derive(Debug, Clone)]
pub struct ElementDecl {
    pub name: QualifiedName,
    pub type_id: TypeId,
}

#[derive(Debug, Clone)]
pub enum TypeDefinition {
    Simple(SimpleType),
    Complex(ComplexType),
}

/// A simple type, identified by its name or, for anonymous types, by the
/// built-in type it ultimately restricts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleType {
    pub name: QualifiedName,
}

#[derive(Debug, Clone)]
pub struct ComplexType {
    pub name: Option<QualifiedName>,
    pub content: Particle,
    pub attributes: Vec<AttributeDecl>,
    pub mixed: bool,
    /// Value type for `simpleContent`; such types have no particle.
    pub simple_content: Option<SimpleType>,
}

impl ComplexType {
    /// The ur-type `xs:anyType`: any attributes, any content.
    pub fn any_type() -> Self {
        Self {
            name: Some(QualifiedName::new(
                Some(crate::xml::XSD_NAMESPACE.to_string()),
                "anyType",
            )),
            content: Particle::Sequence {
                items: vec![Particle::Any {
                    occurs: Occurs::new(0, MaxOccurs::Unbounded),
                }],
                occurs: Occurs::ONCE,
            },
            attributes: Vec::new(),
            mixed: true,
            simple_content: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: String,
    pub usage: AttributeUse,
    pub default: Option<String>,
    pub fixed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    #[default]
    Optional,
    Required,
    Prohibited,
}

/// Content particle of a complex type.
#[derive(Debug, Clone)]
pub enum Particle {
    Element { element: ElementId, occurs: Occurs },
    Sequence { items: Vec<Particle>, occurs: Occurs },
    Choice { items: Vec<Particle>, occurs: Occurs },
    All { items: Vec<Particle>, occurs: Occurs },
    /// Wildcard (`xs:any`).
    Any { occurs: Occurs },
    /// No content.
    Empty,
}

impl Particle {
    pub fn occurs(&self) -> Occurs {
        match self {
            Self::Element { occurs, .. }
            | Self::Sequence { occurs, .. }
            | Self::Choice { occurs, .. }
            | Self::All { occurs, .. }
            | Self::Any { occurs } => *occurs,
            Self::Empty => Occurs::ONCE,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Sequence { items, .. } | Self::Choice { items, .. } | Self::All { items, .. } => {
                items.is_empty()
            }
            Self::Element { .. } | Self::Any { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

impl Occurs {
    pub const ONCE: Self = Self {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::ONCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl SchemaSet {
    /// Schemas in the order they were added.
    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }

    pub fn element(&self, id: ElementId) -> &ElementDecl {
        &self.elements[id.0]
    }

    pub fn type_definition(&self, id: TypeId) -> &TypeDefinition {
        &self.types[id.0]
    }

    /// Type of an element declaration.
    pub fn element_type(&self, id: ElementId) -> &TypeDefinition {
        self.type_definition(self.element(id).type_id)
    }

    /// Top-level declarations across all schemas, in order.
    pub fn global_elements(&self) -> impl Iterator<Item = (&Schema, &ElementDecl)> {
        self.schemas.iter().flat_map(move |schema| {
            schema
                .elements
                .iter()
                .map(move |id| (schema, self.element(*id)))
        })
    }
}
