//! XSD text to [`SchemaSet`].
//!
//! Compilation runs in two passes over the schema documents. The first pass
//! reserves arena slots for every global element and named type and records
//! model group and attribute group definitions, keyed by expanded name. The
//! second pass compiles the global elements in document order, resolving
//! named types on first use.
//! A named type that is referenced while it is still being compiled simply
//! hands out its reserved [`TypeId`], which is what makes recursive content
//! models work.

use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

use super::model::*;
use crate::base::{ConvertError, checkpoint};
use crate::xml::{MAX_DEPTH, QualifiedName, XSD_NAMESPACE, XmlElement, parse_fragment};

/// Built-in simple types of XML Schema 1.0 plus the 1.1 duration/stamp types.
const BUILTIN_SIMPLE_TYPES: &[&str] = &[
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NMTOKEN",
    "NMTOKENS",
    "boolean",
    "decimal",
    "integer",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
    "float",
    "double",
    "duration",
    "dayTimeDuration",
    "yearMonthDuration",
    "dateTime",
    "dateTimeStamp",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "hexBinary",
    "base64Binary",
    "anyURI",
    "QName",
    "NOTATION",
];

/// Parse and compile XSD text.
///
/// The text may hold several `xs:schema` documents one after another, as
/// written for instances that span namespaces. Each document becomes one
/// [`Schema`] of the set, and QName references resolve across all of them.
///
/// Malformed XML surfaces as [`ConvertError::Xml`]; a well-formed document
/// that is not a usable schema surfaces as [`ConvertError::Schema`].
pub fn compile_schema(text: &str, cancel: &CancellationToken) -> Result<SchemaSet, ConvertError> {
    let roots = parse_fragment(text, cancel)?;
    checkpoint(cancel)?;

    let mut compiler = Compiler::new(cancel);
    for root in &roots {
        compiler.collect_globals(root)?;
    }
    compiler.compile()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    InProgress,
    Done,
}

/// Settings of one schema document that shape the names declared in it.
struct SchemaContext {
    target_namespace: Option<String>,
    qualified_locals: bool,
    elements: Vec<ElementId>,
}

/// A top-level definition and the document that declares it.
#[derive(Clone, Copy)]
struct Global<'a> {
    node: &'a XmlElement,
    schema: usize,
}

struct NamedType<'a> {
    definition: Global<'a>,
    id: TypeId,
    complex: bool,
    state: State,
}

struct Compiler<'a> {
    cancel: &'a CancellationToken,
    schemas: Vec<SchemaContext>,
    /// Index in `schemas` of the document whose components are compiled.
    current: usize,
    global_elements: FxHashMap<QualifiedName, ElementId>,
    global_order: Vec<(ElementId, Global<'a>)>,
    named_types: FxHashMap<QualifiedName, NamedType<'a>>,
    named_type_order: Vec<QualifiedName>,
    groups: FxHashMap<QualifiedName, Global<'a>>,
    attribute_groups: FxHashMap<QualifiedName, Global<'a>>,
    global_attributes: FxHashMap<QualifiedName, Global<'a>>,
    /// Local declarations by source node. A group that reaches itself
    /// through an element shares that element's declaration.
    local_elements: FxHashMap<*const XmlElement, ElementId>,
    builtin_types: FxHashMap<String, TypeId>,
    any_type: Option<TypeId>,
    /// Group and attribute group names being expanded, for cycle detection.
    /// Cleared at element boundaries.
    expanding: Vec<String>,
    /// Component nesting depth. Only unwound on success; any error ends
    /// compilation.
    depth: usize,
    elements: Vec<Option<ElementDecl>>,
    types: Vec<Option<TypeDefinition>>,
}

impl<'a> Compiler<'a> {
    fn new(cancel: &'a CancellationToken) -> Self {
        Self {
            cancel,
            schemas: Vec::new(),
            current: 0,
            global_elements: FxHashMap::default(),
            global_order: Vec::new(),
            named_types: FxHashMap::default(),
            named_type_order: Vec::new(),
            groups: FxHashMap::default(),
            attribute_groups: FxHashMap::default(),
            global_attributes: FxHashMap::default(),
            local_elements: FxHashMap::default(),
            builtin_types: FxHashMap::default(),
            any_type: None,
            expanding: Vec::new(),
            depth: 0,
            elements: Vec::new(),
            types: Vec::new(),
        }
    }

    // ── Pass 1: global declarations ─────────────────────────────────

    fn collect_globals(&mut self, root: &'a XmlElement) -> Result<(), ConvertError> {
        if !root.is(XSD_NAMESPACE, "schema") {
            return Err(ConvertError::schema(format!(
                "The root element of a W3C XML Schema should be <schema> and its namespace \
                 should be '{XSD_NAMESPACE}'."
            )));
        }

        let schema = self.schemas.len();
        self.schemas.push(SchemaContext {
            target_namespace: root
                .attribute("targetNamespace")
                .filter(|ns| !ns.is_empty())
                .map(str::to_string),
            qualified_locals: root.attribute("elementFormDefault") == Some("qualified"),
            elements: Vec::new(),
        });

        for child in root.child_elements() {
            if child.name.namespace() != Some(XSD_NAMESPACE) {
                return Err(not_supported(child));
            }
            let global = Global {
                node: child,
                schema,
            };
            match child.name.local.as_str() {
                "element" => {
                    let name = self.declared_name(schema, child)?;
                    if self.global_elements.contains_key(&name) {
                        return Err(ConvertError::schema(format!(
                            "The global element '{name}' has already been declared."
                        )));
                    }
                    let id = ElementId(self.elements.len());
                    self.elements.push(None);
                    self.global_elements.insert(name, id);
                    self.global_order.push((id, global));
                    self.schemas[schema].elements.push(id);
                }
                kind @ ("complexType" | "simpleType") => {
                    let name = self.declared_name(schema, child)?;
                    if self.named_types.contains_key(&name) {
                        return Err(ConvertError::schema(format!(
                            "The type '{name}' has already been declared."
                        )));
                    }
                    let id = TypeId(self.types.len());
                    self.types.push(None);
                    self.named_types.insert(
                        name.clone(),
                        NamedType {
                            definition: global,
                            id,
                            complex: kind == "complexType",
                            state: State::Pending,
                        },
                    );
                    self.named_type_order.push(name);
                }
                "group" => {
                    let name = self.declared_name(schema, child)?;
                    if self.groups.contains_key(&name) {
                        return Err(ConvertError::schema(format!(
                            "The group '{name}' has already been declared."
                        )));
                    }
                    self.groups.insert(name, global);
                }
                "attributeGroup" => {
                    let name = self.declared_name(schema, child)?;
                    if self.attribute_groups.contains_key(&name) {
                        return Err(ConvertError::schema(format!(
                            "The attributeGroup '{name}' has already been declared."
                        )));
                    }
                    self.attribute_groups.insert(name, global);
                }
                "attribute" => {
                    let name = self.declared_name(schema, child)?;
                    self.global_attributes.insert(name, global);
                }
                "annotation" | "import" | "include" | "redefine" | "override" | "notation" => {}
                _ => return Err(not_supported(child)),
            }
        }
        Ok(())
    }

    // ── Pass 2: compilation ─────────────────────────────────────────

    fn compile(mut self) -> Result<SchemaSet, ConvertError> {
        for (id, global) in std::mem::take(&mut self.global_order) {
            checkpoint(self.cancel)?;
            let decl = self.in_schema(global.schema, |c| c.element_decl(global.node, true))?;
            self.elements[id.0] = Some(decl);
        }

        // Unreferenced named types are still validated.
        for name in std::mem::take(&mut self.named_type_order) {
            self.resolve_named_type(&name)?;
        }

        let elements = self
            .elements
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ConvertError::internal("unfilled element slot after compilation"))?;
        let types = self
            .types
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ConvertError::internal("unfilled type slot after compilation"))?;

        Ok(SchemaSet {
            schemas: self
                .schemas
                .into_iter()
                .map(|context| Schema {
                    target_namespace: context.target_namespace,
                    elements: context.elements,
                })
                .collect(),
            elements,
            types,
        })
    }

    fn element_decl(
        &mut self,
        node: &'a XmlElement,
        global: bool,
    ) -> Result<ElementDecl, ConvertError> {
        let local = required_name(node)?;
        let context = self.context();
        let qualified = global
            || match node.attribute("form") {
                Some(form) => form == "qualified",
                None => context.qualified_locals,
            };
        let name = if qualified {
            QualifiedName::new(context.target_namespace.clone(), local)
        } else {
            QualifiedName::local(local)
        };

        let expanding = std::mem::take(&mut self.expanding);
        let type_id = self.element_type(node)?;
        self.expanding = expanding;

        Ok(ElementDecl { name, type_id })
    }

    fn element_type(&mut self, node: &'a XmlElement) -> Result<TypeId, ConvertError> {
        let inline = node
            .child_elements()
            .find(|c| c.is(XSD_NAMESPACE, "complexType") || c.is(XSD_NAMESPACE, "simpleType"));

        match (node.attribute("type"), inline) {
            (Some(_), Some(_)) => Err(ConvertError::schema(
                "The type attribute cannot be present with either simpleType or complexType.",
            )),
            (Some(type_name), None) => self.type_reference(node, type_name),
            (None, Some(inline)) => {
                let definition = if inline.name.local == "complexType" {
                    TypeDefinition::Complex(self.complex_type(inline, None)?)
                } else {
                    TypeDefinition::Simple(self.simple_type(inline, None)?)
                };
                Ok(self.push_type(definition))
            }
            (None, None) => Ok(self.any_type_id()),
        }
    }

    // ── Types ────────────────────────────────────────────────────────

    fn type_reference(&mut self, node: &XmlElement, value: &str) -> Result<TypeId, ConvertError> {
        let qname = self.resolve_qname(node, value)?;

        if qname.namespace() == Some(XSD_NAMESPACE) {
            if qname.local == "anyType" {
                return Ok(self.any_type_id());
            }
            if BUILTIN_SIMPLE_TYPES.contains(&qname.local.as_str()) {
                return Ok(self.builtin_type_id(&qname.local));
            }
        } else if let Some(id) = self.resolve_named_type(&qname)? {
            return Ok(id);
        }

        Err(ConvertError::schema(format!("Type '{qname}' is not declared.")))
    }

    fn resolve_named_type(&mut self, name: &QualifiedName) -> Result<Option<TypeId>, ConvertError> {
        let Some(entry) = self.named_types.get_mut(name) else {
            return Ok(None);
        };
        let (id, definition, complex) = (entry.id, entry.definition, entry.complex);
        if entry.state != State::Pending {
            return Ok(Some(id));
        }
        entry.state = State::InProgress;

        let type_name = Some(name.clone());
        let compiled = self.in_schema(definition.schema, |c| {
            if complex {
                c.complex_type(definition.node, type_name)
                    .map(TypeDefinition::Complex)
            } else {
                c.simple_type(definition.node, type_name)
                    .map(TypeDefinition::Simple)
            }
        })?;
        self.types[id.0] = Some(compiled);

        if let Some(entry) = self.named_types.get_mut(name) {
            entry.state = State::Done;
        }
        Ok(Some(id))
    }

    /// A fully compiled base type, as needed by derivation.
    fn base_definition(&mut self, node: &XmlElement) -> Result<TypeDefinition, ConvertError> {
        let base = node
            .attribute("base")
            .ok_or_else(|| ConvertError::schema("The required attribute 'base' is missing."))?;
        let id = self.type_reference(node, base)?;
        self.types[id.0].clone().ok_or_else(|| {
            ConvertError::schema(format!(
                "Circular type derivation involving '{}'.",
                base.trim()
            ))
        })
    }

    fn complex_type(
        &mut self,
        node: &'a XmlElement,
        name: Option<QualifiedName>,
    ) -> Result<ComplexType, ConvertError> {
        self.enter()?;
        let mut ty = ComplexType {
            name,
            content: Particle::Empty,
            attributes: Vec::new(),
            mixed: is_true(node.attribute("mixed")),
            simple_content: None,
        };

        for child in xsd_children(node)? {
            match child.name.local.as_str() {
                "sequence" | "choice" | "all" | "group" => {
                    if !ty.content.is_empty() {
                        return Err(ConvertError::schema(
                            "A complex type can only have one content particle.",
                        ));
                    }
                    ty.content = self.particle(child)?;
                }
                "attribute" | "attributeGroup" | "anyAttribute" => {
                    self.attribute_use(child, &mut ty.attributes)?;
                }
                "simpleContent" => self.simple_content(child, &mut ty)?,
                "complexContent" => self.complex_content(child, &mut ty)?,
                "annotation" | "assert" | "openContent" => {}
                _ => return Err(not_supported(child)),
            }
        }

        self.leave();
        Ok(ty)
    }

    fn simple_content(
        &mut self,
        node: &'a XmlElement,
        ty: &mut ComplexType,
    ) -> Result<(), ConvertError> {
        let derivation = derivation_child(node)?;
        let value_type = match self.base_definition(derivation)? {
            TypeDefinition::Simple(simple) => simple,
            TypeDefinition::Complex(base) => {
                let Some(simple) = base.simple_content else {
                    return Err(ConvertError::schema(
                        "The base type of simpleContent must be a simple type or a complex type \
                         with simple content.",
                    ));
                };
                ty.attributes.extend(base.attributes);
                simple
            }
        };
        ty.simple_content = Some(value_type);

        for child in xsd_children(derivation)? {
            if matches!(
                child.name.local.as_str(),
                "attribute" | "attributeGroup" | "anyAttribute"
            ) {
                self.attribute_use(child, &mut ty.attributes)?;
            }
        }
        Ok(())
    }

    fn complex_content(
        &mut self,
        node: &'a XmlElement,
        ty: &mut ComplexType,
    ) -> Result<(), ConvertError> {
        if let Some(mixed) = node.attribute("mixed") {
            ty.mixed = is_true(Some(mixed));
        }
        let derivation = derivation_child(node)?;
        let extension = derivation.name.local == "extension";

        let base = match self.base_definition(derivation)? {
            TypeDefinition::Complex(base) => base,
            TypeDefinition::Simple(_) => {
                return Err(ConvertError::schema(
                    "The base type of complexContent must be a complex type.",
                ));
            }
        };
        ty.attributes.extend(base.attributes);

        let mut own = Particle::Empty;
        for child in xsd_children(derivation)? {
            match child.name.local.as_str() {
                "sequence" | "choice" | "all" | "group" => own = self.particle(child)?,
                "attribute" | "attributeGroup" | "anyAttribute" => {
                    self.attribute_use(child, &mut ty.attributes)?;
                }
                _ => {}
            }
        }

        ty.content = if extension {
            merge_extension(base.content, own)
        } else {
            own
        };
        Ok(())
    }

    fn simple_type(
        &mut self,
        node: &XmlElement,
        name: Option<QualifiedName>,
    ) -> Result<SimpleType, ConvertError> {
        self.enter()?;
        let mut value_type = QualifiedName::new(Some(XSD_NAMESPACE.to_string()), "anySimpleType");
        for child in xsd_children(node)? {
            match child.name.local.as_str() {
                "restriction" => {
                    if child.attribute("base").is_some() {
                        match self.base_definition(child)? {
                            TypeDefinition::Simple(base) => value_type = base.name,
                            TypeDefinition::Complex(_) => {
                                return Err(ConvertError::schema(
                                    "A simple type cannot restrict a complex type.",
                                ));
                            }
                        }
                    } else if let Some(inner) = child
                        .child_elements()
                        .find(|c| c.is(XSD_NAMESPACE, "simpleType"))
                    {
                        value_type = self.simple_type(inner, None)?.name;
                    }
                }
                "list" | "union" => {
                    value_type = QualifiedName::new(Some(XSD_NAMESPACE.to_string()), "string");
                }
                _ => {}
            }
        }
        self.leave();
        Ok(SimpleType {
            name: name.unwrap_or(value_type),
        })
    }

    fn any_type_id(&mut self) -> TypeId {
        if let Some(id) = self.any_type {
            return id;
        }
        let id = self.push_type(TypeDefinition::Complex(ComplexType::any_type()));
        self.any_type = Some(id);
        id
    }

    fn builtin_type_id(&mut self, local: &str) -> TypeId {
        if let Some(id) = self.builtin_types.get(local) {
            return *id;
        }
        let id = self.push_type(TypeDefinition::Simple(SimpleType {
            name: QualifiedName::new(Some(XSD_NAMESPACE.to_string()), local),
        }));
        self.builtin_types.insert(local.to_string(), id);
        id
    }

    fn push_type(&mut self, definition: TypeDefinition) -> TypeId {
        self.types.push(Some(definition));
        TypeId(self.types.len() - 1)
    }

    // ── Particles ────────────────────────────────────────────────────

    fn particle(&mut self, node: &'a XmlElement) -> Result<Particle, ConvertError> {
        self.enter()?;
        let occurs = occurs(node)?;
        let particle = match node.name.local.as_str() {
            "element" => self.local_element(node, occurs)?,
            "any" => Particle::Any { occurs },
            "sequence" => {
                let items = self.group_items(node, |p| match p {
                    Particle::Sequence { items, occurs } if *occurs == Occurs::ONCE => Some(items),
                    _ => None,
                })?;
                Particle::Sequence { items, occurs }
            }
            "choice" => {
                let items = self.group_items(node, |p| match p {
                    Particle::Choice { items, occurs } if *occurs == Occurs::ONCE => Some(items),
                    _ => None,
                })?;
                Particle::Choice { items, occurs }
            }
            "all" => {
                let items = self.group_items(node, |_| None)?;
                Particle::All { items, occurs }
            }
            "group" => self.group_reference(node, occurs)?,
            _ => return Err(not_supported(node)),
        };
        self.leave();
        Ok(particle)
    }

    /// Compile the children of a model group. Empty children are dropped and
    /// nested groups of the same kind occurring exactly once are spliced in.
    fn group_items(
        &mut self,
        node: &'a XmlElement,
        splice: impl Fn(&mut Particle) -> Option<&mut Vec<Particle>>,
    ) -> Result<Vec<Particle>, ConvertError> {
        let mut items = Vec::new();
        for child in xsd_children(node)? {
            if child.name.local == "annotation" {
                continue;
            }
            let mut particle = self.particle(child)?;
            if particle.is_empty() {
                continue;
            }
            if let Some(nested) = splice(&mut particle) {
                items.append(nested);
                continue;
            }
            items.push(particle);
        }
        Ok(items)
    }

    fn local_element(
        &mut self,
        node: &'a XmlElement,
        occurs: Occurs,
    ) -> Result<Particle, ConvertError> {
        if let Some(reference) = node.attribute("ref") {
            let qname = self.resolve_qname(node, reference)?;
            return match self.global_elements.get(&qname) {
                Some(element) => Ok(Particle::Element {
                    element: *element,
                    occurs,
                }),
                None => Err(ConvertError::schema(format!(
                    "The '{qname}' element is not declared."
                ))),
            };
        }

        let key = std::ptr::from_ref(node);
        if let Some(element) = self.local_elements.get(&key) {
            return Ok(Particle::Element {
                element: *element,
                occurs,
            });
        }
        let id = ElementId(self.elements.len());
        self.elements.push(None);
        self.local_elements.insert(key, id);

        let decl = self.element_decl(node, false)?;
        self.elements[id.0] = Some(decl);
        Ok(Particle::Element {
            element: id,
            occurs,
        })
    }

    fn group_reference(
        &mut self,
        node: &'a XmlElement,
        occurs: Occurs,
    ) -> Result<Particle, ConvertError> {
        let reference = node
            .attribute("ref")
            .ok_or_else(|| ConvertError::schema("The required attribute 'ref' is missing."))?;
        let qname = self.resolve_qname(node, reference)?;
        let definition = self.groups.get(&qname).copied().ok_or_else(|| {
            ConvertError::schema(format!("Reference to undeclared model group '{qname}'."))
        })?;

        let key = format!("group:{qname}");
        if self.expanding.contains(&key) {
            return Err(ConvertError::schema(format!(
                "Circular group reference to '{qname}'."
            )));
        }
        self.expanding.push(key);
        let particle = self.in_schema(definition.schema, |c| {
            let mut particle = Particle::Empty;
            for child in xsd_children(definition.node)? {
                if matches!(child.name.local.as_str(), "sequence" | "choice" | "all") {
                    particle = c.particle(child)?;
                }
            }
            Ok(particle)
        })?;
        self.expanding.pop();

        if occurs == Occurs::ONCE || particle.is_empty() {
            return Ok(particle);
        }
        Ok(match particle {
            Particle::Sequence { items, occurs: inner } if inner == Occurs::ONCE => {
                Particle::Sequence { items, occurs }
            }
            Particle::Choice { items, occurs: inner } if inner == Occurs::ONCE => {
                Particle::Choice { items, occurs }
            }
            other => Particle::Sequence {
                items: vec![other],
                occurs,
            },
        })
    }

    // ── Attributes ───────────────────────────────────────────────────

    fn attribute_use(
        &mut self,
        node: &'a XmlElement,
        out: &mut Vec<AttributeDecl>,
    ) -> Result<(), ConvertError> {
        self.enter()?;
        match node.name.local.as_str() {
            "attribute" => {
                let decl = self.attribute(node)?;
                out.retain(|existing| existing.name != decl.name);
                if decl.usage != AttributeUse::Prohibited {
                    out.push(decl);
                }
            }
            "attributeGroup" => {
                let reference = node.attribute("ref").ok_or_else(|| {
                    ConvertError::schema("The required attribute 'ref' is missing.")
                })?;
                let qname = self.resolve_qname(node, reference)?;
                let group = self.attribute_groups.get(&qname).copied().ok_or_else(|| {
                    ConvertError::schema(format!(
                        "Reference to undeclared attribute group '{qname}'."
                    ))
                })?;

                let key = format!("attributeGroup:{qname}");
                if self.expanding.contains(&key) {
                    return Err(ConvertError::schema(format!(
                        "Circular attribute group reference to '{qname}'."
                    )));
                }
                self.expanding.push(key);
                self.in_schema(group.schema, |c| {
                    for child in xsd_children(group.node)? {
                        c.attribute_use(child, out)?;
                    }
                    Ok(())
                })?;
                self.expanding.pop();
            }
            // Wildcards and annotations add no concrete attribute
            _ => {}
        }
        self.leave();
        Ok(())
    }

    fn attribute(&mut self, node: &XmlElement) -> Result<AttributeDecl, ConvertError> {
        let usage = match node.attribute("use").map(str::trim) {
            None | Some("optional") => AttributeUse::Optional,
            Some("required") => AttributeUse::Required,
            Some("prohibited") => AttributeUse::Prohibited,
            Some(other) => {
                return Err(ConvertError::schema(format!(
                    "The value '{other}' is invalid for attribute 'use'."
                )));
            }
        };

        let (name, mut default, mut fixed) = match node.attribute("ref") {
            Some(reference) => {
                let qname = self.resolve_qname(node, reference)?;
                let global = self.global_attributes.get(&qname).copied().ok_or_else(|| {
                    ConvertError::schema(format!("The '{qname}' attribute is not declared."))
                })?;
                (
                    qname.local.clone(),
                    global.node.attribute("default").map(str::to_string),
                    global.node.attribute("fixed").map(str::to_string),
                )
            }
            None => (required_name(node)?.to_string(), None, None),
        };
        if let Some(value) = node.attribute("default") {
            default = Some(value.to_string());
        }
        if let Some(value) = node.attribute("fixed") {
            fixed = Some(value.to_string());
        }

        Ok(AttributeDecl {
            name,
            usage,
            default,
            fixed,
        })
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn context(&self) -> &SchemaContext {
        &self.schemas[self.current]
    }

    /// Run `f` with `schema` as the current document.
    fn in_schema<T>(
        &mut self,
        schema: usize,
        f: impl FnOnce(&mut Self) -> Result<T, ConvertError>,
    ) -> Result<T, ConvertError> {
        let outer = std::mem::replace(&mut self.current, schema);
        let result = f(self);
        self.current = outer;
        result
    }

    fn enter(&mut self) -> Result<(), ConvertError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ConvertError::schema(format!(
                "Schema components are nested deeper than the limit of {MAX_DEPTH}."
            )));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn resolve_qname(&self, node: &XmlElement, value: &str) -> Result<QualifiedName, ConvertError> {
        node.resolve_qname(value).ok_or_else(|| {
            let prefix = value.split(':').next().unwrap_or_default();
            ConvertError::schema(format!("'{prefix}' is an undeclared prefix."))
        })
    }

    /// Expanded name of a top-level definition in `schema`.
    fn declared_name(
        &self,
        schema: usize,
        node: &XmlElement,
    ) -> Result<QualifiedName, ConvertError> {
        let local = required_name(node)?;
        Ok(QualifiedName::new(
            self.schemas[schema].target_namespace.clone(),
            local,
        ))
    }
}

/// Base content followed by extension content, as one sequence where possible.
fn merge_extension(base: Particle, extension: Particle) -> Particle {
    if base.is_empty() {
        return extension;
    }
    if extension.is_empty() {
        return base;
    }
    match (base, extension) {
        (
            Particle::Sequence {
                items: mut head,
                occurs: Occurs::ONCE,
            },
            Particle::Sequence {
                items: tail,
                occurs: Occurs::ONCE,
            },
        ) => {
            head.extend(tail);
            Particle::Sequence {
                items: head,
                occurs: Occurs::ONCE,
            }
        }
        (base, extension) => Particle::Sequence {
            items: vec![base, extension],
            occurs: Occurs::ONCE,
        },
    }
}

fn occurs(node: &XmlElement) -> Result<Occurs, ConvertError> {
    let min = match node.attribute("minOccurs").map(str::trim) {
        None => 1,
        Some(value) => value.parse::<u32>().map_err(|_| {
            ConvertError::schema(format!("'{value}' is an invalid value for minOccurs."))
        })?,
    };
    let max = match node.attribute("maxOccurs").map(str::trim) {
        None => MaxOccurs::Bounded(1),
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(value) => MaxOccurs::Bounded(value.parse::<u32>().map_err(|_| {
            ConvertError::schema(format!("'{value}' is an invalid value for maxOccurs."))
        })?),
    };
    if let MaxOccurs::Bounded(max) = max {
        if min > max {
            return Err(ConvertError::schema(
                "minOccurs value cannot be greater than maxOccurs value.",
            ));
        }
    }
    Ok(Occurs::new(min, max))
}

fn derivation_child(node: &XmlElement) -> Result<&XmlElement, ConvertError> {
    node.child_elements()
        .find(|c| c.is(XSD_NAMESPACE, "extension") || c.is(XSD_NAMESPACE, "restriction"))
        .ok_or_else(|| {
            ConvertError::schema(format!(
                "The {} element must contain an extension or restriction.",
                node.name.local
            ))
        })
}

/// Children of a schema component, all of which must be XSD elements.
fn xsd_children(node: &XmlElement) -> Result<Vec<&XmlElement>, ConvertError> {
    node.child_elements()
        .map(|child| {
            if child.name.namespace() == Some(XSD_NAMESPACE) {
                Ok(child)
            } else {
                Err(not_supported(child))
            }
        })
        .collect()
}

fn required_name(node: &XmlElement) -> Result<&str, ConvertError> {
    node.attribute("name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ConvertError::schema("The required attribute 'name' is missing."))
}

fn not_supported(node: &XmlElement) -> ConvertError {
    ConvertError::schema(format!(
        "The '{}' element is not supported in this context.",
        node.name
    ))
}

fn is_true(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true" | "1"))
}
