//! Serialization of an [`InferredSet`] as XSD text.

use indexmap::IndexMap;
use quick_xml::events::BytesStart;
use tokio_util::sync::CancellationToken;

use super::engine::{ChildUse, ElementShape, InferredSet, ShapeId};
use crate::base::{ConvertError, IndentationStyle, checkpoint};
use crate::xml::{QualifiedName, XSD_NAMESPACE, XmlWriter};

/// Write every schema of `set`, in order, after a single XML declaration.
pub fn write_schemas(
    set: &InferredSet,
    indentation: IndentationStyle,
    cancel: &CancellationToken,
) -> Result<String, ConvertError> {
    let mut writer = XmlWriter::new(indentation);
    writer.declaration()?;
    for (namespace, globals) in set.schemas() {
        checkpoint(cancel)?;
        SchemaWriter::new(set, namespace, globals).write(&mut writer, globals)?;
    }
    writer.finish()
}

struct SchemaWriter<'a> {
    set: &'a InferredSet,
    target_namespace: Option<&'a str>,
    /// Imported namespace -> prefix used for `ref`.
    imports: IndexMap<&'a str, String>,
}

impl<'a> SchemaWriter<'a> {
    fn new(set: &'a InferredSet, target_namespace: Option<&'a str>, globals: &[ShapeId]) -> Self {
        let mut writer = Self {
            set,
            target_namespace,
            imports: IndexMap::new(),
        };
        for id in globals {
            writer.collect_imports(*id);
        }
        writer
    }

    fn collect_imports(&mut self, id: ShapeId) {
        let set = self.set;
        for child in set.shape(id).children.values() {
            if !child.global {
                self.collect_imports(child.shape);
                continue;
            }
            let Some(namespace) = set.shape(child.shape).name.namespace() else {
                continue;
            };
            if Some(namespace) != self.target_namespace && !self.imports.contains_key(namespace) {
                let prefix = format!("q{}", self.imports.len() + 1);
                self.imports.insert(namespace, prefix);
            }
        }
    }

    fn write(&self, writer: &mut XmlWriter, globals: &[ShapeId]) -> Result<(), ConvertError> {
        let mut schema = BytesStart::new("xs:schema");
        if let Some(namespace) = self.target_namespace {
            schema.push_attribute(("xmlns", namespace));
        }
        schema.push_attribute(("attributeFormDefault", "unqualified"));
        schema.push_attribute(("elementFormDefault", "qualified"));
        if let Some(namespace) = self.target_namespace {
            schema.push_attribute(("targetNamespace", namespace));
        }
        schema.push_attribute(("xmlns:xs", XSD_NAMESPACE));
        for (namespace, prefix) in &self.imports {
            schema.push_attribute((format!("xmlns:{prefix}").as_str(), *namespace));
        }
        writer.start(schema)?;

        for namespace in self.imports.keys() {
            let mut import = BytesStart::new("xs:import");
            import.push_attribute(("namespace", *namespace));
            writer.empty(import)?;
        }
        for id in globals {
            self.write_element(writer, *id, None, false)?;
        }

        writer.end("xs:schema")
    }

    fn write_element(
        &self,
        writer: &mut XmlWriter,
        id: ShapeId,
        usage: Option<&ChildUse>,
        in_choice: bool,
    ) -> Result<(), ConvertError> {
        let shape = self.set.shape(id);
        let mut element = BytesStart::new("xs:element");

        if let Some(usage) = usage.filter(|_| !in_choice) {
            if usage.optional {
                element.push_attribute(("minOccurs", "0"));
            }
            if usage.repeated {
                element.push_attribute(("maxOccurs", "unbounded"));
            }
        }

        if usage.is_some_and(|usage| usage.global) {
            element.push_attribute(("ref", self.reference(&shape.name).as_str()));
            return writer.empty(element);
        }

        element.push_attribute(("name", shape.name.local.as_str()));
        if usage.is_some() && shape.name.namespace.is_none() && self.target_namespace.is_some() {
            element.push_attribute(("form", "unqualified"));
        }

        if is_simple(shape) {
            element.push_attribute(("type", shape.values.narrowest().xsd_name()));
            return writer.empty(element);
        }

        writer.start(element)?;
        self.write_complex_type(writer, shape)?;
        writer.end("xs:element")
    }

    fn write_complex_type(
        &self,
        writer: &mut XmlWriter,
        shape: &ElementShape,
    ) -> Result<(), ConvertError> {
        let mut complex = BytesStart::new("xs:complexType");

        if shape.children.is_empty() {
            if !shape.has_text {
                if shape.attributes.is_empty() {
                    return writer.empty(complex);
                }
                writer.start(complex)?;
                self.write_attributes(writer, shape)?;
                return writer.end("xs:complexType");
            }

            writer.start(complex)?;
            writer.start(BytesStart::new("xs:simpleContent"))?;
            let mut extension = BytesStart::new("xs:extension");
            extension.push_attribute(("base", shape.values.narrowest().xsd_name()));
            writer.start(extension)?;
            self.write_attributes(writer, shape)?;
            writer.end("xs:extension")?;
            writer.end("xs:simpleContent")?;
            return writer.end("xs:complexType");
        }

        if shape.has_text {
            complex.push_attribute(("mixed", "true"));
        }
        writer.start(complex)?;

        if shape.ordered {
            writer.start(BytesStart::new("xs:sequence"))?;
        } else {
            let mut choice = BytesStart::new("xs:choice");
            choice.push_attribute(("minOccurs", "0"));
            choice.push_attribute(("maxOccurs", "unbounded"));
            writer.start(choice)?;
        }
        for child in shape.children.values() {
            self.write_element(writer, child.shape, Some(child), !shape.ordered)?;
        }
        writer.end(if shape.ordered { "xs:sequence" } else { "xs:choice" })?;

        self.write_attributes(writer, shape)?;
        writer.end("xs:complexType")
    }

    fn write_attributes(
        &self,
        writer: &mut XmlWriter,
        shape: &ElementShape,
    ) -> Result<(), ConvertError> {
        for (name, attribute) in &shape.attributes {
            let mut decl = BytesStart::new("xs:attribute");
            decl.push_attribute(("name", name.as_str()));
            decl.push_attribute(("type", attribute.values.narrowest().xsd_name()));
            if attribute.seen >= shape.instances {
                decl.push_attribute(("use", "required"));
            }
            writer.empty(decl)?;
        }
        Ok(())
    }

    fn reference(&self, name: &QualifiedName) -> String {
        match name.namespace() {
            Some(namespace) if Some(namespace) != self.target_namespace => {
                match self.imports.get(namespace) {
                    Some(prefix) => format!("{prefix}:{}", name.local),
                    None => name.local.clone(),
                }
            }
            _ => name.local.clone(),
        }
    }
}

/// Text-only element without attributes: declared with a `type` attribute.
fn is_simple(shape: &ElementShape) -> bool {
    shape.children.is_empty() && shape.attributes.is_empty() && shape.has_text
}
