//! Sample instance construction from a compiled [`SchemaSet`].

use quick_xml::events::BytesStart;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::base::{ConvertError, IndentationStyle, checkpoint};
use crate::schema::{
    AttributeDecl, AttributeUse, ComplexType, ElementId, Particle, SchemaSet, TypeDefinition,
    TypeId,
};
use crate::xml::{MAX_DEPTH, XmlWriter};

/// Text written for every simple value.
pub const PLACEHOLDER_VALUE: &str = "sampleValue";

/// Element written for a wildcard.
pub const WILDCARD_ELEMENT: &str = "anyElement";

/// How a `choice` nested in a sequence is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChoicePolicy {
    /// Every alternative, in order. Shows the complete shape but may not be a
    /// valid instance.
    #[default]
    AllAlternatives,
    /// Only the first alternative that produces an element.
    FirstAlternative,
}

/// One element of a synthesized instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: SampleContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleContent {
    Empty,
    Text(String),
    Children(Vec<SampleElement>),
}

impl SampleElement {
    fn wildcard() -> Self {
        Self {
            name: WILDCARD_ELEMENT.to_string(),
            attributes: Vec::new(),
            content: SampleContent::Text(PLACEHOLDER_VALUE.to_string()),
        }
    }

    fn write(&self, writer: &mut XmlWriter) -> Result<(), ConvertError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }
        match &self.content {
            SampleContent::Empty => writer.empty(start),
            SampleContent::Text(text) => writer.text_element(start, text),
            SampleContent::Children(children) => {
                writer.start(start)?;
                for child in children {
                    child.write(writer)?;
                }
                writer.end(&self.name)
            }
        }
    }
}

/// Build one sample element per top-level declaration, in schema order.
pub fn synthesize(
    set: &SchemaSet,
    policy: ChoicePolicy,
    cancel: &CancellationToken,
) -> Result<Vec<SampleElement>, ConvertError> {
    let mut synthesizer = Synthesizer {
        set,
        policy,
        cancel,
        active: Vec::new(),
    };
    let mut roots = Vec::new();
    for schema in set.schemas() {
        for id in &schema.elements {
            roots.push(synthesizer.element(*id, None)?);
        }
    }
    Ok(roots)
}

/// Serialize synthesized elements one after another.
pub fn write_sample(
    roots: &[SampleElement],
    indentation: IndentationStyle,
) -> Result<String, ConvertError> {
    let mut writer = XmlWriter::new(indentation);
    for root in roots {
        root.write(&mut writer)?;
    }
    writer.finish()
}

struct Synthesizer<'a> {
    set: &'a SchemaSet,
    policy: ChoicePolicy,
    cancel: &'a CancellationToken,
    /// Complex types currently being expanded, outermost first. Its length
    /// is the nesting depth of the element being built.
    active: Vec<TypeId>,
}

impl<'a> Synthesizer<'a> {
    fn element(
        &mut self,
        id: ElementId,
        scope: Option<&str>,
    ) -> Result<SampleElement, ConvertError> {
        checkpoint(self.cancel)?;

        let set = self.set;
        let decl = set.element(id);
        let namespace = decl.name.namespace();

        let mut attributes = Vec::new();
        if namespace != scope {
            attributes.push(("xmlns".to_string(), namespace.unwrap_or_default().to_string()));
        }

        let content = match set.type_definition(decl.type_id) {
            TypeDefinition::Simple(_) => SampleContent::Text(PLACEHOLDER_VALUE.to_string()),
            TypeDefinition::Complex(ty) => {
                attributes.extend(ty.attributes.iter().filter_map(required_attribute));
                if self.active.contains(&decl.type_id) {
                    tracing::trace!(element = %decl.name, "recursive type, writing empty element");
                    SampleContent::Empty
                } else if self.active.len() >= MAX_DEPTH {
                    tracing::debug!(
                        element = %decl.name,
                        "nesting limit reached, writing empty element"
                    );
                    SampleContent::Empty
                } else {
                    self.active.push(decl.type_id);
                    let children = self.complex_content(ty, namespace);
                    self.active.pop();
                    let children = children?;
                    if children.is_empty() {
                        SampleContent::Empty
                    } else {
                        SampleContent::Children(children)
                    }
                }
            }
        };

        Ok(SampleElement {
            name: decl.name.local.clone(),
            attributes,
            content,
        })
    }

    fn complex_content(
        &mut self,
        ty: &ComplexType,
        scope: Option<&str>,
    ) -> Result<Vec<SampleElement>, ConvertError> {
        let mut children = Vec::new();
        match &ty.content {
            Particle::Sequence { items, .. } => {
                for item in items {
                    self.sequence_item(item, scope, &mut children)?;
                }
            }
            // Only a top-level sequence is expanded; any other shape leaves
            // the element empty.
            Particle::Element { .. }
            | Particle::Choice { .. }
            | Particle::All { .. }
            | Particle::Any { .. }
            | Particle::Empty => {}
        }
        Ok(children)
    }

    fn sequence_item(
        &mut self,
        item: &Particle,
        scope: Option<&str>,
        out: &mut Vec<SampleElement>,
    ) -> Result<(), ConvertError> {
        match item {
            Particle::Element { element, .. } => out.push(self.element(*element, scope)?),
            Particle::Any { .. } => out.push(SampleElement::wildcard()),
            Particle::Choice { items, .. } => match self.policy {
                ChoicePolicy::AllAlternatives => {
                    for alternative in items {
                        self.alternative(alternative, scope, out)?;
                    }
                }
                ChoicePolicy::FirstAlternative => {
                    let first = items
                        .iter()
                        .find(|p| matches!(p, Particle::Element { .. } | Particle::Any { .. }));
                    if let Some(alternative) = first {
                        self.alternative(alternative, scope, out)?;
                    }
                }
            },
            Particle::Sequence { .. } | Particle::All { .. } | Particle::Empty => {}
        }
        Ok(())
    }

    fn alternative(
        &mut self,
        item: &Particle,
        scope: Option<&str>,
        out: &mut Vec<SampleElement>,
    ) -> Result<(), ConvertError> {
        match item {
            Particle::Element { element, .. } => out.push(self.element(*element, scope)?),
            Particle::Any { .. } => out.push(SampleElement::wildcard()),
            Particle::Sequence { .. }
            | Particle::Choice { .. }
            | Particle::All { .. }
            | Particle::Empty => {}
        }
        Ok(())
    }
}

/// `(name, value)` for an attribute that must appear.
fn required_attribute(attribute: &AttributeDecl) -> Option<(String, String)> {
    if attribute.usage != AttributeUse::Required {
        return None;
    }
    let value = attribute
        .fixed
        .as_deref()
        .or(attribute.default.as_deref())
        .unwrap_or(PLACEHOLDER_VALUE);
    Some((attribute.name.clone(), value.to_string()))
}
