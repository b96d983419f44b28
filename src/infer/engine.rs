//! Structural inference over a single document.
//!
//! The document is streamed once. Every element position gets an
//! [`ElementShape`] that accumulates what its instances looked like:
//!
//! ```text
//! <root>            shape(root)
//!   <item id="1">     └─ child item  (ordered, repeated)
//!     <name/>             └─ child name
//!   </item>
//!   <item/>           attribute id: seen 1 of 2 instances => optional
//! </root>
//! ```
//!
//! Shapes live in one arena. Local children are owned by exactly one parent
//! shape, so the local structure is a tree; elements that switch namespace
//! are global and may be shared.

use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use super::types::TypeSet;
use crate::base::ConvertError;
use crate::xml::{QualifiedName, StartTag, XSI_NAMESPACE, XmlEvent, XmlEventReader};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeId(usize);

/// Everything learned about one element position.
#[derive(Debug, Clone)]
pub struct ElementShape {
    pub name: QualifiedName,
    pub instances: u32,
    pub attributes: IndexMap<String, AttributeShape>,
    /// Children in content order.
    pub children: IndexMap<QualifiedName, ChildUse>,
    /// False once instances disagreed on child order.
    pub ordered: bool,
    pub has_text: bool,
    pub values: TypeSet,
}

#[derive(Debug, Clone, Copy)]
pub struct ChildUse {
    pub shape: ShapeId,
    pub optional: bool,
    pub repeated: bool,
    /// Declared at top level of its own namespace and referenced.
    pub global: bool,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeShape {
    pub seen: u32,
    pub values: TypeSet,
}

/// Inferred schemas: one per namespace, in order of first appearance.
#[derive(Debug, Default)]
pub struct InferredSet {
    shapes: Vec<ElementShape>,
    schemas: IndexMap<Option<String>, Vec<ShapeId>>,
    globals: IndexMap<QualifiedName, ShapeId>,
}

impl InferredSet {
    pub fn shape(&self, id: ShapeId) -> &ElementShape {
        &self.shapes[id.0]
    }

    /// `(target namespace, global element shapes)` per schema.
    pub fn schemas(&self) -> impl Iterator<Item = (Option<&str>, &[ShapeId])> {
        self.schemas
            .iter()
            .map(|(ns, globals)| (ns.as_deref(), globals.as_slice()))
    }

    fn global(&mut self, name: &QualifiedName) -> ShapeId {
        if let Some(id) = self.globals.get(name) {
            return *id;
        }
        let id = self.new_shape(name.clone());
        self.globals.insert(name.clone(), id);
        self.schemas.entry(name.namespace.clone()).or_default().push(id);
        id
    }

    fn new_shape(&mut self, name: QualifiedName) -> ShapeId {
        self.shapes.push(ElementShape {
            name,
            instances: 0,
            attributes: IndexMap::new(),
            children: IndexMap::new(),
            ordered: true,
            has_text: false,
            values: TypeSet::default(),
        });
        ShapeId(self.shapes.len() - 1)
    }
}

/// Per-instance bookkeeping for an open element.
struct Frame {
    shape: ShapeId,
    /// Child names in order, consecutive repeats collapsed into a count.
    runs: Vec<(QualifiedName, u32)>,
    text: String,
}

/// Infer schemas describing `text`.
pub fn infer(text: &str, cancel: &CancellationToken) -> Result<InferredSet, ConvertError> {
    let mut reader = XmlEventReader::new(text, cancel);
    let mut set = InferredSet::default();
    let mut frames: Vec<Frame> = Vec::new();

    while let Some(event) = reader.next_event()? {
        match event {
            XmlEvent::Start(tag) => {
                let shape = open_instance(&mut set, &mut frames, &tag);
                record_attributes(&mut set.shapes[shape.0], &tag);
                frames.push(Frame {
                    shape,
                    runs: Vec::new(),
                    text: String::new(),
                });
            }
            XmlEvent::Text(text) => {
                if let Some(frame) = frames.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            XmlEvent::End => {
                let frame = frames
                    .pop()
                    .ok_or_else(|| ConvertError::internal("end event without open element"))?;
                close_instance(&mut set.shapes[frame.shape.0], frame);
            }
        }
    }

    tracing::debug!(
        schemas = set.schemas.len(),
        shapes = set.shapes.len(),
        "inferred schema set"
    );
    Ok(set)
}

/// Find or create the shape for a new element instance and count it.
fn open_instance(set: &mut InferredSet, frames: &mut [Frame], tag: &StartTag) -> ShapeId {
    let Some(parent) = frames.last_mut() else {
        let id = set.global(&tag.name);
        set.shapes[id.0].instances += 1;
        return id;
    };

    let existing = set.shapes[parent.shape.0]
        .children
        .get(&tag.name)
        .map(|child| child.shape);

    let id = match existing {
        Some(id) => id,
        None => {
            let parent_shape = &set.shapes[parent.shape.0];
            let global = tag.name.namespace.is_some()
                && tag.name.namespace != parent_shape.name.namespace;
            // A child first seen after the parent's first instance was absent before.
            let optional = parent_shape.instances > 1;
            // Insert right after the previous sibling of this instance.
            let position = parent
                .runs
                .last()
                .and_then(|(previous, _)| parent_shape.children.get_index_of(previous))
                .map_or(0, |index| index + 1);

            let id = if global {
                set.global(&tag.name)
            } else {
                set.new_shape(tag.name.clone())
            };
            set.shapes[parent.shape.0].children.shift_insert(
                position,
                tag.name.clone(),
                ChildUse {
                    shape: id,
                    optional,
                    repeated: false,
                    global,
                },
            );
            id
        }
    };

    match parent.runs.last_mut() {
        Some((previous, count)) if *previous == tag.name => *count += 1,
        _ => parent.runs.push((tag.name.clone(), 1)),
    }

    set.shapes[id.0].instances += 1;
    id
}

fn record_attributes(shape: &mut ElementShape, tag: &StartTag) {
    for attribute in &tag.attributes {
        if attribute.name.namespace() == Some(XSI_NAMESPACE) {
            continue;
        }
        let entry = shape
            .attributes
            .entry(attribute.name.local.clone())
            .or_default();
        entry.seen += 1;
        entry.values.observe(&attribute.value);
    }
}

/// Fold one finished instance into its shape.
fn close_instance(shape: &mut ElementShape, frame: Frame) {
    let mut previous_index = None;
    for (position, (name, count)) in frame.runs.iter().enumerate() {
        let repeated_run = frame.runs[..position].iter().any(|(earlier, _)| earlier == name);
        let index = shape.children.get_index_of(name);

        if let Some(child) = shape.children.get_mut(name) {
            if *count > 1 || repeated_run {
                child.repeated = true;
            }
        }
        match (previous_index, index) {
            (Some(previous), Some(current)) if current <= previous => shape.ordered = false,
            _ => {}
        }
        if repeated_run {
            shape.ordered = false;
        }
        previous_index = index.or(previous_index);
    }

    for (name, child) in shape.children.iter_mut() {
        if !frame.runs.iter().any(|(seen, _)| seen == name) {
            child.optional = true;
        }
    }

    let text = frame.text.trim();
    if !text.is_empty() {
        shape.has_text = true;
        shape.values.observe(text);
    } else if frame.runs.is_empty() {
        // An empty instance only fits a string-typed value.
        shape.values.observe("");
    }
}
