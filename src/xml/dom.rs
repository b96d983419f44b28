//! Element tree built from [`XmlEventReader`] events.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{QualifiedName, XmlAttribute, XmlEvent, XmlEventReader};
use crate::base::ConvertError;

/// Prefix bindings in scope at an element (`""` is the default namespace).
type Scope = Arc<Vec<(String, String)>>;

#[derive(Debug, Clone)]
pub struct XmlElement {
    pub name: QualifiedName,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
    scope: Scope,
}

#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// Parse a sequence of top-level elements into element trees, such as
/// several schema documents written one after another.
pub fn parse_fragment(
    text: &str,
    cancel: &CancellationToken,
) -> Result<Vec<XmlElement>, ConvertError> {
    let mut reader = XmlEventReader::fragment(text, cancel);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut roots = Vec::new();

    while let Some(event) = reader.next_event()? {
        match event {
            XmlEvent::Start(tag) => {
                let parent_scope = stack
                    .last()
                    .map(|parent| parent.scope.clone())
                    .unwrap_or_default();
                let scope = if tag.namespaces.is_empty() {
                    parent_scope
                } else {
                    let mut bindings = parent_scope.as_ref().clone();
                    bindings.extend(tag.namespaces);
                    Arc::new(bindings)
                };
                stack.push(XmlElement {
                    name: tag.name,
                    attributes: tag.attributes,
                    children: Vec::new(),
                    scope,
                });
            }
            XmlEvent::End => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ConvertError::internal("end event without open element"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Element(element)),
                    None => roots.push(element),
                }
            }
            XmlEvent::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlNode::Text(text));
                }
            }
        }
    }

    Ok(roots)
}

impl XmlElement {
    /// True if this element is `local` in namespace `ns`.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.name.is(ns, local)
    }

    /// Value of an unqualified attribute.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated character data of direct children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    /// Namespace bound to `prefix` at this element (`""` for the default).
    pub fn lookup_namespace(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some("http://www.w3.org/XML/1998/namespace");
        }
        self.scope
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Resolve a QName-valued attribute such as `type="xs:string"`.
    ///
    /// Returns `None` when the prefix is not bound at this element.
    pub fn resolve_qname(&self, value: &str) -> Option<QualifiedName> {
        let value = value.trim();
        match value.split_once(':') {
            Some((prefix, local)) => {
                let ns = self.lookup_namespace(prefix)?;
                Some(QualifiedName::new(Some(ns.to_string()), local))
            }
            None => {
                let ns = self.lookup_namespace("").map(str::to_string);
                Some(QualifiedName::new(ns, value))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> XmlElement {
        let mut roots = parse_fragment(text, &CancellationToken::new()).expect("parse failed");
        assert_eq!(roots.len(), 1);
        roots.remove(0)
    }

    #[test]
    fn test_builds_nested_tree() {
        let root = parse("<a><b>one</b><c/>tail</a>");
        assert_eq!(root.name.local, "a");
        let children: Vec<_> = root.child_elements().map(|e| e.name.local.as_str()).collect();
        assert_eq!(children, vec!["b", "c"]);
        assert_eq!(root.text(), "tail");
    }

    #[test]
    fn test_resolve_qname_uses_inherited_scope() {
        let root = parse(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns="urn:t">
                 <xs:element name="a" type="xs:string"/>
                 <xs:element name="b" type="local"/>
               </xs:schema>"#,
        );
        let elements: Vec<_> = root.child_elements().collect();
        let a_type = elements[0].resolve_qname("xs:string").unwrap();
        assert!(a_type.is(crate::xml::XSD_NAMESPACE, "string"));

        let b_type = elements[1].resolve_qname("local").unwrap();
        assert_eq!(b_type.namespace(), Some("urn:t"));
        assert!(elements[1].resolve_qname("nope:x").is_none());
    }

    #[test]
    fn test_fragment_roots_keep_their_own_scope() {
        let roots = parse_fragment(
            r#"<?xml version="1.0"?><a xmlns="urn:one" xmlns:p="urn:p"/><b/>"#,
            &CancellationToken::new(),
        )
        .unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].lookup_namespace("p"), Some("urn:p"));
        assert_eq!(roots[1].name, QualifiedName::local("b"));
        assert_eq!(roots[1].lookup_namespace("p"), None);
    }

    #[test]
    fn test_attribute_lookup_ignores_qualified() {
        let root = parse(r#"<a xmlns:p="urn:p" p:name="q" name="plain"/>"#);
        assert_eq!(root.attribute("name"), Some("plain"));
    }
}
