//! In-memory mirror of the host page.
//!
//! The engine reads attributes and writes classes, inline styles, attributes
//! and text through [`Document`]. Every effective write is appended to a
//! journal of [`Change`]s that the engine hands back to the host.
//!
//! Nodes live in an arena indexed by [`ElementId`]; they are never freed,
//! only detached.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{OnviewError, Result};
use crate::ids::{ElementId, IdAllocator};
use crate::outputs::Change;

#[derive(Clone, Debug, Default)]
struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: Vec<String>,
    style: IndexMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Declarative description of an element subtree, as sent by a host.
///
/// ```json
/// { "tag": "ul", "attrs": { "data-ani-stagger": "100" },
///   "children": [ { "tag": "li", "attrs": { "data-ani": "" } } ] }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(alias = "attributes")]
    pub attrs: IndexMap<String, String>,
    /// Space-separated class list.
    pub class: String,
    pub text: String,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a subtree from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OnviewError::TreeParse(e.to_string()))
    }
}

/// Arena-backed element tree with a change journal.
#[derive(Debug)]
pub struct Document {
    ids: IdAllocator,
    nodes: Vec<Node>,
    root: ElementId,
    journal: Vec<Change>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document whose root plays the role of `document`.
    pub fn new() -> Self {
        let mut doc = Self {
            ids: IdAllocator::new(),
            nodes: Vec::new(),
            root: ElementId(0),
            journal: Vec::new(),
        };
        doc.root = doc.create_element("#document");
        doc
    }

    #[inline]
    pub fn root(&self) -> ElementId {
        self.root
    }

    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        (id.0 as usize) < self.nodes.len()
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = self.ids.alloc_element();
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.contains(parent) {
            return Err(OnviewError::UnknownElement(parent));
        }
        if !self.contains(child) {
            return Err(OnviewError::UnknownElement(child));
        }
        self.detach(child);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `id` from its parent. The node and its subtree stay addressable.
    pub fn detach(&mut self, id: ElementId) {
        let parent = self.node(id).and_then(|n| n.parent);
        if let Some(parent) = parent {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Build `spec` under `parent` without journaling (the host already has it).
    pub fn insert(&mut self, parent: ElementId, spec: &ElementSpec) -> Result<ElementId> {
        if !self.contains(parent) {
            return Err(OnviewError::UnknownElement(parent));
        }
        let id = self.create_element(&spec.tag);
        if let Some(node) = self.node_mut(id) {
            node.attributes = spec.attrs.clone();
            node.classes = spec.class.split_whitespace().map(str::to_string).collect();
            node.text = spec.text.clone();
        }
        self.append_child(parent, id)?;
        for child in &spec.children {
            self.insert(id, child)?;
        }
        Ok(id)
    }

    /// Insert `spec` directly under the root.
    pub fn mount(&mut self, spec: &ElementSpec) -> Result<ElementId> {
        self.insert(self.root, spec)
    }

    pub fn tag(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|n| n.tag.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }


    /// All descendants of `root` in document order, excluding `root` itself.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Descendants of `root` (document order) matching `pred`.
    pub fn select(
        &self,
        root: ElementId,
        pred: impl Fn(&Self, ElementId) -> bool,
    ) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| pred(self, *id))
            .collect()
    }

    /// First descendant of `root` carrying `class`.
    pub fn first_with_class(&self, root: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    /// Connected element whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.attribute(*id, "id") == Some(value))
    }

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    #[inline]
    pub fn has_attribute(&self, id: ElementId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.attributes.get(name).map(String::as_str) == Some(value) {
            return;
        }
        node.attributes.insert(name.to_string(), value.to_string());
        self.journal.push(Change::SetAttribute {
            element: id,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.node(id)
            .map(|n| n.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn classes(&self, id: ElementId) -> &[String] {
        self.node(id).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    /// Add `class`; no journal entry if it is already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.classes.iter().any(|c| c == class) {
            return;
        }
        node.classes.push(class.to_string());
        self.journal.push(Change::AddClass {
            element: id,
            class: class.to_string(),
        });
    }

    /// Remove `class`; no journal entry if it was absent.
    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() == before {
            return;
        }
        self.journal.push(Change::RemoveClass {
            element: id,
            class: class.to_string(),
        });
    }

    /// Flip `class`, returning whether it is now present.
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.style.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.style.get(property).map(String::as_str) == Some(value) {
            return;
        }
        node.style.insert(property.to_string(), value.to_string());
        self.journal.push(Change::SetStyle {
            element: id,
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    pub fn text(&self, id: ElementId) -> &str {
        self.node(id).map(|n| n.text.as_str()).unwrap_or("")
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.text == text {
            return;
        }
        node.text = text.to_string();
        self.journal.push(Change::SetText {
            element: id,
            text: text.to_string(),
        });
    }

    /// Append a change that did not originate from a node write (watcher
    /// subscriptions), keeping it ordered with the node writes around it.
    pub fn record(&mut self, change: Change) {
        self.journal.push(change);
    }

    /// Take every change journaled since the last drain.
    pub fn drain_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.journal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, ElementId) {
        let mut doc = Document::new();
        let spec = ElementSpec::new("section")
            .attr("id", "intro")
            .class("hero  dark")
            .child(ElementSpec::new("h2").text("Hello"))
            .child(ElementSpec::new("ul").child(ElementSpec::new("li")));
        let section = doc.mount(&spec).unwrap();
        (doc, section)
    }

    #[test]
    fn insert_builds_document_order() {
        let (doc, section) = sample();
        let tags: Vec<_> = doc
            .descendants(doc.root())
            .into_iter()
            .map(|id| doc.tag(id).unwrap().to_string())
            .collect();
        assert_eq!(tags, ["section", "h2", "ul", "li"]);
        assert_eq!(doc.classes(section), ["hero", "dark"]);
        assert_eq!(doc.element_by_id("intro"), Some(section));
    }

    #[test]
    fn writes_journal_only_effective_changes() {
        let (mut doc, section) = sample();
        assert!(doc.drain_changes().is_empty());
        doc.add_class(section, "hero");
        doc.add_class(section, "is-inview");
        doc.remove_class(section, "missing");
        doc.set_style(section, "--ani-delay", "0ms");
        doc.set_style(section, "--ani-delay", "0ms");
        let changes = doc.drain_changes();
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], Change::AddClass { class, .. } if class == "is-inview"));
    }

    #[test]
    fn detach_disconnects_subtree() {
        let (mut doc, section) = sample();
        let li = doc.descendants(section)[2];
        let root = doc.root();
        assert!(doc.descendants(root).contains(&li));
        doc.detach(section);
        assert!(!doc.descendants(root).contains(&li));
        assert_eq!(doc.element_by_id("intro"), None);
        assert_eq!(doc.parent(li).map(|p| doc.tag(p).unwrap()), Some("ul"));
    }

    #[test]
    fn unknown_parent_is_an_error() {
        let mut doc = Document::new();
        let err = doc.insert(ElementId(99), &ElementSpec::new("div")).unwrap_err();
        assert_eq!(err, OnviewError::UnknownElement(ElementId(99)));
    }
}
