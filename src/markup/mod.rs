//! Document model - the pre-rendered markup widgets attach to
//!
//! Elements live in an arena and are addressed by `ElementId`. Widgets never
//! mutate elements directly: they describe the wanted state as `ViewPatch`es
//! and the page applies them through `Document::apply`.

pub mod csv;

use crate::error::MarkupError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Handle to an element inside a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

/// A single element of the document
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<ElementId>,
    pub parent: Option<ElementId>,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }
}

/// Serialized form of an element tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Space separated class list
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_children(mut self, children: Vec<ElementSpec>) -> Self {
        self.children = children;
        self
    }
}

/// A style-state change produced by a widget's render step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPatch {
    /// Add (`on`) or remove a class
    Class {
        element: ElementId,
        class: String,
        on: bool,
    },
    /// Re-append `children` to `parent` in this order
    Reorder {
        parent: ElementId,
        children: Vec<ElementId>,
    },
}

impl ViewPatch {
    pub fn class(element: ElementId, class: &str, on: bool) -> Self {
        ViewPatch::Class {
            element,
            class: class.to_string(),
            on,
        }
    }
}

/// Arena of elements rooted at a single element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: ElementId,
}

impl Document {
    pub fn from_spec(spec: ElementSpec) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: ElementId(0),
        };
        doc.root = doc.insert(spec, None);
        doc
    }

    pub fn from_json(text: &str) -> Result<Self, MarkupError> {
        let spec: ElementSpec = serde_json::from_str(text)
            .map_err(|e| MarkupError::InvalidDocument(e.to_string()))?;
        Ok(Self::from_spec(spec))
    }

    fn insert(&mut self, spec: ElementSpec, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Element {
            tag: spec.tag,
            id: spec.id,
            classes: spec.class.split_whitespace().map(str::to_string).collect(),
            attrs: spec.attrs,
            text: spec.text,
            children: Vec::new(),
            parent,
        });
        for child in spec.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.nodes[id.0]
    }

    pub fn text(&self, id: ElementId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.nodes[id.0].attr(name)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.nodes[id.0].has_class(class)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.0].children
    }

    /// Current value of a form field
    pub fn value(&self, id: ElementId) -> &str {
        self.attr(id, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        self.nodes[id.0]
            .attrs
            .insert("value".to_string(), value.to_string());
    }

    /// All descendants of `scope` (excluding `scope`) in document order
    pub fn descendants(&self, scope: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn query_class(&self, scope: ElementId, class: &str) -> Vec<ElementId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn first_class(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    pub fn first_class_attr(
        &self,
        scope: ElementId,
        class: &str,
        attr: &str,
        value: &str,
    ) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.has_class(*id, class) && self.attr(*id, attr) == Some(value))
    }

    /// Every element in the document carrying `attr == value`
    pub fn query_attr(&self, attr: &str, value: &str) -> Vec<ElementId> {
        let mut all = vec![self.root];
        all.extend(self.descendants(self.root));
        all.into_iter()
            .filter(|id| self.attr(*id, attr) == Some(value))
            .collect()
    }

    pub fn first_tag(&self, scope: ElementId, tag: &str) -> Option<ElementId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.get(*id).tag == tag)
    }

    /// Whether `node` is `ancestor` or lies inside it
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Apply patches, returning how many actually changed something
    pub fn apply(&mut self, patches: &[ViewPatch]) -> usize {
        let mut changed = 0;
        for patch in patches {
            match patch {
                ViewPatch::Class { element, class, on } => {
                    let classes = &mut self.nodes[element.0].classes;
                    let effective = if *on {
                        classes.insert(class.clone())
                    } else {
                        classes.remove(class)
                    };
                    if effective {
                        changed += 1;
                    }
                }
                ViewPatch::Reorder { parent, children } => {
                    if self.reorder(*parent, children) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Move `order` to the end of `parent`'s children, keeping other children in front
    fn reorder(&mut self, parent: ElementId, order: &[ElementId]) -> bool {
        let current = self.nodes[parent.0].children.clone();
        let mut next: Vec<ElementId> = current
            .iter()
            .copied()
            .filter(|c| !order.contains(c))
            .collect();
        next.extend_from_slice(order);
        for child in order {
            if let Some(old) = self.nodes[child.0].parent.filter(|p| *p != parent) {
                self.nodes[old.0].children.retain(|c| c != child);
            }
            self.nodes[child.0].parent = Some(parent);
        }
        if next == current {
            return false;
        }
        self.nodes[parent.0].children = next;
        true
    }
}
