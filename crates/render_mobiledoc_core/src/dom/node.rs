//! Shared element, text and fragment handles.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// One node in a rendered tree.
#[derive(Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        super::html::write_node(&mut out, self);
        out
    }
}

impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(element) => element.fmt(f),
            Self::Text(text) => write!(f, "Text({text:?})"),
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

struct ElementData {
    tag_name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

/// Shared handle to one element node.
///
/// Equality is identity: two handles are equal only when they alias the same
/// node.
#[derive(Clone)]
pub struct Element {
    inner: Rc<RefCell<ElementData>>,
}

impl Element {
    /// Allocates a detached element. Only `DomHelper` implementations call this.
    pub(crate) fn detached(tag_name: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ElementData {
                tag_name: tag_name.to_ascii_lowercase(),
                attributes: Vec::new(),
                children: Vec::new(),
            })),
        }
    }

    pub fn tag_name(&self) -> String {
        self.inner.borrow().tag_name.clone()
    }

    /// Sets or replaces one attribute, keeping first-insertion order.
    ///
    /// Returns `false` and leaves the element untouched when `name` is not a
    /// valid attribute name.
    pub fn set_attribute(&self, name: &str, value: &str) -> bool {
        if !is_valid_attribute_name(name) {
            return false;
        }
        let mut data = self.inner.borrow_mut();
        match data.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
        true
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.inner.borrow().attributes.clone()
    }

    pub fn id(&self) -> Option<String> {
        self.get_attribute("id")
    }

    pub fn class_list(&self) -> Vec<String> {
        self.get_attribute("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_list().iter().any(|value| value == class_name)
    }

    pub fn append_child(&self, child: impl Into<Node>) {
        self.inner.borrow_mut().children.push(child.into());
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.borrow().children.clone()
    }

    /// Depth-first search of this element and its descendants.
    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        if self.id().as_deref() == Some(id) {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .filter_map(Node::as_element)
            .find_map(|child| child.find_by_id(id))
    }

    /// Collects this element and descendants carrying `class_name`, in document order.
    pub fn elements_by_class_name(&self, class_name: &str) -> Vec<Element> {
        let mut found = Vec::new();
        self.collect_by_class(class_name, &mut found);
        found
    }

    fn collect_by_class(&self, class_name: &str, found: &mut Vec<Element>) {
        if self.has_class(class_name) {
            found.push(self.clone());
        }
        for child in self.children() {
            if let Node::Element(element) = child {
                element.collect_by_class(class_name, found);
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        super::html::write_element(&mut out, self);
        out
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Element")
            .field("tag_name", &data.tag_name)
            .field("attributes", &data.attributes)
            .field("children", &data.children.len())
            .finish()
    }
}

/// Shared list of top-level nodes produced by one render pass.
#[derive(Clone, Default)]
pub struct Fragment {
    nodes: Rc<RefCell<Vec<Node>>>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_child(&self, child: impl Into<Node>) {
        self.nodes.borrow_mut().push(child.into());
    }

    pub fn child_nodes(&self) -> Vec<Node> {
        self.nodes.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Removes every top-level node.
    pub fn clear(&self) {
        self.nodes.borrow_mut().clear();
    }

    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        self.child_nodes()
            .iter()
            .filter_map(Node::as_element)
            .find_map(|element| element.find_by_id(id))
    }

    pub fn elements_by_class_name(&self, class_name: &str) -> Vec<Element> {
        self.child_nodes()
            .iter()
            .filter_map(Node::as_element)
            .flat_map(|element| element.elements_by_class_name(class_name))
            .collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in self.nodes.borrow().iter() {
            super::html::write_node(&mut out, node);
        }
        out
    }
}

impl Debug for Fragment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.nodes.borrow().iter()).finish()
    }
}

/// HTML attribute name rule: non-empty, no whitespace, controls, quotes,
/// `<`, `>`, `/` or `=`.
fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

#[cfg(test)]
mod tests {
    use super::{Element, Fragment, Node};

    #[test]
    fn set_attribute_rejects_names_that_would_break_markup() {
        let element = Element::detached("a");
        assert!(!element.set_attribute("href=\"x\" onclick=\"alert(1)\" data-z", "v"));
        assert!(!element.set_attribute("", "v"));
        assert!(!element.set_attribute("on\tclick", "v"));
        assert!(element.set_attribute("data-z", "v"));

        assert_eq!(element.to_html(), "<a data-z=\"v\"></a>");
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let element = Element::detached("DIV");
        element.set_attribute("id", "a");
        element.set_attribute("class", "x y");
        element.set_attribute("id", "b");

        assert_eq!(element.tag_name(), "div");
        assert_eq!(
            element.attributes(),
            vec![
                ("id".to_string(), "b".to_string()),
                ("class".to_string(), "x y".to_string())
            ]
        );
        assert!(element.has_class("y"));
    }

    #[test]
    fn clones_alias_the_same_node() {
        let element = Element::detached("p");
        let alias = element.clone();
        alias.append_child(Node::Text("hi".to_string()));

        assert_eq!(element, alias);
        assert_eq!(element.children().len(), 1);
        assert_ne!(element, Element::detached("p"));
    }

    #[test]
    fn fragment_lookups_descend_into_children() {
        let fragment = Fragment::new();
        let section = Element::detached("p");
        let atom = Element::detached("span");
        atom.set_attribute("id", "atom-1");
        atom.set_attribute("class", "marker");
        section.append_child(atom.clone());
        fragment.append_child(section);

        assert_eq!(fragment.find_by_id("atom-1"), Some(atom));
        assert_eq!(fragment.elements_by_class_name("marker").len(), 1);
        assert!(fragment.find_by_id("missing").is_none());

        fragment.clear();
        assert!(fragment.is_empty());
    }
}
