//! Element-creation capability and its in-memory implementation.

use super::node::{Element, Node};
use super::{DomError, DomResult};
use std::cell::Cell;

/// Injected capability for creating detached nodes.
///
/// Render passes borrow this from the host; the host may tear it down at any
/// time, after which creation must fail instead of producing nodes.
pub trait DomHelper {
    fn create_element(&self, tag_name: &str) -> DomResult<Element>;
    fn create_text_node(&self, text: &str) -> DomResult<Node>;
}

/// In-memory document used by the CLI and tests.
#[derive(Debug)]
pub struct SimpleDocument {
    attached: Cell<bool>,
    created_elements: Cell<usize>,
}

impl SimpleDocument {
    pub fn new() -> Self {
        Self {
            attached: Cell::new(true),
            created_elements: Cell::new(0),
        }
    }

    /// Simulates the host tearing the document down.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Number of elements created so far.
    pub fn created_elements(&self) -> usize {
        self.created_elements.get()
    }
}

impl Default for SimpleDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DomHelper for SimpleDocument {
    fn create_element(&self, tag_name: &str) -> DomResult<Element> {
        if !self.is_attached() {
            return Err(DomError::DocumentDetached {
                tag_name: tag_name.to_string(),
            });
        }
        if !is_valid_tag_name(tag_name) {
            return Err(DomError::InvalidTagName(tag_name.to_string()));
        }

        self.created_elements.set(self.created_elements.get() + 1);
        Ok(Element::detached(tag_name))
    }

    fn create_text_node(&self, text: &str) -> DomResult<Node> {
        if !self.is_attached() {
            return Err(DomError::DocumentDetached {
                tag_name: "#text".to_string(),
            });
        }
        Ok(Node::Text(text.to_string()))
    }
}

fn is_valid_tag_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '<' | '>' | '/' | '"' | '\''))
}
