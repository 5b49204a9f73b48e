//! Placeholder element creation.

use crate::dom::{DomHelper, DomResult, Element};
use crate::placeholder::id_generator::{IdGenerator, UuidIdGenerator};
use std::rc::Rc;

/// Creates empty, id-stamped elements through an injected DOM capability.
#[derive(Clone)]
pub struct PlaceholderFactory {
    ids: Rc<dyn IdGenerator>,
}

impl PlaceholderFactory {
    pub fn new(ids: Rc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Creates a detached `tag_name` element with a fresh `id` and the
    /// space-joined `class_names`.
    ///
    /// # Errors
    /// - Propagates the DOM capability's creation failure unchanged.
    pub fn create(
        &self,
        dom: &dyn DomHelper,
        tag_name: &str,
        class_names: &[String],
    ) -> DomResult<Element> {
        let element = dom.create_element(tag_name)?;
        element.set_attribute("id", &self.ids.next_id());
        element.set_attribute("class", &class_names.join(" "));
        Ok(element)
    }
}

impl Default for PlaceholderFactory {
    fn default() -> Self {
        Self::new(Rc::new(UuidIdGenerator::new()))
    }
}
