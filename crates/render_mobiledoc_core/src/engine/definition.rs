//! Entity definitions and the arguments passed to their render functions.

use crate::dom::{DomHelper, Node};
use crate::engine::options::CardOptions;
use crate::engine::teardown::TeardownRegistrar;
use crate::engine::RenderResult;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Render provider tag understood by engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderType {
    /// Produces DOM nodes; the only type `MobiledocDomRenderer` accepts.
    Dom,
    /// Produces plain text; rejected by DOM engines.
    Text,
}

impl RenderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dom => "dom",
            Self::Text => "text",
        }
    }
}

/// Per-entity render callback. Returning `Ok(None)` inserts nothing.
pub type EntityRenderFn = Rc<dyn Fn(&EntityRenderArgs<'_>) -> RenderResult<Option<Node>>>;

/// Fallback for entity names with no matching definition.
pub type UnknownEntityHandler = EntityRenderFn;

/// Wraps a closure as an unknown-entity handler.
pub fn unknown_entity_handler(
    handler: impl Fn(&EntityRenderArgs<'_>) -> RenderResult<Option<Node>> + 'static,
) -> UnknownEntityHandler {
    Rc::new(handler)
}

/// One `(name, render type, render fn)` provider.
#[derive(Clone)]
pub struct EntityDefinition {
    name: String,
    render_type: RenderType,
    render: EntityRenderFn,
}

impl EntityDefinition {
    pub fn new(
        name: impl Into<String>,
        render_type: RenderType,
        render: impl Fn(&EntityRenderArgs<'_>) -> RenderResult<Option<Node>> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            render_type,
            render: Rc::new(render),
        }
    }

    /// Shorthand for a `RenderType::Dom` definition.
    pub fn dom(
        name: impl Into<String>,
        render: impl Fn(&EntityRenderArgs<'_>) -> RenderResult<Option<Node>> + 'static,
    ) -> Self {
        Self::new(name, RenderType::Dom, render)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render_type(&self) -> RenderType {
        self.render_type
    }

    pub fn render(&self, args: &EntityRenderArgs<'_>) -> RenderResult<Option<Node>> {
        (self.render)(args)
    }
}

impl Debug for EntityDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityDefinition")
            .field("name", &self.name)
            .field("render_type", &self.render_type)
            .finish_non_exhaustive()
    }
}

/// Engine-provided environment for one entity render.
pub struct RenderEnv {
    name: String,
    dom: Rc<dyn DomHelper>,
    teardown: TeardownRegistrar,
}

impl RenderEnv {
    pub fn new(
        name: impl Into<String>,
        dom: Rc<dyn DomHelper>,
        teardown: TeardownRegistrar,
    ) -> Self {
        Self {
            name: name.into(),
            dom,
            teardown,
        }
    }

    /// Entity name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dom(&self) -> &dyn DomHelper {
        self.dom.as_ref()
    }

    /// Registers a callback for when this render pass is torn down.
    pub fn on_teardown(&self, callback: impl FnOnce() + 'static) {
        self.teardown.register(callback);
    }
}

/// Arguments for one card/atom render call.
pub struct EntityRenderArgs<'a> {
    pub env: &'a RenderEnv,
    pub options: &'a CardOptions,
    pub payload: &'a Value,
    /// Atom text value; `None` for cards.
    pub value: Option<&'a str>,
}
