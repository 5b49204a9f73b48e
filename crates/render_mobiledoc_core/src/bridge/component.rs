//! Definitions for entities rendered by host components.

use crate::dom::Node;
use crate::engine::definition::{EntityDefinition, EntityRenderArgs};
use crate::engine::{RenderError, RenderResult};
use crate::model::entity::EntityKind;
use std::rc::Rc;

/// Definition whose render delegates to the card hooks in card options.
pub fn component_card(name: impl Into<String>) -> EntityDefinition {
    EntityDefinition::dom(name, |args| render_component(EntityKind::Card, args))
}

/// Definition whose render delegates to the atom hooks in card options.
pub fn component_atom(name: impl Into<String>) -> EntityDefinition {
    EntityDefinition::dom(name, |args| render_component(EntityKind::Atom, args))
}

/// Derives one component definition per name, preserving order.
pub fn component_definitions(kind: EntityKind, names: &[String]) -> Vec<EntityDefinition> {
    names
        .iter()
        .map(|name| match kind {
            EntityKind::Card => component_card(name.as_str()),
            EntityKind::Atom => component_atom(name.as_str()),
        })
        .collect()
}

fn render_component(kind: EntityKind, args: &EntityRenderArgs<'_>) -> RenderResult<Option<Node>> {
    let hooks = args
        .options
        .hooks()
        .ok_or_else(|| RenderError::MissingComponentHooks {
            kind,
            name: args.env.name().to_string(),
        })?;

    let mounted = (hooks.add_hook(kind))(args)?;
    let remove = Rc::clone(hooks.remove_hook(kind));
    let entity = mounted.entity;
    args.env.on_teardown(move || remove(entity));

    Ok(Some(Node::Element(mounted.element)))
}
