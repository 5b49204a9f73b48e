//! Engine configuration: definitions, card options and component hooks.

use crate::dom::{DomHelper, Element};
use crate::engine::definition::{EntityDefinition, EntityRenderArgs, UnknownEntityHandler};
use crate::engine::RenderResult;
use crate::model::entity::{EntityDescriptor, EntityKind};
use log::warn;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Card option keys owned by the component hooks.
pub const ADD_CARD_HOOK: &str = "addComponentCard";
pub const REMOVE_CARD_HOOK: &str = "removeComponentCard";
pub const ADD_ATOM_HOOK: &str = "addComponentAtom";
pub const REMOVE_ATOM_HOOK: &str = "removeComponentAtom";

const RESERVED_OPTION_KEYS: &[&str] = &[
    ADD_CARD_HOOK,
    REMOVE_CARD_HOOK,
    ADD_ATOM_HOOK,
    REMOVE_ATOM_HOOK,
];

/// Descriptor plus the placeholder it mounts into, as returned by an add hook.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedEntity {
    pub entity: EntityDescriptor,
    pub element: Element,
}

pub type AddEntityHook = Rc<dyn Fn(&EntityRenderArgs<'_>) -> RenderResult<MountedEntity>>;
pub type RemoveEntityHook = Rc<dyn Fn(EntityDescriptor)>;

/// The four named hooks component entities call through card options.
#[derive(Clone)]
pub struct ComponentHooks {
    pub on_add_card: AddEntityHook,
    pub on_remove_card: RemoveEntityHook,
    pub on_add_atom: AddEntityHook,
    pub on_remove_atom: RemoveEntityHook,
}

impl ComponentHooks {
    pub fn new(
        on_add_card: impl Fn(&EntityRenderArgs<'_>) -> RenderResult<MountedEntity> + 'static,
        on_remove_card: impl Fn(EntityDescriptor) + 'static,
        on_add_atom: impl Fn(&EntityRenderArgs<'_>) -> RenderResult<MountedEntity> + 'static,
        on_remove_atom: impl Fn(EntityDescriptor) + 'static,
    ) -> Self {
        Self {
            on_add_card: Rc::new(on_add_card),
            on_remove_card: Rc::new(on_remove_card),
            on_add_atom: Rc::new(on_add_atom),
            on_remove_atom: Rc::new(on_remove_atom),
        }
    }

    pub fn add_hook(&self, kind: EntityKind) -> &AddEntityHook {
        match kind {
            EntityKind::Card => &self.on_add_card,
            EntityKind::Atom => &self.on_add_atom,
        }
    }

    pub fn remove_hook(&self, kind: EntityKind) -> &RemoveEntityHook {
        match kind {
            EntityKind::Card => &self.on_remove_card,
            EntityKind::Atom => &self.on_remove_atom,
        }
    }
}

impl Debug for ComponentHooks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentHooks").finish_non_exhaustive()
    }
}

/// Options handed to every card/atom render call.
///
/// Free-form user values live in a JSON map; the component hooks are typed
/// and cannot be shadowed by user keys.
#[derive(Debug, Clone, Default)]
pub struct CardOptions {
    hooks: Option<ComponentHooks>,
    values: Map<String, Value>,
}

impl CardOptions {
    pub fn new(values: Map<String, Value>) -> Self {
        Self {
            hooks: None,
            values,
        }
    }

    /// Merges user options with the required hooks; the hooks always win.
    ///
    /// User keys naming a hook are dropped with a warning.
    pub fn with_component_hooks(user_values: &Map<String, Value>, hooks: ComponentHooks) -> Self {
        let mut values = Map::new();
        for (key, value) in user_values {
            if RESERVED_OPTION_KEYS.contains(&key.as_str()) {
                warn!(
                    "event=card_option_reserved module=engine status=ignored key={}",
                    key
                );
                continue;
            }
            values.insert(key.clone(), value.clone());
        }
        Self {
            hooks: Some(hooks),
            values,
        }
    }

    pub fn hooks(&self) -> Option<&ComponentHooks> {
        self.hooks.as_ref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

/// Everything an engine needs for one render pass.
#[derive(Clone)]
pub struct RendererConfig {
    pub cards: Vec<EntityDefinition>,
    pub atoms: Vec<EntityDefinition>,
    pub card_options: CardOptions,
    pub dom: Rc<dyn DomHelper>,
    pub unknown_card_handler: Option<UnknownEntityHandler>,
    pub unknown_atom_handler: Option<UnknownEntityHandler>,
}

impl RendererConfig {
    /// Config with no definitions, no handlers and default options.
    pub fn new(dom: Rc<dyn DomHelper>) -> Self {
        Self {
            cards: Vec::new(),
            atoms: Vec::new(),
            card_options: CardOptions::default(),
            dom,
            unknown_card_handler: None,
            unknown_atom_handler: None,
        }
    }

    /// First definition with a matching name, in declaration order.
    pub fn find_definition(&self, kind: EntityKind, name: &str) -> Option<&EntityDefinition> {
        let definitions = match kind {
            EntityKind::Card => &self.cards,
            EntityKind::Atom => &self.atoms,
        };
        definitions.iter().find(|definition| definition.name() == name)
    }

    pub fn unknown_handler(&self, kind: EntityKind) -> Option<&UnknownEntityHandler> {
        match kind {
            EntityKind::Card => self.unknown_card_handler.as_ref(),
            EntityKind::Atom => self.unknown_atom_handler.as_ref(),
        }
    }
}

impl Debug for RendererConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererConfig")
            .field("cards", &self.cards)
            .field("atoms", &self.atoms)
            .field("card_options", &self.card_options)
            .field("unknown_card_handler", &self.unknown_card_handler.is_some())
            .field("unknown_atom_handler", &self.unknown_atom_handler.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{CardOptions, ComponentHooks, ADD_CARD_HOOK, REMOVE_ATOM_HOOK};
    use crate::engine::RenderError;
    use crate::model::entity::EntityKind;
    use serde_json::{json, Map};
    use std::cell::Cell;
    use std::rc::Rc;

    fn noop_hooks(removed: Rc<Cell<usize>>) -> ComponentHooks {
        let card_removed = Rc::clone(&removed);
        ComponentHooks::new(
            |args| {
                Err(RenderError::MissingComponentHooks {
                    kind: EntityKind::Card,
                    name: args.env.name().to_string(),
                })
            },
            move |_| card_removed.set(card_removed.get() + 1),
            |args| {
                Err(RenderError::MissingComponentHooks {
                    kind: EntityKind::Atom,
                    name: args.env.name().to_string(),
                })
            },
            move |_| removed.set(removed.get() + 10),
        )
    }

    #[test]
    fn reserved_user_keys_never_shadow_hooks() {
        let mut user = Map::new();
        user.insert(ADD_CARD_HOOK.to_string(), json!("user value"));
        user.insert(REMOVE_ATOM_HOOK.to_string(), json!(1));
        user.insert("theme".to_string(), json!("dark"));

        let options = CardOptions::with_component_hooks(&user, noop_hooks(Rc::new(Cell::new(0))));

        assert!(options.hooks().is_some());
        assert!(options.get(ADD_CARD_HOOK).is_none());
        assert!(options.get(REMOVE_ATOM_HOOK).is_none());
        assert_eq!(options.get("theme"), Some(&json!("dark")));
    }

    #[test]
    fn hooks_are_selected_by_kind() {
        let removed = Rc::new(Cell::new(0));
        let hooks = noop_hooks(Rc::clone(&removed));
        let descriptor = crate::model::entity::EntityDescriptor::card("c", "id", json!(null));

        (hooks.remove_hook(EntityKind::Card))(descriptor.clone());
        (hooks.remove_hook(EntityKind::Atom))(descriptor);
        assert_eq!(removed.get(), 11);
    }

    #[test]
    fn plain_options_have_no_hooks() {
        assert!(CardOptions::default().hooks().is_none());
        assert!(CardOptions::new(Map::new()).values().is_empty());
    }
}
