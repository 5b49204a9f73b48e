//! Add/remove hook implementation for one entity kind.

use crate::engine::definition::EntityRenderArgs;
use crate::engine::options::{ComponentHooks, MountedEntity};
use crate::engine::RenderResult;
use crate::model::entity::{EntityDescriptor, EntityKind};
use crate::placeholder::factory::PlaceholderFactory;
use crate::registry::entity_registry::EntityRegistry;
use log::debug;
use std::rc::Rc;

/// Maps an entity name to the component name a host mounts.
pub type NameMapper = Rc<dyn Fn(&str) -> String>;

/// Identity mapping: the entity name is the component name.
pub fn identity_name_mapper() -> NameMapper {
    Rc::new(|name: &str| name.to_string())
}

/// Hook pair for one entity kind, bound to that kind's registry.
#[derive(Clone)]
pub struct EntityBridge {
    kind: EntityKind,
    registry: EntityRegistry,
    placeholders: PlaceholderFactory,
    name_mapper: NameMapper,
}

impl EntityBridge {
    pub fn new(
        registry: EntityRegistry,
        placeholders: PlaceholderFactory,
        name_mapper: NameMapper,
    ) -> Self {
        Self {
            kind: registry.kind(),
            registry,
            placeholders,
            name_mapper,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Creates a placeholder, builds and registers the descriptor.
    ///
    /// # Errors
    /// - Propagates DOM creation failures; nothing is registered in that case.
    pub fn add(&self, args: &EntityRenderArgs<'_>) -> RenderResult<MountedEntity> {
        let entity_name = args.env.name();
        let class_names = self.kind.class_names(entity_name);
        let element = self
            .placeholders
            .create(args.env.dom(), self.kind.tag_name(), &class_names)?;
        let destination_element_id = element.id().unwrap_or_default();
        let component_name = (self.name_mapper)(entity_name);

        let entity = EntityDescriptor {
            component_name,
            destination_element_id,
            payload: args.payload.clone(),
            value: match self.kind {
                EntityKind::Card => None,
                EntityKind::Atom => args.value.map(str::to_string),
            },
        };
        debug!(
            "event=entity_mount module=bridge status=ok kind={} name={} element_id={}",
            self.kind, entity_name, entity.destination_element_id
        );
        self.registry.add(entity.clone());

        Ok(MountedEntity { entity, element })
    }

    /// Deregisters `entity`; tolerates it being already absent.
    pub fn remove(&self, entity: EntityDescriptor) {
        debug!(
            "event=entity_unmount module=bridge status=ok kind={} element_id={}",
            self.kind, entity.destination_element_id
        );
        self.registry.remove(entity);
    }
}

/// Builds the four named hooks from a card bridge and an atom bridge.
pub fn component_hooks(cards: EntityBridge, atoms: EntityBridge) -> ComponentHooks {
    let add_card = cards.clone();
    let add_atom = atoms.clone();
    ComponentHooks::new(
        move |args| add_card.add(args),
        move |entity| cards.remove(entity),
        move |args| add_atom.add(args),
        move |entity| atoms.remove(entity),
    )
}
