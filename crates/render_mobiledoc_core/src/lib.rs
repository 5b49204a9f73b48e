//! Mobiledoc rendering with host-mounted card and atom components.
//!
//! Render passes create one placeholder element per card/atom and register a
//! descriptor (component name, destination element id, payload) that a host
//! uses to mount the real component into that placeholder.

pub mod bridge;
pub mod dom;
pub mod engine;
pub mod logging;
pub mod model;
pub mod placeholder;
pub mod registry;
pub mod view;

pub use bridge::component::{component_atom, component_card, component_definitions};
pub use bridge::entity_bridge::{component_hooks, identity_name_mapper, EntityBridge, NameMapper};
pub use dom::{DomError, DomHelper, DomResult, Element, Fragment, Node, SimpleDocument};
pub use engine::definition::{
    unknown_entity_handler, EntityDefinition, EntityRenderArgs, EntityRenderFn, RenderEnv,
    RenderType, UnknownEntityHandler,
};
pub use engine::mobiledoc::MobiledocDomRenderer;
pub use engine::options::{
    CardOptions, ComponentHooks, MountedEntity, RendererConfig, ADD_ATOM_HOOK, ADD_CARD_HOOK,
    REMOVE_ATOM_HOOK, REMOVE_CARD_HOOK,
};
pub use engine::teardown::{Teardown, TeardownRegistrar};
pub use engine::{RenderEngine, RenderError, RenderOutput, RenderResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::entity::{EntityDescriptor, EntityKind, ATOM_ELEMENT_CLASS, CARD_ELEMENT_CLASS};
pub use placeholder::factory::PlaceholderFactory;
pub use placeholder::id_generator::{
    IdGenerator, SequentialIdGenerator, UuidIdGenerator, ENTITY_ID_PREFIX,
};
pub use registry::entity_registry::{EntityRegistry, ObserverId, RegistryChange};
pub use registry::update_queue::UpdateQueue;
pub use view::config::ViewConfig;
pub use view::mobiledoc_view::MobiledocView;
pub use view::{ViewError, ViewResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
