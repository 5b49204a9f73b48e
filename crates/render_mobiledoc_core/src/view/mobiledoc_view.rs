//! The render orchestrator.

use crate::bridge::component::component_definitions;
use crate::bridge::entity_bridge::{component_hooks, EntityBridge};
use crate::dom::{DomHelper, Fragment};
use crate::engine::definition::EntityDefinition;
use crate::engine::mobiledoc::MobiledocDomRenderer;
use crate::engine::options::{CardOptions, RendererConfig};
use crate::engine::teardown::Teardown;
use crate::engine::RenderEngine;
use crate::model::entity::EntityKind;
use crate::placeholder::factory::PlaceholderFactory;
use crate::placeholder::id_generator::{IdGenerator, UuidIdGenerator};
use crate::registry::entity_registry::EntityRegistry;
use crate::registry::update_queue::UpdateQueue;
use crate::view::config::ViewConfig;
use crate::view::{ViewError, ViewResult};
use log::{info, warn};
use serde_json::Value;
use std::rc::Rc;

/// Renders one mobiledoc and exposes the card/atom registries a host mounts
/// components from.
pub struct MobiledocView {
    config: ViewConfig,
    dom: Rc<dyn DomHelper>,
    engine: Rc<dyn RenderEngine>,
    ids: Rc<dyn IdGenerator>,
    queue: UpdateQueue,
    cards: EntityRegistry,
    atoms: EntityRegistry,
    rendered: Option<Fragment>,
    teardown: Option<Teardown>,
}

impl MobiledocView {
    /// Creates a view over `dom` using the reference engine and UUID ids.
    ///
    /// # Errors
    /// - `ViewError::MissingMobiledoc` when `config.mobiledoc` is `None`.
    pub fn new(config: ViewConfig, dom: Rc<dyn DomHelper>) -> ViewResult<Self> {
        if config.mobiledoc.is_none() {
            return Err(ViewError::MissingMobiledoc);
        }

        let queue = UpdateQueue::new();
        Ok(Self {
            config,
            dom,
            engine: Rc::new(MobiledocDomRenderer::new()),
            ids: Rc::new(UuidIdGenerator::new()),
            cards: EntityRegistry::new(EntityKind::Card, queue.clone()),
            atoms: EntityRegistry::new(EntityKind::Atom, queue.clone()),
            queue,
            rendered: None,
            teardown: None,
        })
    }

    pub fn with_engine(mut self, engine: impl RenderEngine + 'static) -> Self {
        self.engine = Rc::new(engine);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Rc::new(ids);
        self
    }

    /// Replaces the document used by the next `render`.
    pub fn set_mobiledoc(&mut self, mobiledoc: Value) {
        self.config.mobiledoc = Some(mobiledoc);
    }

    /// Runs a render pass and stores its fragment and teardown.
    ///
    /// A previous pass is torn down first. On failure the view holds no
    /// rendered output and the entities the failed pass mounted are queued
    /// for removal.
    pub fn render(&mut self) -> ViewResult<Fragment> {
        let Some(mobiledoc) = self.config.mobiledoc.clone() else {
            return Err(ViewError::MissingMobiledoc);
        };
        self.run_teardown("rerender");

        let renderer_config = self.renderer_config();
        match self.engine.render(&renderer_config, &mobiledoc) {
            Ok(output) => {
                info!(
                    "event=render_pass module=view status=ok cards={} atoms={} nodes={}",
                    renderer_config.cards.len(),
                    renderer_config.atoms.len(),
                    output.result.len()
                );
                self.rendered = Some(output.result.clone());
                self.teardown = Some(output.teardown);
                Ok(output.result)
            }
            Err(err) => {
                warn!("event=render_pass module=view status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Tears down the current pass. Returns `false` when there was nothing
    /// to tear down (never rendered, or already destroyed).
    pub fn destroy(&mut self) -> bool {
        self.run_teardown("destroy")
    }

    /// Fragment of the current pass, if any.
    pub fn rendered(&self) -> Option<&Fragment> {
        self.rendered.as_ref()
    }

    pub fn has_pending_teardown(&self) -> bool {
        self.teardown.is_some()
    }

    /// Applies queued registry mutations; the host's scheduling checkpoint.
    pub fn flush_updates(&self) -> usize {
        self.queue.flush()
    }

    pub fn update_queue(&self) -> &UpdateQueue {
        &self.queue
    }

    pub fn card_registry(&self) -> &EntityRegistry {
        &self.cards
    }

    pub fn atom_registry(&self) -> &EntityRegistry {
        &self.atoms
    }

    fn renderer_config(&self) -> RendererConfig {
        let placeholders = PlaceholderFactory::new(Rc::clone(&self.ids));
        let hooks = component_hooks(
            EntityBridge::new(
                self.cards.clone(),
                placeholders.clone(),
                Rc::clone(&self.config.card_name_to_component_name),
            ),
            EntityBridge::new(
                self.atoms.clone(),
                placeholders,
                Rc::clone(&self.config.atom_name_to_component_name),
            ),
        );

        RendererConfig {
            cards: self.all_definitions(EntityKind::Card),
            atoms: self.all_definitions(EntityKind::Atom),
            card_options: CardOptions::with_component_hooks(&self.config.card_options, hooks),
            dom: Rc::clone(&self.dom),
            unknown_card_handler: self.config.unknown_card_handler.clone(),
            unknown_atom_handler: self.config.unknown_atom_handler.clone(),
        }
    }

    /// Explicit definitions followed by the name-derived ones.
    fn all_definitions(&self, kind: EntityKind) -> Vec<EntityDefinition> {
        let (explicit, names) = match kind {
            EntityKind::Card => (&self.config.cards, &self.config.card_names),
            EntityKind::Atom => (&self.config.atoms, &self.config.atom_names),
        };
        let mut definitions = explicit.clone();
        definitions.extend(component_definitions(kind, names));
        definitions
    }

    fn run_teardown(&mut self, reason: &str) -> bool {
        self.rendered = None;
        let Some(teardown) = self.teardown.take() else {
            return false;
        };
        let callbacks = teardown.run();
        info!(
            "event=render_teardown module=view status=ok reason={} callbacks={}",
            reason, callbacks
        );
        true
    }
}

impl Drop for MobiledocView {
    fn drop(&mut self) {
        if self.destroy() {
            info!("event=view_destroy module=view status=ok trigger=drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MobiledocView;
    use crate::dom::SimpleDocument;
    use crate::placeholder::id_generator::SequentialIdGenerator;
    use crate::view::config::ViewConfig;
    use crate::view::ViewError;
    use serde_json::json;
    use std::rc::Rc;

    fn gallery_doc() -> serde_json::Value {
        json!({
            "version": "0.3.2",
            "cards": [["gallery", {"images": [1, 2, 3]}]],
            "sections": [[10, 0]]
        })
    }

    #[test]
    fn missing_mobiledoc_is_rejected_before_rendering() {
        let dom = Rc::new(SimpleDocument::new());
        let err = MobiledocView::new(ViewConfig::default(), dom.clone())
            .err()
            .expect("missing document must fail");

        assert_eq!(err, ViewError::MissingMobiledoc);
        assert_eq!(dom.created_elements(), 0);
    }

    #[test]
    fn rerender_tears_down_previous_pass_first() {
        let config = ViewConfig::new(gallery_doc()).with_card_names(["gallery"]);
        let mut view = MobiledocView::new(config, Rc::new(SimpleDocument::new()))
            .expect("view")
            .with_id_generator(SequentialIdGenerator::with_prefix("el-"));

        let first = view.render().expect("first render");
        view.flush_updates();
        assert_eq!(view.card_registry().snapshot()[0].destination_element_id, "el-1");

        view.render().expect("second render");
        view.flush_updates();

        assert!(first.is_empty());
        let entries = view.card_registry().snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].destination_element_id, "el-2");
    }

    #[test]
    fn destroy_is_idempotent_and_noop_before_render() {
        let config = ViewConfig::new(gallery_doc()).with_card_names(["gallery"]);
        let mut view =
            MobiledocView::new(config, Rc::new(SimpleDocument::new())).expect("view");

        assert!(!view.destroy());
        view.render().expect("render");
        assert!(view.has_pending_teardown());
        assert!(view.destroy());
        assert!(!view.destroy());
        assert!(view.rendered().is_none());
    }
}
