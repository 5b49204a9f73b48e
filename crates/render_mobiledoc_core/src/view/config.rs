//! Options recognized by a mobiledoc view.

use crate::bridge::entity_bridge::{identity_name_mapper, NameMapper};
use crate::engine::definition::{EntityDefinition, UnknownEntityHandler};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// View inputs. Every field has a usable default except `mobiledoc`.
#[derive(Clone)]
pub struct ViewConfig {
    /// Required document; `MobiledocView::new` rejects `None`.
    pub mobiledoc: Option<Value>,
    /// Explicit card definitions, looked up before `card_names`.
    pub cards: Vec<EntityDefinition>,
    /// Explicit atom definitions, looked up before `atom_names`.
    pub atoms: Vec<EntityDefinition>,
    /// Card names rendered by host components.
    pub card_names: Vec<String>,
    /// Atom names rendered by host components.
    pub atom_names: Vec<String>,
    /// Free-form options forwarded to every render call.
    pub card_options: Map<String, Value>,
    pub unknown_card_handler: Option<UnknownEntityHandler>,
    pub unknown_atom_handler: Option<UnknownEntityHandler>,
    pub card_name_to_component_name: NameMapper,
    pub atom_name_to_component_name: NameMapper,
}

impl ViewConfig {
    pub fn new(mobiledoc: Value) -> Self {
        Self {
            mobiledoc: Some(mobiledoc),
            ..Self::default()
        }
    }

    pub fn with_cards(mut self, cards: Vec<EntityDefinition>) -> Self {
        self.cards = cards;
        self
    }

    pub fn with_atoms(mut self, atoms: Vec<EntityDefinition>) -> Self {
        self.atoms = atoms;
        self
    }

    pub fn with_card_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.card_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_atom_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.atom_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_card_options(mut self, card_options: Map<String, Value>) -> Self {
        self.card_options = card_options;
        self
    }

    pub fn with_unknown_card_handler(mut self, handler: UnknownEntityHandler) -> Self {
        self.unknown_card_handler = Some(handler);
        self
    }

    pub fn with_unknown_atom_handler(mut self, handler: UnknownEntityHandler) -> Self {
        self.unknown_atom_handler = Some(handler);
        self
    }

    pub fn with_card_name_mapper(mut self, mapper: impl Fn(&str) -> String + 'static) -> Self {
        self.card_name_to_component_name = Rc::new(mapper);
        self
    }

    pub fn with_atom_name_mapper(mut self, mapper: impl Fn(&str) -> String + 'static) -> Self {
        self.atom_name_to_component_name = Rc::new(mapper);
        self
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            mobiledoc: None,
            cards: Vec::new(),
            atoms: Vec::new(),
            card_names: Vec::new(),
            atom_names: Vec::new(),
            card_options: Map::new(),
            unknown_card_handler: None,
            unknown_atom_handler: None,
            card_name_to_component_name: identity_name_mapper(),
            atom_name_to_component_name: identity_name_mapper(),
        }
    }
}

impl Debug for ViewConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewConfig")
            .field("has_mobiledoc", &self.mobiledoc.is_some())
            .field("cards", &self.cards)
            .field("atoms", &self.atoms)
            .field("card_names", &self.card_names)
            .field("atom_names", &self.atom_names)
            .field("card_options", &self.card_options)
            .finish_non_exhaustive()
    }
}
