//! Card/atom descriptor model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// Marker class stamped on every card placeholder.
pub const CARD_ELEMENT_CLASS: &str = "__rendered-mobiledoc-card";
/// Marker class stamped on every atom placeholder.
pub const ATOM_ELEMENT_CLASS: &str = "__rendered-mobiledoc-atom";

const CARD_TAG_NAME: &str = "div";
const ATOM_TAG_NAME: &str = "span";

/// Which kind of embedded entity a descriptor or hook refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Block-level entity rendered in its own section.
    Card,
    /// Inline entity rendered within text flow.
    Atom,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Atom => "atom",
        }
    }

    /// Placeholder tag: block-level for cards, inline for atoms.
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Card => CARD_TAG_NAME,
            Self::Atom => ATOM_TAG_NAME,
        }
    }

    pub fn element_class(self) -> &'static str {
        match self {
            Self::Card => CARD_ELEMENT_CLASS,
            Self::Atom => ATOM_ELEMENT_CLASS,
        }
    }

    /// Marker classes for one placeholder: the kind class plus `<kind class>-<name>`.
    pub fn class_names(self, entity_name: &str) -> Vec<String> {
        let base = self.element_class();
        vec![base.to_string(), format!("{base}-{entity_name}")]
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a host must mount, and where.
///
/// Serialized with the camelCase field names host templates consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    /// Resolved UI component name.
    pub component_name: String,
    /// Id of the placeholder element the component renders into.
    pub destination_element_id: String,
    /// Opaque payload forwarded from the document node.
    pub payload: Value,
    /// Inline text value; only atoms carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EntityDescriptor {
    pub fn card(
        component_name: impl Into<String>,
        destination_element_id: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            destination_element_id: destination_element_id.into(),
            payload,
            value: None,
        }
    }

    pub fn atom(
        component_name: impl Into<String>,
        destination_element_id: impl Into<String>,
        payload: Value,
        value: impl Into<String>,
    ) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::card(component_name, destination_element_id, payload)
        }
    }
}
