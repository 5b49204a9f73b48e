//! Minimal DOM capability used by render passes.
//!
//! # Responsibility
//! - Define the injected element-creation capability (`DomHelper`).
//! - Provide shared node handles that render engines splice into fragments.
//!
//! # Invariants
//! - A detached document never creates nodes; failures leave no partial state.
//! - Node handles are shared: cloning an `Element` aliases the same node.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod document;
mod html;
mod node;

pub use document::{DomHelper, SimpleDocument};
pub use node::{Element, Fragment, Node};

pub type DomResult<T> = Result<T, DomError>;

/// DOM creation failures surfaced to render passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The host tore the document down before the creation attempt.
    DocumentDetached { tag_name: String },
    InvalidTagName(String),
}

impl Display for DomError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentDetached { tag_name } => {
                write!(f, "cannot create `{tag_name}`: document is detached")
            }
            Self::InvalidTagName(value) => write!(f, "invalid tag name: `{value}`"),
        }
    }
}

impl Error for DomError {}
