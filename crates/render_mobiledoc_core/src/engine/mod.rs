//! Render-engine contract and the reference mobiledoc DOM engine.
//!
//! # Responsibility
//! - Define what an engine receives (`RendererConfig`) and returns
//!   (`RenderOutput`: fragment plus teardown).
//! - Define the per-entity render surface (`EntityDefinition`,
//!   `EntityRenderArgs`, `RenderEnv`).
//! - Provide `MobiledocDomRenderer`, a walker for mobiledoc 0.3 documents.
//!
//! # Invariants
//! - Every callback registered through `RenderEnv::on_teardown` during a pass
//!   runs at most once, when that pass's `Teardown` is run.
//! - Explicit definitions are looked up before name-derived ones; unknown
//!   names fall through to the configured handler, else the engine errors.

use crate::dom::DomError;
use crate::model::entity::EntityKind;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod definition;
pub mod mobiledoc;
pub mod options;
pub mod teardown;

use crate::dom::Fragment;
use options::RendererConfig;
use teardown::Teardown;

pub type RenderResult<T> = Result<T, RenderError>;

/// Result of one render pass.
pub struct RenderOutput {
    pub result: Fragment,
    pub teardown: Teardown,
}

/// Walks a document and invokes per-entity render callbacks.
///
/// A failing pass runs the teardown callbacks it collected before returning
/// the error, so no entity it mounted stays registered.
pub trait RenderEngine {
    fn render(&self, config: &RendererConfig, mobiledoc: &Value) -> RenderResult<RenderOutput>;
}

/// Render pass failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    Dom(DomError),
    /// No definition and no unknown-card handler for this name.
    UnknownCard(String),
    /// No definition and no unknown-atom handler for this name.
    UnknownAtom(String),
    IncompatibleRenderType {
        kind: EntityKind,
        name: String,
        render_type: String,
    },
    /// A component entity was rendered with options lacking the bridge hooks.
    MissingComponentHooks {
        kind: EntityKind,
        name: String,
    },
    UnsupportedVersion(String),
    MalformedDocument(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dom(err) => write!(f, "{err}"),
            Self::UnknownCard(name) => {
                write!(f, "card `{name}` is not defined and no unknown card handler is set")
            }
            Self::UnknownAtom(name) => {
                write!(f, "atom `{name}` is not defined and no unknown atom handler is set")
            }
            Self::IncompatibleRenderType {
                kind,
                name,
                render_type,
            } => write!(
                f,
                "{kind} `{name}` has render type `{render_type}`; expected `dom`"
            ),
            Self::MissingComponentHooks { kind, name } => {
                write!(f, "{kind} `{name}` requires component hooks in card options")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported mobiledoc version: {version}")
            }
            Self::MalformedDocument(message) => write!(f, "malformed mobiledoc: {message}"),
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for RenderError {
    fn from(value: DomError) -> Self {
        Self::Dom(value)
    }
}
