//! Render orchestration for one mobiledoc view.
//!
//! # Responsibility
//! - Combine explicit and name-derived definitions, bind the bridge hooks to
//!   this view's registries and run a render pass.
//! - Hold the rendered fragment and run its teardown exactly once.
//!
//! # Invariants
//! - The card and atom registries belong to exactly one view.
//! - A pass's teardown runs at most once: on re-render, or on destroy/drop.
//! - A view without a document is rejected before any rendering.

use crate::engine::RenderError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod config;
pub mod mobiledoc_view;

pub type ViewResult<T> = Result<T, ViewError>;

/// View-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Precondition violation: no document was supplied.
    MissingMobiledoc,
    /// The render pass failed; the view holds no rendered output.
    Render(RenderError),
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMobiledoc => write!(f, "must pass mobiledoc to render-mobiledoc view"),
            Self::Render(err) => write!(f, "render failed: {err}"),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingMobiledoc => None,
            Self::Render(err) => Some(err),
        }
    }
}

impl From<RenderError> for ViewError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}
