//! Placeholder elements that reserve mount points for host components.
//!
//! # Responsibility
//! - Generate collision-free element ids.
//! - Create detached, id-stamped, class-stamped placeholder elements.
//!
//! # Invariants
//! - No two placeholders created through one generator share an id.
//! - Placeholders are never attached here; attachment belongs to the engine.

pub mod factory;
pub mod id_generator;
