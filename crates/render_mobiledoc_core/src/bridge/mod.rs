//! Entity lifecycle bridge between render passes and host components.
//!
//! # Responsibility
//! - Turn each card/atom render call into a placeholder element plus a
//!   registered descriptor (`EntityBridge::add`).
//! - Deregister that descriptor when the pass is torn down
//!   (`EntityBridge::remove`, wired through `RenderEnv::on_teardown`).
//! - Derive component-backed definitions from plain entity names.
//!
//! # Invariants
//! - Every add produces a brand-new descriptor/element pair with a fresh id.
//! - Each successful add registers exactly one remove for its descriptor.
//! - A remove for an absent descriptor is a no-op.

pub mod component;
pub mod entity_bridge;
