//! Observable entity registries and their deferred update queue.
//!
//! # Responsibility
//! - Track descriptors of currently mounted cards/atoms in insertion order.
//! - Defer membership changes to an explicit scheduling checkpoint.
//! - Notify subscribers when a queued change is applied.
//!
//! # Invariants
//! - Mutations are applied only when the owning `UpdateQueue` is flushed,
//!   never inline inside a render pass.
//! - Removing an absent descriptor is a no-op and emits no notification.

pub mod entity_registry;
pub mod update_queue;
