//! Entity records shared between render passes and host frameworks.
//!
//! # Responsibility
//! - Define the descriptor a host consumes to mount a component by element id.
//! - Define per-kind placeholder conventions (tag name, marker classes).
//!
//! # Invariants
//! - Descriptors are never mutated after creation; remove-then-recreate is the
//!   only update path.
//! - `destination_element_id` is unique among all live descriptors.

pub mod entity;
