//! Unique element id generation.

use std::cell::Cell;
use uuid::Uuid;

/// Prefix of every generated placeholder id.
pub const ENTITY_ID_PREFIX: &str = "__rendered-mobiledoc-entity-";

/// Produces a fresh, prefixed identifier on every call.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Default generator: prefix + random v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuidIdGenerator {
    prefix: String,
}

impl UuidIdGenerator {
    pub fn new() -> Self {
        Self::with_prefix(ENTITY_ID_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for UuidIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        format!("{}{}", self.prefix, Uuid::new_v4())
    }
}

/// Deterministic generator for reproducible fixtures: prefix + counter.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::with_prefix(ENTITY_ID_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}{value}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, SequentialIdGenerator, UuidIdGenerator, ENTITY_ID_PREFIX};

    #[test]
    fn uuid_ids_are_prefixed_and_parse_as_uuid() {
        let id = UuidIdGenerator::new().next_id();
        let suffix = id
            .strip_prefix(ENTITY_ID_PREFIX)
            .expect("id should carry entity prefix");
        assert!(uuid::Uuid::parse_str(suffix).is_ok(), "bad suffix: {suffix}");
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::with_prefix("el-");
        assert_eq!(ids.next_id(), "el-1");
        assert_eq!(ids.next_id(), "el-2");
    }
}
