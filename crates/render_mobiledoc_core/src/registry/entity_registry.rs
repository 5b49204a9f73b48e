//! Ordered, observable collection of mounted entity descriptors.

use crate::model::entity::{EntityDescriptor, EntityKind};
use crate::registry::update_queue::UpdateQueue;
use log::debug;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

/// One applied membership change.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryChange {
    Added(EntityDescriptor),
    Removed(EntityDescriptor),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Rc<dyn Fn(&RegistryChange)>;

#[derive(Default)]
struct RegistryState {
    entries: Vec<EntityDescriptor>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer_id: u64,
}

/// Registry of descriptors for one entity kind.
///
/// `add`/`remove` enqueue onto the shared `UpdateQueue`; the change becomes
/// visible (and observers fire) when that queue is flushed. Queued tasks hold
/// the registry weakly: a task whose registry was dropped before the flush
/// does nothing.
#[derive(Clone)]
pub struct EntityRegistry {
    kind: EntityKind,
    state: Rc<RefCell<RegistryState>>,
    queue: UpdateQueue,
}

impl EntityRegistry {
    pub fn new(kind: EntityKind, queue: UpdateQueue) -> Self {
        Self {
            kind,
            state: Rc::new(RefCell::new(RegistryState::default())),
            queue,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Queues an append of `descriptor`.
    pub fn add(&self, descriptor: EntityDescriptor) {
        let state = Rc::downgrade(&self.state);
        let kind = self.kind;
        self.queue.schedule(move || {
            if let Some(state) = upgrade(&state, kind, "add") {
                apply_add(&state, descriptor);
            }
        });
    }

    /// Queues removal of the first structurally equal entry.
    pub fn remove(&self, descriptor: EntityDescriptor) {
        let state = Rc::downgrade(&self.state);
        let kind = self.kind;
        self.queue.schedule(move || {
            if let Some(state) = upgrade(&state, kind, "remove") {
                apply_remove(&state, kind, descriptor);
            }
        });
    }

    /// Current entries in insertion order.
    pub fn snapshot(&self) -> Vec<EntityDescriptor> {
        self.state.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    pub fn find_by_destination(&self, element_id: &str) -> Option<EntityDescriptor> {
        self.state
            .borrow()
            .entries
            .iter()
            .find(|entry| entry.destination_element_id == element_id)
            .cloned()
    }

    pub fn subscribe(&self, observer: impl Fn(&RegistryChange) + 'static) -> ObserverId {
        let mut state = self.state.borrow_mut();
        let id = ObserverId(state.next_observer_id);
        state.next_observer_id += 1;
        state.observers.push((id, Rc::new(observer)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.observers.len();
        state.observers.retain(|(observer_id, _)| *observer_id != id);
        state.observers.len() != before
    }
}

fn upgrade(
    state: &Weak<RefCell<RegistryState>>,
    kind: EntityKind,
    operation: &str,
) -> Option<Rc<RefCell<RegistryState>>> {
    let state = state.upgrade();
    if state.is_none() {
        debug!(
            "event=registry_{}_skipped module=registry status=dropped kind={}",
            operation, kind
        );
    }
    state
}

fn apply_add(state: &Rc<RefCell<RegistryState>>, descriptor: EntityDescriptor) {
    state.borrow_mut().entries.push(descriptor.clone());
    notify(state, &RegistryChange::Added(descriptor));
}

fn apply_remove(
    state: &Rc<RefCell<RegistryState>>,
    kind: EntityKind,
    descriptor: EntityDescriptor,
) {
    let removed = {
        let mut state = state.borrow_mut();
        match state.entries.iter().position(|entry| *entry == descriptor) {
            Some(index) => Some(state.entries.remove(index)),
            None => None,
        }
    };

    match removed {
        Some(entry) => notify(state, &RegistryChange::Removed(entry)),
        None => debug!(
            "event=registry_remove_skipped module=registry status=ok kind={} element_id={}",
            kind, descriptor.destination_element_id
        ),
    }
}

fn notify(state: &Rc<RefCell<RegistryState>>, change: &RegistryChange) {
    // Observers may read or subscribe; call them without holding the borrow.
    let observers: Vec<Observer> = state
        .borrow()
        .observers
        .iter()
        .map(|(_, observer)| Rc::clone(observer))
        .collect();
    for observer in observers {
        observer(change);
    }
}

impl Debug for EntityRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("EntityRegistry")
            .field("kind", &self.kind)
            .field("entries", &state.entries)
            .field("observers", &state.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityRegistry, RegistryChange};
    use crate::model::entity::{EntityDescriptor, EntityKind};
    use crate::registry::update_queue::UpdateQueue;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    fn card(id: &str) -> EntityDescriptor {
        EntityDescriptor::card("gallery", id, json!({}))
    }

    #[test]
    fn mutations_wait_for_flush() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Card, queue.clone());

        registry.add(card("a"));
        assert!(registry.is_empty());

        queue.flush();
        assert_eq!(registry.snapshot(), vec![card("a")]);
    }

    #[test]
    fn remove_deletes_only_first_equal_entry() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Card, queue.clone());
        registry.add(card("a"));
        registry.add(card("b"));
        registry.add(card("a"));
        registry.remove(card("a"));
        queue.flush();

        assert_eq!(registry.snapshot(), vec![card("b"), card("a")]);
    }

    #[test]
    fn stale_remove_is_silent() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Atom, queue.clone());
        let changes = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&changes);
        registry.subscribe(move |_| *counter.borrow_mut() += 1);

        registry.remove(card("ghost"));
        queue.flush();

        assert!(registry.is_empty());
        assert_eq!(*changes.borrow(), 0);
    }

    #[test]
    fn observers_see_applied_state_and_can_unsubscribe() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Card, queue.clone());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let reader = registry.clone();
        let id = registry.subscribe(move |change| {
            sink.borrow_mut().push((change.clone(), reader.len()));
        });

        registry.add(card("a"));
        registry.remove(card("a"));
        queue.flush();

        assert_eq!(
            *seen.borrow(),
            vec![
                (RegistryChange::Added(card("a")), 1),
                (RegistryChange::Removed(card("a")), 0)
            ]
        );

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.add(card("b"));
        queue.flush();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn finds_descriptor_by_destination_id() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Card, queue.clone());
        registry.add(card("a"));
        queue.flush();

        assert_eq!(registry.find_by_destination("a"), Some(card("a")));
        assert!(registry.find_by_destination("b").is_none());
    }

    #[test]
    fn queued_tasks_do_not_keep_a_dropped_registry_alive() {
        let queue = UpdateQueue::new();
        let registry = EntityRegistry::new(EntityKind::Card, queue.clone());
        let state: Weak<_> = Rc::downgrade(&registry.state);
        registry.add(card("a"));
        registry.remove(card("a"));

        drop(registry);
        assert!(state.upgrade().is_none());
        assert_eq!(queue.flush(), 2);
    }
}
