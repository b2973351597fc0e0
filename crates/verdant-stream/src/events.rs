//! Chunk lifecycle notifications.
//!
//! Observers are notified synchronously, in registration order, after each
//! chunk transition completes. Registering or removing observers needs
//! `&mut` access to the list, so it cannot happen during a notification.

use crate::chunk_index::ChunkIndex;

/// A completed chunk transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkEvent {
    /// The chunk's terrain and flora were added to the world.
    Materialized {
        /// The chunk.
        chunk: ChunkIndex,
        /// Ground blocks added.
        ground: usize,
        /// Trunk, leaf, and fruit entities added.
        flora: usize,
    },
    /// The chunk's entities were retracted from the world.
    Evicted {
        /// The chunk.
        chunk: ChunkIndex,
        /// Ground blocks removed.
        ground: usize,
        /// Trunk, leaf, and fruit entities removed.
        flora: usize,
    },
}

impl ChunkEvent {
    /// Chunk this event concerns.
    pub fn chunk(&self) -> ChunkIndex {
        match self {
            ChunkEvent::Materialized { chunk, .. } | ChunkEvent::Evicted { chunk, .. } => *chunk,
        }
    }

    /// Total entities added or removed.
    pub fn entity_count(&self) -> usize {
        match self {
            ChunkEvent::Materialized { ground, flora, .. }
            | ChunkEvent::Evicted { ground, flora, .. } => ground + flora,
        }
    }
}

/// Receives chunk lifecycle events.
pub trait ChunkObserver {
    /// Called once per transition.
    fn on_chunk_event(&mut self, event: &ChunkEvent);
}

impl<F: FnMut(&ChunkEvent)> ChunkObserver for F {
    fn on_chunk_event(&mut self, event: &ChunkEvent) {
        self(event)
    }
}

/// Handle returned by [`Subscribers::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Ordered list of observers.
#[derive(Default)]
pub struct Subscribers {
    entries: Vec<(SubscriberId, Box<dyn ChunkObserver>)>,
    next_id: u64,
}

impl Subscribers {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observer. It will be notified after all earlier ones.
    pub fn subscribe(&mut self, observer: Box<dyn ChunkObserver>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Remove an observer. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Deliver `event` to every observer in registration order.
    pub fn notify(&mut self, event: &ChunkEvent) {
        for (_, observer) in &mut self.entries {
            observer.on_chunk_event(event);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn event(c: i64) -> ChunkEvent {
        ChunkEvent::Materialized {
            chunk: ChunkIndex(c),
            ground: 540,
            flora: 0,
        }
    }

    #[test]
    fn test_notified_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Subscribers::new();
        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            subs.subscribe(Box::new(move |e: &ChunkEvent| {
                log.borrow_mut().push((name, e.chunk()));
            }));
        }

        subs.notify(&event(4));

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", ChunkIndex(4)),
                ("second", ChunkIndex(4)),
                ("third", ChunkIndex(4)),
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut subs = Subscribers::new();
        let counter = Rc::clone(&count);
        let id = subs.subscribe(Box::new(move |_: &ChunkEvent| *counter.borrow_mut() += 1));

        subs.notify(&event(0));
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.notify(&event(1));

        assert_eq!(*count.borrow(), 1);
        assert!(subs.is_empty());
    }

    #[test]
    fn test_event_accessors() {
        let e = ChunkEvent::Evicted {
            chunk: ChunkIndex(-2),
            ground: 540,
            flora: 56,
        };
        assert_eq!(e.chunk(), ChunkIndex(-2));
        assert_eq!(e.entity_count(), 596);
    }
}
