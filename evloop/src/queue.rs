//! Unbounded FIFO of pending events.

use crate::event::Event;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe, unbounded FIFO queue of events.
///
/// Every operation takes the internal lock for its own duration only. Events
/// enqueued by a single caller keep their relative order; events from
/// concurrent callers are ordered by lock acquisition.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(100)),
        }
    }

    /// Appends an event at the tail.
    pub fn enqueue(&self, event: Event) {
        self.lock().push_back(event);
    }

    /// Appends a batch of events at the tail, keeping their order.
    pub fn enqueue_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        self.lock().extend(events);
    }

    /// Removes and returns the head event, or `None` if the queue is empty.
    pub fn dequeue(&self) -> Option<Event> {
        self.lock().pop_front()
    }

    /// Returns whether the queue holds no events.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EVENT_PRE_USER;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    fn event(offset: u64) -> Event {
        Event::empty(EVENT_PRE_USER + offset)
    }

    #[test]
    fn test_dequeue_empty() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.enqueue(event(1));
        queue.enqueue_all(vec![event(2), event(3)]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dequeue().map(|e| e.event_type()), Some(101));
        assert_eq!(queue.dequeue().map(|e| e.event_type()), Some(102));
        assert_eq!(queue.dequeue().map(|e| e.event_type()), Some(103));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        let queue = Arc::new(EventQueue::new());
        let producers: Vec<_> = (0..4u64)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..250u64 {
                        queue.enqueue(Event::new(EVENT_PRE_USER + 1 + producer, i));
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }

        let mut last_seen = [None::<u64>; 4];
        let mut total = 0;
        while let Some(event) = queue.dequeue() {
            let producer = (event.event_type() - EVENT_PRE_USER - 1) as usize;
            let sequence = *event.payload::<u64>().unwrap();
            if let Some(previous) = last_seen[producer] {
                assert!(sequence > previous);
            }
            last_seen[producer] = Some(sequence);
            total += 1;
        }
        assert_eq!(total, 1000);
    }

    proptest! {
        #[test]
        fn prop_dequeue_matches_enqueue_order(offsets in prop::collection::vec(1u64..10_000, 0..64)) {
            let queue = EventQueue::new();
            for offset in &offsets {
                queue.enqueue(event(*offset));
            }

            let drained: Vec<u64> = std::iter::from_fn(|| queue.dequeue())
                .map(|e| e.event_type() - EVENT_PRE_USER)
                .collect();
            prop_assert_eq!(drained, offsets);
        }
    }
}
