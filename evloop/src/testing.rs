//! Testing utilities for evloop applications.
//!
//! Small, deterministic sources and callback counters for exercising an
//! [`EventLoop`](crate::EventLoop) in tests.

use crate::event::Event;
use crate::source::Source;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// A source that yields prepared batches and then reports itself exhausted.
///
/// Optionally returns nothing for a number of warm-up polls first.
///
/// # Examples
///
/// ```rust
/// use evloop::testing::ScriptedSource;
/// use evloop::Source;
///
/// let source = ScriptedSource::once("ticks", vec![101, 102]).with_warmup(1);
/// assert!(source.poll().is_none());
/// assert_eq!(source.poll().map(|events| events.len()), Some(2));
/// assert!(source.is_exhausted());
/// assert_eq!(source.poll_count(), 2);
/// ```
#[derive(Debug)]
pub struct ScriptedSource {
    id: String,
    batches: Mutex<VecDeque<Vec<Event>>>,
    warmup: AtomicUsize,
    polls: AtomicUsize,
}

impl ScriptedSource {
    /// Creates a source yielding `batches`, one per poll.
    pub fn new<S: Into<String>>(id: S, batches: Vec<Vec<Event>>) -> Self {
        Self {
            id: id.into(),
            batches: Mutex::new(batches.into()),
            warmup: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
        }
    }

    /// Creates a source yielding one payload-less event per type, all in the first poll.
    ///
    /// An empty `event_types` gives a source that is exhausted from the start.
    pub fn once<S: Into<String>>(id: S, event_types: Vec<u64>) -> Self {
        let batches = if event_types.is_empty() {
            Vec::new()
        } else {
            vec![event_types.into_iter().map(Event::empty).collect()]
        };
        Self::new(id, batches)
    }

    /// Returns nothing for the first `polls` polls.
    pub fn with_warmup(self, polls: usize) -> Self {
        self.warmup.store(polls, Ordering::SeqCst);
        self
    }

    /// Number of times the source was polled.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl Source for ScriptedSource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn poll(&self) -> Option<Vec<Event>> {
        self.polls.fetch_add(1, Ordering::SeqCst);

        let warming_up = self
            .warmup
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if warming_up {
            return None;
        }

        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .filter(|batch| !batch.is_empty())
    }

    fn is_exhausted(&self) -> bool {
        self.warmup.load(Ordering::SeqCst) == 0
            && self
                .batches
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_empty()
    }
}

/// A source that never yields and stays live until [`close`](Self::close)d.
///
/// Keeps a loop from ever becoming empty.
#[derive(Debug)]
pub struct EndlessSource {
    id: String,
    closed: AtomicBool,
    polls: AtomicUsize,
}

impl EndlessSource {
    /// Creates an open source.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            closed: AtomicBool::new(false),
            polls: AtomicUsize::new(0),
        }
    }

    /// Marks the source exhausted.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Number of times the source was polled.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl Source for EndlessSource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn poll(&self) -> Option<Vec<Event>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        None
    }

    fn is_exhausted(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Shared counter that hands out counting callbacks.
///
/// # Examples
///
/// ```rust
/// use evloop::testing::CallCounter;
/// use evloop::{Event, EVENT_PRE_USER};
///
/// let counter = CallCounter::new();
/// let callback = counter.handler_callback(true);
/// assert!(callback(&Event::empty(EVENT_PRE_USER + 1)));
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Event callback that counts each call and returns `proceed`.
    pub fn handler_callback(&self, proceed: bool) -> impl Fn(&Event) -> bool + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move |_event: &Event| {
            calls.fetch_add(1, Ordering::SeqCst);
            proceed
        }
    }

    /// Idle callback that counts each call.
    pub fn idle_callback(&self) -> impl Fn() + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_batches() {
        let source = ScriptedSource::new(
            "batches",
            vec![vec![Event::empty(101)], vec![], vec![Event::empty(102), Event::empty(103)]],
        );

        assert_eq!(source.poll().map(|events| events.len()), Some(1));
        assert!(!source.is_exhausted());
        assert!(source.poll().is_none());
        assert_eq!(source.poll().map(|events| events.len()), Some(2));
        assert!(source.is_exhausted());
        assert!(source.poll().is_none());
        assert_eq!(source.poll_count(), 4);
    }

    #[test]
    fn test_warmup_delays_exhaustion() {
        let source = ScriptedSource::once("late", vec![]).with_warmup(2);
        assert!(!source.is_exhausted());
        assert!(source.poll().is_none());
        assert!(source.poll().is_none());
        assert!(source.is_exhausted());
    }

    #[test]
    fn test_endless_source_close() {
        let source = EndlessSource::new("endless");
        assert!(source.poll().is_none());
        assert!(!source.is_exhausted());
        source.close();
        assert!(source.is_exhausted());
        assert_eq!(source.poll_count(), 1);
    }

    #[test]
    fn test_call_counter_shared_between_clones() {
        let counter = CallCounter::new();
        let idle = counter.clone().idle_callback();
        idle();
        idle();
        assert_eq!(counter.count(), 2);
    }
}
