//! Externally polled event sources.
//!
//! A [`Source`] is owned by the host and shared with the loop. Once per loop
//! iteration the [`SourceRegistry`] polls every registered source in
//! registration order and hands the collected events to the queue.

use crate::event::Event;
use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// A host-supplied capability polled by the event loop.
///
/// Implementations use interior mutability: the loop only holds a shared
/// reference and never mutates a source other than through these methods.
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, Source, EVENT_PRE_USER};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct OneShot {
///     fired: AtomicBool,
/// }
///
/// impl Source for OneShot {
///     fn id(&self) -> String {
///         "one-shot".to_string()
///     }
///
///     fn poll(&self) -> Option<Vec<Event>> {
///         if self.fired.swap(true, Ordering::SeqCst) {
///             return None;
///         }
///         Some(vec![Event::empty(EVENT_PRE_USER + 1)])
///     }
///
///     fn is_exhausted(&self) -> bool {
///         self.fired.load(Ordering::SeqCst)
///     }
/// }
/// ```
pub trait Source: Send + Sync + 'static {
    /// Identifier used in logs.
    fn id(&self) -> String;

    /// Returns the events ready right now, or `None` if there are none.
    ///
    /// Must not block indefinitely: the loop stalls for as long as a poll
    /// runs.
    fn poll(&self) -> Option<Vec<Event>>;

    /// Returns `true` once the source will never yield again.
    fn is_exhausted(&self) -> bool;
}

/// Shared handle to a registered source.
pub type SharedSource = Arc<dyn Source>;

/// Thread-safe, append-only collection of sources.
///
/// Sources are kept in registration order without de-duplication. There is no
/// removal: a source that is done reports itself exhausted instead.
pub struct SourceRegistry {
    id: String,
    sources: Mutex<Vec<SharedSource>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            sources: Mutex::new(Vec::new()),
        }
    }

    /// Identifier of this registry.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Registers a source.
    pub fn add(&self, source: SharedSource) {
        self.lock().push(source);
    }

    /// Polls every source in registration order.
    ///
    /// The registry lock is held for the whole sweep. Returns `None` only if
    /// every source returned nothing.
    pub fn drain(&self) -> Option<Vec<Event>> {
        let sources = self.lock();
        let mut events = Vec::new();

        for source in sources.iter() {
            if let Some(batch) = source.poll() {
                if batch.is_empty() {
                    continue;
                }
                debug!(
                    registry = %self.id,
                    source = %source.id(),
                    count = batch.len(),
                    "received events from source"
                );
                events.extend(batch);
            }
        }

        if events.is_empty() {
            None
        } else {
            Some(events)
        }
    }

    /// Returns `true` iff every registered source is exhausted.
    pub fn is_exhausted(&self) -> bool {
        let sources = self.lock();
        for source in sources.iter() {
            if !source.is_exhausted() {
                trace!(registry = %self.id, source = %source.id(), "source is not exhausted");
                return false;
            }
        }
        true
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no source is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Identifiers of the registered sources, in registration order.
    pub fn source_ids(&self) -> Vec<String> {
        self.lock().iter().map(|source| source.id()).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SharedSource>> {
        self.sources.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("id", &self.id)
            .field("sources", &self.source_ids())
            .finish()
    }
}

struct ChannelState {
    receiver: Receiver<Event>,
    buffered: VecDeque<Event>,
    disconnected: bool,
}

/// Source fed through a standard library channel.
///
/// Exhausted once every sender is dropped and all sent events were polled.
///
/// # Examples
///
/// ```rust
/// use evloop::{ChannelSource, Event, Source, EVENT_PRE_USER};
///
/// let (sender, source) = ChannelSource::pair("worker");
/// sender.send(Event::empty(EVENT_PRE_USER + 1)).unwrap();
/// drop(sender);
///
/// assert_eq!(source.poll().map(|events| events.len()), Some(1));
/// assert!(source.is_exhausted());
/// ```
pub struct ChannelSource {
    id: String,
    state: Mutex<ChannelState>,
}

impl ChannelSource {
    /// Wraps an existing receiver.
    pub fn new<S: Into<String>>(id: S, receiver: Receiver<Event>) -> Self {
        Self {
            id: id.into(),
            state: Mutex::new(ChannelState {
                receiver,
                buffered: VecDeque::new(),
                disconnected: false,
            }),
        }
    }

    /// Creates a channel and returns its sender with the source reading it.
    pub fn pair<S: Into<String>>(id: S) -> (Sender<Event>, Self) {
        let (sender, receiver) = mpsc::channel();
        (sender, Self::new(id, receiver))
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Source for ChannelSource {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn poll(&self) -> Option<Vec<Event>> {
        let mut state = self.lock();
        let mut events: Vec<Event> = state.buffered.drain(..).collect();

        while !state.disconnected {
            match state.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => state.disconnected = true,
            }
        }

        if events.is_empty() {
            None
        } else {
            Some(events)
        }
    }

    fn is_exhausted(&self) -> bool {
        let mut state = self.lock();
        if !state.buffered.is_empty() {
            return false;
        }
        if state.disconnected {
            return true;
        }

        match state.receiver.try_recv() {
            Ok(event) => {
                state.buffered.push_back(event);
                false
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                state.disconnected = true;
                true
            }
        }
    }
}

impl fmt::Debug for ChannelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSource").field("id", &self.id).finish()
    }
}

#[cfg(feature = "async")]
pub use stream::StreamSource;

#[cfg(feature = "async")]
mod stream {
    use super::Source;
    use crate::event::Event;
    use futures::{FutureExt, Stream, StreamExt};
    use std::fmt;
    use std::sync::{Mutex, PoisonError};

    /// Source reading from an async stream without blocking the loop.
    ///
    /// Each poll collects the items that are ready immediately. The source is
    /// exhausted once the stream has ended.
    pub struct StreamSource<S> {
        id: String,
        stream: Mutex<Option<S>>,
    }

    impl<S> StreamSource<S>
    where
        S: Stream<Item = Event> + Unpin + Send + 'static,
    {
        /// Wraps `stream`.
        pub fn new<I: Into<String>>(id: I, stream: S) -> Self {
            Self {
                id: id.into(),
                stream: Mutex::new(Some(stream)),
            }
        }
    }

    impl<S> Source for StreamSource<S>
    where
        S: Stream<Item = Event> + Unpin + Send + 'static,
    {
        fn id(&self) -> String {
            self.id.clone()
        }

        fn poll(&self) -> Option<Vec<Event>> {
            let mut slot = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
            let mut events = Vec::new();

            while let Some(stream) = slot.as_mut() {
                match stream.next().now_or_never() {
                    Some(Some(event)) => events.push(event),
                    Some(None) => *slot = None,
                    None => break,
                }
            }

            if events.is_empty() {
                None
            } else {
                Some(events)
            }
        }

        fn is_exhausted(&self) -> bool {
            self.stream
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .is_none()
        }
    }

    impl<S> fmt::Debug for StreamSource<S> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("StreamSource").field("id", &self.id).finish()
        }
    }
}
