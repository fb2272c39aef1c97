//! Handler bindings.
//!
//! An [`EventHandler`] binds a name, a type filter and a dispatch mode to a
//! callback. Bindings are shared as `Arc<EventHandler>`; two subscriptions are
//! the same logical subscription only if they point at the same allocation.
//! An [`IdleHandler`] runs when a loop iteration finds no event.

use crate::config::TaskSpawner;
use crate::event::{Event, EVENT_ALL};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Callback invoked for a matching event.
///
/// Returning `true` lets dispatch continue to the next matching handler;
/// `false` stops dispatch of this event.
pub type EventCallback = Arc<dyn Fn(&Event) -> bool + Send + Sync>;

/// Callback invoked on an idle loop iteration.
pub type IdleCallback = Arc<dyn Fn() + Send + Sync>;

/// How a handler's callback is run during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Run inline on the loop thread; the return value can stop dispatch.
    #[default]
    Sync,

    /// Launch as an independent task; dispatch always continues.
    FireAndForget,
}

/// A named, type-filtered event callback.
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, EventHandler, EVENT_ALL, EVENT_PRE_USER};
///
/// let logger = EventHandler::new(EVENT_ALL, "logger", |event: &Event| {
///     println!("saw {}", event);
///     true
/// });
///
/// assert!(logger.matches(&Event::empty(EVENT_PRE_USER + 1)));
/// ```
pub struct EventHandler {
    name: String,
    event_type: u64,
    mode: DispatchMode,
    callback: EventCallback,
}

impl EventHandler {
    /// Creates a synchronous handler for `event_type` (`EVENT_ALL` matches everything).
    pub fn new<S, F>(event_type: u64, name: S, callback: F) -> Arc<Self>
    where
        S: Into<String>,
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::with_mode(event_type, name, DispatchMode::Sync, callback)
    }

    /// Creates a fire-and-forget handler for `event_type`.
    pub fn fire_and_forget<S, F>(event_type: u64, name: S, callback: F) -> Arc<Self>
    where
        S: Into<String>,
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::with_mode(event_type, name, DispatchMode::FireAndForget, callback)
    }

    /// Creates a synchronous match-all handler, suited as a loop's default handler.
    pub fn fallback<S, F>(name: S, callback: F) -> Arc<Self>
    where
        S: Into<String>,
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Self::new(EVENT_ALL, name, callback)
    }

    /// Creates a handler with an explicit dispatch mode.
    pub fn with_mode<S, F>(event_type: u64, name: S, mode: DispatchMode, callback: F) -> Arc<Self>
    where
        S: Into<String>,
        F: Fn(&Event) -> bool + Send + Sync + 'static,
    {
        Arc::new(Self {
            name: name.into(),
            event_type,
            mode,
            callback: Arc::new(callback),
        })
    }

    /// Name of the binding, unique within a loop.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type filter of the binding.
    pub fn event_type(&self) -> u64 {
        self.event_type
    }

    /// Dispatch mode of the binding.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Returns whether this handler receives `event`.
    pub fn matches(&self, event: &Event) -> bool {
        self.event_type == EVENT_ALL || self.event_type == event.event_type()
    }

    /// Runs the callback according to the dispatch mode.
    ///
    /// Returns whether dispatch should continue. Fire-and-forget handlers
    /// always return `true`.
    pub(crate) fn invoke(&self, event: &Event, spawner: &TaskSpawner) -> bool {
        match self.mode {
            DispatchMode::FireAndForget => {
                trace!(handler = %self.name, "calling callback asynchronously");
                let callback = Arc::clone(&self.callback);
                let event = event.clone();
                spawner.spawn(&self.name, move || {
                    let _ = callback(&event);
                });
                true
            }
            DispatchMode::Sync => {
                trace!(handler = %self.name, "calling callback");
                let proceed = (self.callback)(event);
                if !proceed {
                    debug!(handler = %self.name, event = %event, "event processing complete");
                }
                proceed
            }
        }
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("name", &self.name)
            .field("event_type", &self.event_type)
            .field("mode", &self.mode)
            .finish()
    }
}

/// A named callback run when a loop iteration finds no event.
pub struct IdleHandler {
    name: String,
    callback: IdleCallback,
}

impl IdleHandler {
    /// Creates an idle handler.
    pub fn new<S, F>(name: S, callback: F) -> Arc<Self>
    where
        S: Into<String>,
        F: Fn() + Send + Sync + 'static,
    {
        Arc::new(Self {
            name: name.into(),
            callback: Arc::new(callback),
        })
    }

    /// Name of the handler.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self) {
        (self.callback)()
    }
}

impl fmt::Debug for IdleHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdleHandler").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EVENT_PRE_USER;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_type_filter() {
        let all = EventHandler::new(EVENT_ALL, "all", |_: &Event| true);
        let one = EventHandler::new(EVENT_PRE_USER + 1, "one", |_: &Event| true);

        let first = Event::empty(EVENT_PRE_USER + 1);
        let second = Event::empty(EVENT_PRE_USER + 2);

        assert!(all.matches(&first));
        assert!(all.matches(&second));
        assert!(one.matches(&first));
        assert!(!one.matches(&second));
    }

    #[test]
    fn test_sync_invoke_returns_callback_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handler = EventHandler::new(EVENT_ALL, "stopper", move |_: &Event| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        let proceed = handler.invoke(&Event::empty(EVENT_PRE_USER + 1), &TaskSpawner::Thread);
        assert!(!proceed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handler.mode(), DispatchMode::Sync);
    }

    #[test]
    fn test_fire_and_forget_always_continues() {
        let (sender, receiver) = mpsc::channel();
        let sender = std::sync::Mutex::new(sender);
        let handler = EventHandler::fire_and_forget(EVENT_ALL, "detached", move |event: &Event| {
            sender.lock().unwrap().send(event.event_type()).unwrap();
            false
        });

        let proceed = handler.invoke(&Event::empty(EVENT_PRE_USER + 9), &TaskSpawner::Thread);
        assert!(proceed);
        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(5)),
            Ok(EVENT_PRE_USER + 9)
        );
    }

    #[test]
    fn test_fallback_is_sync_match_all() {
        let handler = EventHandler::fallback("fallback", |_: &Event| true);
        assert_eq!(handler.event_type(), EVENT_ALL);
        assert_eq!(handler.mode(), DispatchMode::Sync);
        assert_eq!(handler.name(), "fallback");
    }

    #[test]
    fn test_idle_handler_invoke() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let idle = IdleHandler::new("idle", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        idle.invoke();
        idle.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(idle.name(), "idle");
    }
}
