//! The event loop: lifecycle, run task and dispatch.
//!
//! An [`EventLoop`] owns a queue, a source registry and a handler registry.
//! [`start`](EventLoop::start) launches a dedicated run thread which, on each
//! iteration, polls the sources, dequeues one event and dispatches it to the
//! matching handlers. Every other operation may be called concurrently from
//! any thread.
//!
//! # Examples
//!
//! ```rust
//! use evloop::{Event, EventHandler, EventLoop, EVENT_ALL, EVENT_PRE_USER};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//!
//! let event_loop = EventLoop::new("example");
//! event_loop.subscribe(EventHandler::new(EVENT_ALL, "counter", move |_: &Event| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     true
//! }));
//!
//! event_loop.start();
//! event_loop.send(Event::empty(EVENT_PRE_USER + 1));
//! event_loop.send(Event::empty(EVENT_PRE_USER + 2));
//!
//! assert_eq!(event_loop.stop_and_join(0), 0);
//! assert_eq!(seen.load(Ordering::SeqCst), 2);
//! ```

use crate::config::{EventLoopConfig, TaskSpawner};
use crate::error::{LoopError, LoopResult};
use crate::event::Event;
use crate::handler::{EventHandler, IdleHandler};
use crate::queue::EventQueue;
use crate::registry::{HandlerRegistry, Registration};
use crate::source::{SharedSource, SourceRegistry};

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, trace};

const PHASE_IDLE: u8 = 0;
const PHASE_RUNNING: u8 = 1;
const PHASE_STOPPED: u8 = 2;

/// Lifecycle state of an [`EventLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not started.
    Idle,
    /// The run task is executing.
    Running,
    /// A stop was requested; the run task is still draining.
    StopRequested,
    /// The run task exited.
    Stopped,
}

/// Handshake values sent by the run task to the thread that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopSignal {
    Started,
    Stopped,
}

impl fmt::Display for LoopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopSignal::Started => write!(f, "started"),
            LoopSignal::Stopped => write!(f, "stopped"),
        }
    }
}

/// State shared between the loop handles and the run thread.
struct LoopShared {
    name: String,
    config: EventLoopConfig,

    queue: EventQueue,
    sources: SourceRegistry,
    handlers: HandlerRegistry,
    default_handler: Mutex<Option<Arc<EventHandler>>>,
    idle_handler: Mutex<Option<Arc<IdleHandler>>>,

    started: AtomicBool,
    joinable: AtomicBool,
    phase: AtomicU8,
    stop_requested: AtomicBool,
    exit_code: AtomicI32,

    signals: Mutex<Option<Receiver<LoopSignal>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Leaves the running phase and reports it, including when a handler panics.
struct RunGuard<'a> {
    shared: &'a LoopShared,
    signals: Option<Sender<LoopSignal>>,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.shared.phase.store(PHASE_STOPPED, Ordering::SeqCst);
        info!(event_loop = %self.shared.name, "left event loop");
        if let Some(signals) = &self.signals {
            let _ = signals.send(LoopSignal::Stopped);
        }
    }
}

impl LoopShared {
    fn run(&self, signals: Option<Sender<LoopSignal>>) {
        self.phase.store(PHASE_RUNNING, Ordering::SeqCst);
        info!(event_loop = %self.name, joinable = signals.is_some(), "entered event loop");
        if let Some(signals) = &signals {
            let _ = signals.send(LoopSignal::Started);
        }

        let joinable = signals.is_some();
        let _guard = RunGuard {
            shared: self,
            signals,
        };

        loop {
            if self.stop_requested.load(Ordering::SeqCst) {
                if !joinable || self.is_empty() {
                    debug!(event_loop = %self.name, "stop requested, leaving event loop");
                    break;
                }
                debug!(event_loop = %self.name, "waiting for pending events processing");
            }

            match self.next_event() {
                Some(event) => {
                    if self.dispatch(&event) == 0 {
                        debug!(
                            event_loop = %self.name,
                            event = %event,
                            "no handlers for event, ignoring"
                        );
                    }
                }
                None => self.idle(),
            }
        }
    }

    fn next_event(&self) -> Option<Event> {
        if let Some(events) = self.sources.drain() {
            self.queue.enqueue_all(events);
        }
        self.queue.dequeue()
    }

    /// Delivers `event` to matching handlers and returns how many matched.
    fn dispatch(&self, event: &Event) -> usize {
        let spawner = &self.config.spawner;
        let mut matched = 0;

        self.handlers.for_each(|handler| {
            if !handler.matches(event) {
                return true;
            }

            trace!(
                event_loop = %self.name,
                event = %event,
                handler = %handler.name(),
                "handling event"
            );
            matched += 1;
            let proceed = handler.invoke(event, spawner);
            trace!(event_loop = %self.name, proceed, "callback result");
            proceed
        });

        if matched == 0 {
            if let Some(fallback) = self.default_handler() {
                trace!(
                    event_loop = %self.name,
                    event = %event,
                    handler = %fallback.name(),
                    "handling event by default handler"
                );
                fallback.invoke(event, spawner);
            }
        }

        matched
    }

    fn idle(&self) {
        match self.idle_handler() {
            Some(handler) => {
                trace!(event_loop = %self.name, handler = %handler.name(), "calling idle handler");
                handler.invoke();
            }
            None => thread::sleep(self.config.idle_delay),
        }
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty() && self.sources.is_exhausted()
    }

    fn default_handler(&self) -> Option<Arc<EventHandler>> {
        lock(&self.default_handler).clone()
    }

    fn idle_handler(&self) -> Option<Arc<IdleHandler>> {
        lock(&self.idle_handler).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-threaded event dispatch loop.
///
/// `EventLoop` is a cheap handle: clones refer to the same loop, so a clone
/// can be moved into a handler to stop the loop from inside a callback.
///
/// Misuse of the lifecycle (starting twice, joining a loop that was never
/// started, conflicting handler names) panics. Each panicking operation has a
/// `try_*` twin returning the [`LoopError`] instead.
///
/// A loop left running keeps its run thread alive; stop it before dropping
/// the last handle.
#[derive(Clone)]
pub struct EventLoop {
    shared: Arc<LoopShared>,
}

impl EventLoop {
    /// Creates a loop with default configuration.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::builder(name).build()
    }

    /// Creates a loop with the given configuration.
    pub fn with_config<S: Into<String>>(name: S, config: EventLoopConfig) -> Self {
        Self::builder(name).config(config).build()
    }

    /// Starts building a loop.
    pub fn builder<S: Into<String>>(name: S) -> EventLoopBuilder {
        EventLoopBuilder::new(name)
    }

    fn from_parts(
        name: String,
        config: EventLoopConfig,
        default_handler: Option<Arc<EventHandler>>,
        idle_handler: Option<Arc<IdleHandler>>,
    ) -> Self {
        let shared = LoopShared {
            queue: EventQueue::new(),
            sources: SourceRegistry::new(format!("{}.sources", name)),
            handlers: HandlerRegistry::new(name.clone()),
            default_handler: Mutex::new(default_handler),
            idle_handler: Mutex::new(idle_handler),
            started: AtomicBool::new(false),
            joinable: AtomicBool::new(false),
            phase: AtomicU8::new(PHASE_IDLE),
            stop_requested: AtomicBool::new(false),
            exit_code: AtomicI32::new(0),
            signals: Mutex::new(None),
            worker: Mutex::new(None),
            config,
            name,
        };

        info!(event_loop = %shared.name, "created event loop");
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Name of the loop.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Configuration of the loop.
    pub fn config(&self) -> &EventLoopConfig {
        &self.shared.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        match self.shared.phase.load(Ordering::SeqCst) {
            PHASE_IDLE => LoopState::Idle,
            PHASE_RUNNING if self.shared.stop_requested.load(Ordering::SeqCst) => {
                LoopState::StopRequested
            }
            PHASE_RUNNING => LoopState::Running,
            _ => LoopState::Stopped,
        }
    }

    /// Returns whether the loop was started with a synchronization channel.
    pub fn is_joinable(&self) -> bool {
        self.shared.joinable.load(Ordering::SeqCst)
    }

    /// The exit code recorded by the last [`stop`](Self::stop), if any.
    pub fn exit_code(&self) -> Option<i32> {
        self.shared
            .stop_requested
            .load(Ordering::SeqCst)
            .then(|| self.shared.exit_code.load(Ordering::SeqCst))
    }

    /// Number of subscribed handlers.
    pub fn handler_count(&self) -> usize {
        self.shared.handlers.len()
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.shared.sources.len()
    }

    /// Number of events waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.shared.queue.len()
    }

    /// Subscribes `handler` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if a different handler with the same name is subscribed.
    pub fn subscribe(&self, handler: Arc<EventHandler>) -> Arc<EventHandler> {
        match self.try_subscribe(handler) {
            Ok(handler) => handler,
            Err(error) => panic!("{}", error),
        }
    }

    /// Subscribes `handler`, reporting a name conflict as an error.
    ///
    /// Subscribing the same handler twice is a no-op.
    pub fn try_subscribe(&self, handler: Arc<EventHandler>) -> LoopResult<Arc<EventHandler>> {
        match self.shared.handlers.add(Arc::clone(&handler))? {
            Registration::Added => {
                info!(event_loop = %self.shared.name, handler = %handler.name(), "handler subscribed");
            }
            Registration::AlreadyPresent => {
                debug!(
                    event_loop = %self.shared.name,
                    handler = %handler.name(),
                    "handler already subscribed"
                );
            }
        }
        Ok(handler)
    }

    /// Removes the handler subscribed under `handler`'s name and returns `handler`.
    ///
    /// A no-op if nothing is subscribed under that name.
    pub fn unsubscribe(&self, handler: &Arc<EventHandler>) -> Arc<EventHandler> {
        match self.shared.handlers.remove(handler.name()) {
            Some(_) => {
                info!(event_loop = %self.shared.name, handler = %handler.name(), "handler unsubscribed");
            }
            None => {
                debug!(
                    event_loop = %self.shared.name,
                    handler = %handler.name(),
                    "handler is not subscribed"
                );
            }
        }
        Arc::clone(handler)
    }

    /// Waits for the loop to become empty with [`sync(0)`](Self::sync), then unsubscribes.
    ///
    /// Meant for deterministic teardown in tests.
    pub fn unsubscribe_sync(&self, handler: &Arc<EventHandler>) -> Arc<EventHandler> {
        self.sync(0);
        self.unsubscribe(handler)
    }

    /// Sets the handler receiving events no subscribed handler matched.
    ///
    /// # Panics
    ///
    /// Panics if a different default handler is already set.
    pub fn set_default_handler(&self, handler: Arc<EventHandler>) -> &Self {
        if let Err(error) = self.try_set_default_handler(handler) {
            panic!("{}", error);
        }
        self
    }

    /// Sets the default handler, reporting a conflict as an error.
    pub fn try_set_default_handler(&self, handler: Arc<EventHandler>) -> LoopResult<&Self> {
        let mut slot = lock(&self.shared.default_handler);
        if let Some(existing) = slot.as_ref() {
            if !Arc::ptr_eq(existing, &handler) {
                return Err(LoopError::default_handler_conflict(
                    self.shared.name.as_str(),
                    existing.name(),
                ));
            }
        }

        info!(event_loop = %self.shared.name, handler = %handler.name(), "default handler set");
        *slot = Some(handler);
        Ok(self)
    }

    /// Sets the handler run on iterations that find no event.
    ///
    /// # Panics
    ///
    /// Panics if a different idle handler is already set.
    pub fn set_idle_handler(&self, handler: Arc<IdleHandler>) -> &Self {
        if let Err(error) = self.try_set_idle_handler(handler) {
            panic!("{}", error);
        }
        self
    }

    /// Sets the idle handler, reporting a conflict as an error.
    pub fn try_set_idle_handler(&self, handler: Arc<IdleHandler>) -> LoopResult<&Self> {
        let mut slot = lock(&self.shared.idle_handler);
        if let Some(existing) = slot.as_ref() {
            if !Arc::ptr_eq(existing, &handler) {
                return Err(LoopError::idle_handler_conflict(
                    self.shared.name.as_str(),
                    existing.name(),
                ));
            }
        }

        info!(event_loop = %self.shared.name, handler = %handler.name(), "idle handler set");
        *slot = Some(handler);
        Ok(self)
    }

    /// Registers a source polled on every iteration.
    pub fn add_source(&self, source: SharedSource) -> &Self {
        info!(
            event_loop = %self.shared.name,
            registry = %self.shared.sources.id(),
            source = %source.id(),
            "add event source"
        );
        self.shared.sources.add(source);
        self
    }

    /// Queues an event for dispatch.
    pub fn send(&self, event: Event) -> &Self {
        debug!(event_loop = %self.shared.name, event = %event, "send event to event loop");
        self.shared.queue.enqueue(event);
        self
    }

    /// Returns whether the queue is empty and every source is exhausted.
    ///
    /// A snapshot; it can be stale by the time the caller looks at it.
    pub fn is_empty(&self) -> bool {
        self.shared.is_empty()
    }

    /// Starts the run thread and waits until it is running.
    ///
    /// # Panics
    ///
    /// Panics if the loop was already started or run.
    pub fn start(&self) -> &Self {
        if let Err(error) = self.try_start() {
            panic!("{}", error);
        }
        self
    }

    /// Starts the run thread, reporting lifecycle misuse as an error.
    pub fn try_start(&self) -> LoopResult<&Self> {
        let shared = &self.shared;
        if shared.started.swap(true, Ordering::SeqCst) {
            return Err(LoopError::already_started(shared.name.as_str()));
        }

        info!(event_loop = %shared.name, "start event loop");

        // Held until the handshake completes so a concurrent join waits for it.
        let mut signals = lock(&shared.signals);
        let (sender, receiver) = mpsc::channel();

        let worker = match self.spawn_worker(sender) {
            Ok(worker) => worker,
            Err(error) => {
                // Nothing runs yet, so a later start may try again.
                shared.started.store(false, Ordering::SeqCst);
                return Err(error);
            }
        };
        *lock(&shared.worker) = Some(worker);
        shared.joinable.store(true, Ordering::SeqCst);

        match receiver.recv() {
            Ok(LoopSignal::Started) => {}
            Ok(other) => {
                return Err(LoopError::unexpected_signal(
                    shared.name.clone(),
                    LoopSignal::Started.to_string(),
                    other.to_string(),
                ))
            }
            Err(_) => {
                return Err(LoopError::unexpected_signal(
                    shared.name.clone(),
                    LoopSignal::Started.to_string(),
                    "disconnected".to_string(),
                ))
            }
        }

        *signals = Some(receiver);
        Ok(self)
    }

    fn spawn_worker(&self, signals: Sender<LoopSignal>) -> LoopResult<JoinHandle<()>> {
        let shared = &self.shared;
        let mut builder = thread::Builder::new();
        if let Some(thread_name) = &shared.config.thread_name {
            if thread_name.contains('\0') {
                return Err(LoopError::spawn_failed(
                    shared.name.clone(),
                    format!("thread name {:?} contains a NUL byte", thread_name),
                ));
            }
            builder = builder.name(thread_name.clone());
        }

        let runner = Arc::clone(shared);
        builder
            .spawn(move || runner.run(Some(signals)))
            .map_err(|error| LoopError::spawn_failed(shared.name.clone(), error.to_string()))
    }

    /// Runs the loop on the calling thread until a stop is observed.
    ///
    /// The loop is not joinable: it exits as soon as the stop flag is seen,
    /// even with events still pending. Stop it from another handle or from a
    /// handler.
    ///
    /// # Panics
    ///
    /// Panics if the loop was already started or run.
    pub fn run(&self) {
        if let Err(error) = self.try_run() {
            panic!("{}", error);
        }
    }

    /// Runs the loop on the calling thread, reporting lifecycle misuse as an error.
    pub fn try_run(&self) -> LoopResult<()> {
        if self.shared.started.swap(true, Ordering::SeqCst) {
            return Err(LoopError::already_started(self.shared.name.as_str()));
        }

        self.shared.run(None);
        Ok(())
    }

    /// Requests the loop to stop with `exit_code`.
    ///
    /// Can be called at any time and more than once; the last code wins.
    pub fn stop(&self, exit_code: i32) {
        info!(event_loop = %self.shared.name, exit_code, "stop event loop");
        self.shared.exit_code.store(exit_code, Ordering::SeqCst);
        self.shared.stop_requested.store(true, Ordering::SeqCst);
    }

    /// Blocks until the run thread stops and returns the exit code.
    ///
    /// Without a prior [`stop`](Self::stop) this waits until another caller
    /// stops the loop. Must not be called from a handler of the same loop.
    ///
    /// # Panics
    ///
    /// Panics if the loop was not started, or re-raises a panic that
    /// escaped a handler on the run thread.
    pub fn join(&self) -> i32 {
        match self.try_join() {
            Ok(exit_code) => exit_code,
            Err(error) => panic!("{}", error),
        }
    }

    /// Blocks until the run thread stops, reporting lifecycle misuse as an error.
    ///
    /// A panic that escaped a handler on the run thread is re-raised here.
    pub fn try_join(&self) -> LoopResult<i32> {
        let shared = &self.shared;
        if !self.is_joinable() {
            return Err(LoopError::not_joinable(shared.name.as_str()));
        }

        {
            let signals = lock(&shared.signals);
            let receiver = signals
                .as_ref()
                .ok_or_else(|| LoopError::not_joinable(shared.name.as_str()))?;

            match receiver.recv() {
                Ok(LoopSignal::Stopped) => {}
                Ok(other) => {
                    return Err(LoopError::unexpected_signal(
                        shared.name.clone(),
                        LoopSignal::Stopped.to_string(),
                        other.to_string(),
                    ))
                }
                // The stop signal was consumed by an earlier join.
                Err(_) if shared.phase.load(Ordering::SeqCst) == PHASE_STOPPED => {}
                Err(_) => {
                    return Err(LoopError::unexpected_signal(
                        shared.name.clone(),
                        LoopSignal::Stopped.to_string(),
                        "disconnected".to_string(),
                    ))
                }
            }
        }

        let worker = lock(&shared.worker).take();
        if let Some(worker) = worker {
            if let Err(panic) = worker.join() {
                std::panic::resume_unwind(panic);
            }
        }

        self.exit_code()
            .ok_or_else(|| LoopError::missing_exit_code(shared.name.as_str()))
    }

    /// Stops the loop and waits for it; returns the exit code.
    pub fn stop_and_join(&self, exit_code: i32) -> i32 {
        self.stop(exit_code);
        self.join()
    }

    /// Waits until the loop is empty, polling every `sync_interval`.
    ///
    /// Gives up after `max_iterations` polls (`0` means no limit) or once the
    /// run task has exited, and returns the final [`is_empty`](Self::is_empty).
    /// A requested stop does not end the wait while the loop is still draining.
    /// Best-effort quiescence detection, not a consistency barrier.
    ///
    /// # Panics
    ///
    /// Panics if the loop was not started.
    pub fn sync(&self, max_iterations: usize) -> bool {
        match self.try_sync(max_iterations) {
            Ok(empty) => empty,
            Err(error) => panic!("{}", error),
        }
    }

    /// Waits until the loop is empty, reporting lifecycle misuse as an error.
    pub fn try_sync(&self, max_iterations: usize) -> LoopResult<bool> {
        if !self.is_joinable() {
            return Err(LoopError::not_joinable(self.shared.name.as_str()));
        }

        debug!(event_loop = %self.shared.name, max_iterations, "sync with event loop");

        let mut iterations = 0;
        while self.keep_syncing() {
            thread::sleep(self.shared.config.sync_interval);
            iterations += 1;
            if max_iterations > 0 && iterations >= max_iterations {
                break;
            }
        }

        let empty = self.is_empty();
        debug!(event_loop = %self.shared.name, empty, iterations, "sync finished");
        Ok(empty)
    }

    fn keep_syncing(&self) -> bool {
        !self.is_empty() && self.shared.phase.load(Ordering::SeqCst) != PHASE_STOPPED
    }
}

#[cfg(feature = "async")]
impl EventLoop {
    /// Async variant of [`join`](Self::join), waiting on Tokio's blocking pool.
    ///
    /// # Panics
    ///
    /// Same as [`join`](Self::join).
    pub async fn join_async(&self) -> i32 {
        let event_loop = self.clone();
        match tokio::task::spawn_blocking(move || event_loop.join()).await {
            Ok(exit_code) => exit_code,
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(error) => panic!("join task for event loop '{}' failed: {}", self.name(), error),
        }
    }

    /// Async variant of [`stop_and_join`](Self::stop_and_join).
    pub async fn stop_and_join_async(&self, exit_code: i32) -> i32 {
        self.stop(exit_code);
        self.join_async().await
    }

    /// Async variant of [`sync`](Self::sync), sleeping with Tokio timers.
    ///
    /// # Panics
    ///
    /// Panics if the loop was not started.
    pub async fn sync_async(&self, max_iterations: usize) -> bool {
        if !self.is_joinable() {
            panic!("{}", LoopError::not_joinable(self.shared.name.as_str()));
        }

        let mut iterations = 0;
        while self.keep_syncing() {
            tokio::time::sleep(self.shared.config.sync_interval).await;
            iterations += 1;
            if max_iterations > 0 && iterations >= max_iterations {
                break;
            }
        }

        self.is_empty()
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("name", &self.shared.name)
            .field("state", &self.state())
            .field("handlers", &self.shared.handlers.names())
            .field("pending_events", &self.pending_events())
            .finish()
    }
}

/// Builder for [`EventLoop`].
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, EventHandler, EventLoop, IdleHandler};
/// use std::time::Duration;
///
/// let event_loop = EventLoop::builder("worker")
///     .idle_delay(Duration::from_millis(5))
///     .sync_interval(Duration::from_millis(20))
///     .default_handler(EventHandler::fallback("unhandled", |event: &Event| {
///         eprintln!("unhandled {}", event);
///         true
///     }))
///     .idle_handler(IdleHandler::new("tick", || {}))
///     .build();
///
/// assert_eq!(event_loop.name(), "worker");
/// ```
#[derive(Debug)]
pub struct EventLoopBuilder {
    name: String,
    config: EventLoopConfig,
    default_handler: Option<Arc<EventHandler>>,
    idle_handler: Option<Arc<IdleHandler>>,
}

impl EventLoopBuilder {
    /// Creates a builder for a loop named `name`.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            config: EventLoopConfig::default(),
            default_handler: None,
            idle_handler: None,
        }
    }

    /// Renames the loop.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: EventLoopConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the idle sleep used when no idle handler is set.
    pub fn idle_delay(mut self, delay: Duration) -> Self {
        self.config.idle_delay = delay;
        self
    }

    /// Sets the polling interval of `sync`.
    pub fn sync_interval(mut self, interval: Duration) -> Self {
        self.config.sync_interval = interval;
        self
    }

    /// Names the run thread.
    pub fn thread_name<S: Into<String>>(mut self, name: S) -> Self {
        self.config.thread_name = Some(name.into());
        self
    }

    /// Sets how fire-and-forget handlers are launched.
    pub fn spawner(mut self, spawner: TaskSpawner) -> Self {
        self.config.spawner = spawner;
        self
    }

    /// Sets the default handler.
    pub fn default_handler(mut self, handler: Arc<EventHandler>) -> Self {
        self.default_handler = Some(handler);
        self
    }

    /// Sets the idle handler.
    pub fn idle_handler(mut self, handler: Arc<IdleHandler>) -> Self {
        self.idle_handler = Some(handler);
        self
    }

    /// Builds the loop.
    pub fn build(self) -> EventLoop {
        EventLoop::from_parts(self.name, self.config, self.default_handler, self.idle_handler)
    }
}
