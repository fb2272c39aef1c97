//! # evloop - In-Memory Event Loop
//!
//! evloop is a single-threaded event dispatch loop for Rust applications. Events
//! are pushed into the loop directly or pulled from registered sources, and each
//! event is delivered to the named handlers whose type filter matches it.
//!
//! ## Features
//!
//! - **Numeric Event Types**: Events carry a `u64` type tag and an opaque payload
//! - **Polled Sources**: Pluggable producers drained on every loop iteration
//! - **Named Handlers**: Type-filtered callbacks with early stop and fire-and-forget modes
//! - **Default and Idle Handlers**: Hooks for unmatched events and empty iterations
//! - **Lifecycle Control**: Start, stop with an exit code, join and quiescence sync
//! - **Async Support**: Tokio-backed spawning, async join and stream sources
//!
//! ## Quick Start
//!
//! ```rust
//! use evloop::{Event, EventHandler, EventLoop, EVENT_PRE_USER};
//!
//! const GREETING: u64 = EVENT_PRE_USER + 1;
//!
//! let event_loop = EventLoop::new("main");
//!
//! // Register a handler
//! event_loop.subscribe(EventHandler::new(GREETING, "greeter", |event: &Event| {
//!     if let Some(name) = event.payload::<String>() {
//!         println!("Hello, {}!", name);
//!     }
//!     true
//! }));
//!
//! // Start the run thread and send an event
//! event_loop.start();
//! event_loop.send(Event::new(GREETING, "world".to_string()));
//!
//! // Drain pending events and stop
//! assert_eq!(event_loop.stop_and_join(0), 0);
//! ```
//!
//! ## Typed Event Kinds
//!
//! ```rust
//! use evloop::{Event, EventKind};
//!
//! #[derive(EventKind, Clone, Copy, Debug, PartialEq)]
//! enum Order {
//!     Placed,
//!     Shipped,
//! }
//!
//! let event = Event::of_kind(Order::Shipped, 42_u32);
//! assert_eq!(Order::from_event_type(event.event_type()), Some(Order::Shipped));
//! assert_eq!(event.type_name(), "Shipped");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Lets derive output refer to `::evloop` from inside this crate
extern crate self as evloop;

// Re-export derive macros
pub use evloop_derive::EventKind;

// Core modules
pub mod config;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod handler;
pub mod queue;
pub mod registry;
pub mod source;
pub mod testing;

// Re-exports for convenience
pub use config::{EventLoopConfig, TaskSpawner, DEFAULT_IDLE_DELAY, DEFAULT_SYNC_INTERVAL};
pub use error::*;
pub use event::{
    is_user_event_type, DefaultTypeNames, Event, EventKind, KindNames, TypeNameResolver,
    EVENT_ALL, EVENT_PRE_USER,
};
pub use event_loop::{EventLoop, EventLoopBuilder, LoopState};
pub use handler::{DispatchMode, EventCallback, EventHandler, IdleCallback, IdleHandler};
pub use queue::EventQueue;
pub use registry::{HandlerRegistry, Registration};
pub use source::{ChannelSource, SharedSource, Source, SourceRegistry};

#[cfg(feature = "async")]
pub use source::StreamSource;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{EventError, LoopError};
    pub use crate::{Event, EventKind, TypeNameResolver, EVENT_ALL, EVENT_PRE_USER};
    pub use crate::{EventLoop, EventLoopBuilder, EventLoopConfig, LoopState, TaskSpawner};
    pub use crate::{DispatchMode, EventHandler, IdleHandler};
    pub use crate::{ChannelSource, SharedSource, Source};

    #[cfg(feature = "async")]
    pub use crate::StreamSource;
}

/// Version information for the evloop library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::sync::Arc;

    #[test]
    fn test_basic_functionality() {
        let (sender, source) = ChannelSource::pair("inbox");
        let event_loop = EventLoop::new("basic");
        event_loop.add_source(Arc::new(source));

        let handler = event_loop.subscribe(EventHandler::new(EVENT_ALL, "sink", |_: &Event| true));
        sender.send(Event::empty(EVENT_PRE_USER + 1)).unwrap();
        drop(sender);

        event_loop.start();
        assert!(event_loop.sync(0));
        event_loop.unsubscribe(&handler);
        assert_eq!(event_loop.handler_count(), 0);
        assert_eq!(event_loop.stop_and_join(0), 0);
        assert_eq!(event_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn test_version_is_set() {
        assert!(!super::VERSION.is_empty());
    }
}
