//! Error types for evloop.
//!
//! Every error in this module describes a misuse of the event loop contract:
//! a reserved event type, a handler name collision, or a lifecycle call made
//! in the wrong state. The panicking entry points on [`EventLoop`] and
//! [`Event`] raise these as panics; the `try_*` variants hand them back so
//! callers can inspect them.
//!
//! [`EventLoop`]: crate::EventLoop
//! [`Event`]: crate::Event

use thiserror::Error;

/// Errors raised while constructing events.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The event type falls into the reserved range.
    #[error("Can't make event using reserved event type value: {event_type}")]
    ReservedType {
        /// The rejected event type.
        event_type: u64,
    },
}

/// Errors raised by event loop configuration and lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopError {
    /// `start` or `run` was called on a loop that already ran.
    #[error("Event loop '{loop_name}' was already started")]
    AlreadyStarted {
        /// Name of the event loop.
        loop_name: String,
    },

    /// `join` or `sync` was called on a loop without a synchronization channel.
    #[error("Event loop '{loop_name}' is not joinable")]
    NotJoinable {
        /// Name of the event loop.
        loop_name: String,
    },

    /// A different handler is already subscribed under the same name.
    #[error("Different handler with name '{handler}' already subscribed for event loop '{loop_name}'")]
    HandlerConflict {
        /// Name of the event loop.
        loop_name: String,
        /// The colliding handler name.
        handler: String,
    },

    /// A different default handler is already set.
    #[error("Different default handler '{existing}' already set for event loop '{loop_name}'")]
    DefaultHandlerConflict {
        /// Name of the event loop.
        loop_name: String,
        /// Name of the handler that is already set.
        existing: String,
    },

    /// A different idle handler is already set.
    #[error("Different idle handler '{existing}' already set for event loop '{loop_name}'")]
    IdleHandlerConflict {
        /// Name of the event loop.
        loop_name: String,
        /// Name of the handler that is already set.
        existing: String,
    },

    /// The run task sent a handshake value the caller did not expect.
    #[error("Event loop '{loop_name}' sent unexpected signal: expected {expected}, got {actual}")]
    UnexpectedSignal {
        /// Name of the event loop.
        loop_name: String,
        /// The signal the caller waited for.
        expected: String,
        /// The signal that arrived, or `disconnected`.
        actual: String,
    },

    /// The run task stopped without a recorded exit code.
    #[error("Event loop '{loop_name}' stopped without an exit code")]
    MissingExitCode {
        /// Name of the event loop.
        loop_name: String,
    },

    /// The run thread could not be spawned.
    #[error("Failed to spawn run thread for event loop '{loop_name}': {reason}")]
    SpawnFailed {
        /// Name of the event loop.
        loop_name: String,
        /// The operating system error message.
        reason: String,
    },
}

/// Convenience type alias for event construction results.
pub type EventResult<T> = Result<T, EventError>;

/// Convenience type alias for event loop operation results.
pub type LoopResult<T> = Result<T, LoopError>;

impl EventError {
    /// Creates a new reserved type error.
    pub fn reserved_type(event_type: u64) -> Self {
        Self::ReservedType { event_type }
    }
}

impl LoopError {
    /// Creates a new already started error.
    pub fn already_started<S: Into<String>>(loop_name: S) -> Self {
        Self::AlreadyStarted {
            loop_name: loop_name.into(),
        }
    }

    /// Creates a new not joinable error.
    pub fn not_joinable<S: Into<String>>(loop_name: S) -> Self {
        Self::NotJoinable {
            loop_name: loop_name.into(),
        }
    }

    /// Creates a new handler conflict error.
    pub fn handler_conflict<S: Into<String>>(loop_name: S, handler: S) -> Self {
        Self::HandlerConflict {
            loop_name: loop_name.into(),
            handler: handler.into(),
        }
    }

    /// Creates a new default handler conflict error.
    pub fn default_handler_conflict<S: Into<String>>(loop_name: S, existing: S) -> Self {
        Self::DefaultHandlerConflict {
            loop_name: loop_name.into(),
            existing: existing.into(),
        }
    }

    /// Creates a new idle handler conflict error.
    pub fn idle_handler_conflict<S: Into<String>>(loop_name: S, existing: S) -> Self {
        Self::IdleHandlerConflict {
            loop_name: loop_name.into(),
            existing: existing.into(),
        }
    }

    /// Creates a new unexpected signal error.
    pub fn unexpected_signal<S: Into<String>>(loop_name: S, expected: S, actual: S) -> Self {
        Self::UnexpectedSignal {
            loop_name: loop_name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a new missing exit code error.
    pub fn missing_exit_code<S: Into<String>>(loop_name: S) -> Self {
        Self::MissingExitCode {
            loop_name: loop_name.into(),
        }
    }

    /// Creates a new spawn failed error.
    pub fn spawn_failed<S: Into<String>>(loop_name: S, reason: S) -> Self {
        Self::SpawnFailed {
            loop_name: loop_name.into(),
            reason: reason.into(),
        }
    }
}
