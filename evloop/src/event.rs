//! Event envelope and event type naming.
//!
//! An [`Event`] is an immutable, cheaply cloneable envelope: a numeric type
//! tag, an opaque payload and an optional [`TypeNameResolver`] used only to
//! render the type in logs. The loop routes on the numeric tag alone.

use crate::error::{EventError, EventResult};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Handler type filter that matches every event.
///
/// Not a valid type for a constructed event.
pub const EVENT_ALL: u64 = 0;

/// Upper bound of the reserved event type range.
///
/// Types in `EVENT_ALL..=EVENT_PRE_USER` cannot be used to construct events;
/// user event types start at `EVENT_PRE_USER + 1`.
pub const EVENT_PRE_USER: u64 = 100;

/// Returns whether `event_type` can be used to construct an event.
pub fn is_user_event_type(event_type: u64) -> bool {
    event_type > EVENT_PRE_USER
}

/// Renders numeric event types as human readable names.
///
/// Purely cosmetic: the loop uses it when logging, never for routing.
/// Implemented for any `Fn(u64) -> String` closure.
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, EVENT_PRE_USER};
///
/// let event = Event::empty(EVENT_PRE_USER + 1)
///     .with_resolver(|t: u64| format!("Tick#{}", t));
/// assert_eq!(event.type_name(), "Tick#101");
/// ```
pub trait TypeNameResolver: Send + Sync + 'static {
    /// Returns the display name for `event_type`.
    fn type_name(&self, event_type: u64) -> String;
}

impl<F> TypeNameResolver for F
where
    F: Fn(u64) -> String + Send + Sync + 'static,
{
    fn type_name(&self, event_type: u64) -> String {
        self(event_type)
    }
}

/// Resolver attached by [`Event::new`]: names the reserved markers and
/// reports every other type as `USER` or `UNKNOWN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeNames;

impl TypeNameResolver for DefaultTypeNames {
    fn type_name(&self, event_type: u64) -> String {
        match event_type {
            EVENT_ALL => "ALL",
            EVENT_PRE_USER => "PRE",
            t if t > EVENT_PRE_USER => "USER",
            _ => "UNKNOWN",
        }
        .to_string()
    }
}

/// A closed set of user event types, usually an enum.
///
/// Derive it with `#[derive(EventKind)]` on a fieldless enum: variants are
/// numbered from `EVENT_PRE_USER + 1` in declaration order unless they carry
/// an explicit discriminant.
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, EventKind};
///
/// #[derive(EventKind, Clone, Copy, Debug, PartialEq)]
/// enum Net {
///     Connected,
///     Disconnected,
/// }
///
/// assert_eq!(Net::Disconnected.event_type(), 102);
/// assert_eq!(Net::from_event_type(101), Some(Net::Connected));
///
/// let event = Event::of_kind(Net::Connected, "10.0.0.1");
/// assert_eq!(event.type_name(), "Connected");
/// ```
pub trait EventKind: Copy + Send + Sync + 'static {
    /// Numeric event type of this kind.
    fn event_type(self) -> u64;

    /// Maps a numeric event type back to a kind.
    fn from_event_type(event_type: u64) -> Option<Self>;

    /// Display name of this kind.
    fn kind_name(self) -> &'static str;
}

/// [`TypeNameResolver`] backed by an [`EventKind`].
///
/// Types that do not belong to `K` fall back to [`DefaultTypeNames`].
pub struct KindNames<K>(PhantomData<fn() -> K>);

impl<K> KindNames<K> {
    /// Creates a resolver for kind `K`.
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for KindNames<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for KindNames<K> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for KindNames<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindNames<{}>", std::any::type_name::<K>())
    }
}

impl<K: EventKind> TypeNameResolver for KindNames<K> {
    fn type_name(&self, event_type: u64) -> String {
        match K::from_event_type(event_type) {
            Some(kind) => kind.kind_name().to_string(),
            None => DefaultTypeNames.type_name(event_type),
        }
    }
}

/// Immutable typed envelope dispatched through an event loop.
///
/// Cloning is cheap: the payload and resolver are shared.
///
/// # Examples
///
/// ```rust
/// use evloop::{Event, EVENT_PRE_USER};
///
/// let event = Event::new(EVENT_PRE_USER + 7, String::from("hello"));
/// assert_eq!(event.event_type(), 107);
/// assert_eq!(event.payload::<String>().map(String::as_str), Some("hello"));
/// assert_eq!(event.type_name(), "USER");
/// ```
#[derive(Clone)]
pub struct Event {
    event_type: u64,
    payload: Option<Arc<dyn Any + Send + Sync>>,
    resolver: Option<Arc<dyn TypeNameResolver>>,
}

impl Event {
    /// Creates an event carrying `payload`.
    ///
    /// # Panics
    ///
    /// Panics if `event_type` is reserved (`<= EVENT_PRE_USER`). Use
    /// [`Event::try_new`] to get the error instead.
    pub fn new<P>(event_type: u64, payload: P) -> Self
    where
        P: Any + Send + Sync,
    {
        match Self::try_new(event_type, payload) {
            Ok(event) => event,
            Err(error) => panic!("{}", error),
        }
    }

    /// Creates an event carrying `payload`, rejecting reserved types.
    pub fn try_new<P>(event_type: u64, payload: P) -> EventResult<Self>
    where
        P: Any + Send + Sync,
    {
        let mut event = Self::try_empty(event_type)?;
        event.payload = Some(Arc::new(payload));
        Ok(event)
    }

    /// Creates an event without a payload.
    ///
    /// # Panics
    ///
    /// Panics if `event_type` is reserved.
    pub fn empty(event_type: u64) -> Self {
        match Self::try_empty(event_type) {
            Ok(event) => event,
            Err(error) => panic!("{}", error),
        }
    }

    /// Creates an event without a payload, rejecting reserved types.
    pub fn try_empty(event_type: u64) -> EventResult<Self> {
        if !is_user_event_type(event_type) {
            return Err(EventError::reserved_type(event_type));
        }

        Ok(Self {
            event_type,
            payload: None,
            resolver: Some(Arc::new(DefaultTypeNames)),
        })
    }

    /// Creates an event of `kind`, named by [`KindNames`].
    ///
    /// # Panics
    ///
    /// Panics if the kind maps to a reserved type.
    pub fn of_kind<K, P>(kind: K, payload: P) -> Self
    where
        K: EventKind,
        P: Any + Send + Sync,
    {
        Self::new(kind.event_type(), payload).with_resolver(KindNames::<K>::new())
    }

    /// Replaces the type name resolver.
    pub fn with_resolver<R: TypeNameResolver>(mut self, resolver: R) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Removes the type name resolver.
    pub fn without_resolver(mut self) -> Self {
        self.resolver = None;
        self
    }

    /// Numeric type of this event.
    pub fn event_type(&self) -> u64 {
        self.event_type
    }

    /// Returns the payload if it is a `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    /// Returns whether the event carries a payload.
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }

    /// Human readable type name, `UNKNOWN` without a resolver.
    pub fn type_name(&self) -> String {
        match &self.resolver {
            Some(resolver) => resolver.type_name(self.event_type),
            None => "UNKNOWN".to_string(),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("type_name", &self.type_name())
            .field("has_payload", &self.has_payload())
            .finish()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.type_name(), self.event_type)
    }
}
