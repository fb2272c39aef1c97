//! Insertion-ordered registry of handler bindings.

use crate::error::{LoopError, LoopResult};
use crate::handler::EventHandler;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of a successful [`HandlerRegistry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The binding was inserted.
    Added,

    /// The same binding was already registered; nothing changed.
    AlreadyPresent,
}

/// Thread-safe collection of handler bindings keyed by name.
///
/// Traversal follows insertion order and holds the registry lock for its
/// whole duration. A callback run during [`for_each`](Self::for_each) must not
/// call back into the same registry: the lock is not reentrant and doing so
/// deadlocks.
pub struct HandlerRegistry {
    owner: String,
    handlers: Mutex<Vec<Arc<EventHandler>>>,
}

impl HandlerRegistry {
    /// Creates an empty registry; `owner` names the loop in conflict errors.
    pub fn new<S: Into<String>>(owner: S) -> Self {
        Self {
            owner: owner.into(),
            handlers: Mutex::new(Vec::with_capacity(100)),
        }
    }

    /// Registers `handler` under its name.
    ///
    /// Registering the same binding twice is a no-op. A different binding
    /// under a name that is already bound fails with
    /// [`LoopError::HandlerConflict`].
    pub fn add(&self, handler: Arc<EventHandler>) -> LoopResult<Registration> {
        let mut handlers = self.lock();

        match handlers.iter().find(|bound| bound.name() == handler.name()) {
            Some(bound) if Arc::ptr_eq(bound, &handler) => Ok(Registration::AlreadyPresent),
            Some(_) => Err(LoopError::handler_conflict(
                self.owner.as_str(),
                handler.name(),
            )),
            None => {
                handlers.push(handler);
                Ok(Registration::Added)
            }
        }
    }

    /// Returns the binding registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<EventHandler>> {
        self.lock()
            .iter()
            .find(|handler| handler.name() == name)
            .cloned()
    }

    /// Returns whether a binding is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().iter().any(|handler| handler.name() == name)
    }

    /// Removes the binding registered under `name`, if any.
    pub fn remove(&self, name: &str) -> Option<Arc<EventHandler>> {
        let mut handlers = self.lock();
        let index = handlers.iter().position(|handler| handler.name() == name)?;
        Some(handlers.remove(index))
    }

    /// Visits bindings in insertion order until `visit` returns `false`.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<EventHandler>) -> bool,
    {
        let handlers = self.lock();
        for handler in handlers.iter() {
            if !visit(handler) {
                break;
            }
        }
    }

    /// Names of the registered bindings, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|handler| handler.name().to_string())
            .collect()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether no binding is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<EventHandler>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("owner", &self.owner)
            .field("handlers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EVENT_ALL};
    use proptest::prelude::*;

    fn handler(name: &str) -> Arc<EventHandler> {
        EventHandler::new(EVENT_ALL, name, |_: &Event| true)
    }

    #[test]
    fn test_add_is_idempotent_for_same_binding() {
        let registry = HandlerRegistry::new("test");
        let first = handler("first");

        assert_eq!(registry.add(Arc::clone(&first)), Ok(Registration::Added));
        assert_eq!(registry.add(Arc::clone(&first)), Ok(Registration::AlreadyPresent));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_add_conflicting_binding_fails() {
        let registry = HandlerRegistry::new("test");
        registry.add(handler("dup")).unwrap();

        assert_eq!(
            registry.add(handler("dup")),
            Err(LoopError::handler_conflict("test", "dup"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_and_lookup() {
        let registry = HandlerRegistry::new("test");
        let kept = handler("kept");
        registry.add(handler("gone")).unwrap();
        registry.add(Arc::clone(&kept)).unwrap();

        assert!(registry.remove("gone").is_some());
        assert!(registry.remove("gone").is_none());
        assert!(!registry.contains("gone"));
        assert!(Arc::ptr_eq(&registry.get("kept").unwrap(), &kept));
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_name_reusable_after_remove() {
        let registry = HandlerRegistry::new("test");
        registry.add(handler("slot")).unwrap();
        registry.remove("slot");
        assert_eq!(registry.add(handler("slot")), Ok(Registration::Added));
    }

    #[test]
    fn test_for_each_stops_early() {
        let registry = HandlerRegistry::new("test");
        for name in ["a", "b", "c"] {
            registry.add(handler(name)).unwrap();
        }

        let mut visited = Vec::new();
        registry.for_each(|handler| {
            visited.push(handler.name().to_string());
            handler.name() != "b"
        });
        assert_eq!(visited, vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn prop_traversal_follows_insertion_order(
            names in prop::collection::hash_set("[a-z]{1,8}", 0..32)
        ) {
            let registry = HandlerRegistry::new("prop");
            let names: Vec<String> = names.into_iter().collect();
            for name in &names {
                registry.add(handler(name)).unwrap();
            }

            let mut visited = Vec::new();
            registry.for_each(|handler| {
                visited.push(handler.name().to_string());
                true
            });
            prop_assert_eq!(&visited, &names);
            prop_assert_eq!(registry.names(), names);
        }
    }
}
