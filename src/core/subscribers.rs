//=========================================================================
// Subscribers
//=========================================================================
//
// Multicast observer list for service notifications.
//
// Pattern: subscribe() → SubscriptionId → notify(&event) → all handlers
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== SubscriptionId ======================================================

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

//=== Subscribers =========================================================

type Handler<E> = Box<dyn FnMut(&E) + Send>;

/// List of event handlers notified in registration order.
pub struct Subscribers<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers a handler.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    /// Calls every handler with `event`.
    pub fn notify(&mut self, event: &E) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn all_subscribers_are_notified_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::<u32>::new();

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            subscribers.subscribe(move |value| seen.lock().unwrap().push((tag, *value)));
        }

        subscribers.notify(&7);

        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribed_handler_is_not_called() {
        let count = Arc::new(Mutex::new(0));
        let mut subscribers = Subscribers::<()>::new();

        let counter = Arc::clone(&count);
        let id = subscribers.subscribe(move |_| *counter.lock().unwrap() += 1);

        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.notify(&());

        assert_eq!(*count.lock().unwrap(), 0);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let mut subscribers = Subscribers::<()>::new();
        let a = subscribers.subscribe(|_| {});
        let b = subscribers.subscribe(|_| {});

        assert_ne!(a, b);
        assert_eq!(subscribers.len(), 2);
    }
}
