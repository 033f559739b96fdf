use crate::domain::event::{ChannelKey, CheckoutEvent};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

pub type EventHandler = Arc<dyn Fn(CheckoutEvent) + Send + Sync>;

/// Identifies one attachment of a handler to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What happened to a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// No handler was attached; the event is gone for good.
    Dropped,
}

struct Subscription {
    id: SubscriptionId,
    handler: EventHandler,
}

/// In-process, at-most-once event channel keyed by [`ChannelKey`].
///
/// Each key holds at most one handler. Publishing calls it synchronously on
/// the publisher's thread, so events published while a handler is attached
/// arrive in publish order. Nothing is buffered: an event published with no
/// handler attached is dropped and never redelivered.
///
/// Cloning yields another handle onto the same channel, which is how child
/// components and the host share it.
#[derive(Default, Clone)]
pub struct EventChannel {
    subscriptions: Arc<RwLock<HashMap<ChannelKey, Subscription>>>,
    next_id: Arc<AtomicU64>,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `handler` to `key`, replacing any handler already attached.
    pub fn subscribe<F>(&self, key: ChannelKey, handler: F) -> SubscriptionId
    where
        F: Fn(CheckoutEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.insert(
            key,
            Subscription {
                id,
                handler: Arc::new(handler),
            },
        );
        id
    }

    /// Detaches the handler attached by `id`.
    ///
    /// Returns false if `id` is no longer the attached handler, in which case
    /// the current handler is left alone.
    pub fn unsubscribe(&self, key: ChannelKey, id: SubscriptionId) -> bool {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let attached = subscriptions
            .get(&key)
            .is_some_and(|subscription| subscription.id == id);
        if attached {
            subscriptions.remove(&key);
        }
        attached
    }

    pub fn is_subscribed(&self, key: ChannelKey) -> bool {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&key)
    }

    pub fn publish(&self, key: ChannelKey, event: CheckoutEvent) -> Delivery {
        // Release the lock before calling out so handlers may publish or resubscribe.
        let handler = self
            .subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .map(|subscription| Arc::clone(&subscription.handler));

        match handler {
            Some(handler) => {
                handler(event);
                Delivery::Delivered
            }
            None => {
                debug!(channel = %key, "no handler attached, dropping event");
                Delivery::Dropped
            }
        }
    }

    /// Publishes the JSON wire form of a [`CheckoutEvent`].
    pub fn publish_payload(&self, key: ChannelKey, payload: &str) -> Delivery {
        match CheckoutEvent::from_json(payload) {
            Ok(event) => self.publish(key, event),
            Err(e) => {
                warn!(channel = %key, error = %e, "dropping undecodable event payload");
                Delivery::Dropped
            }
        }
    }
}
