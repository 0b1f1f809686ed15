//! Subscription table fed by the platform's inbound event path.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use thiserror::Error;
use tracing::debug;

use crate::events::{Event, EventCategory};

use super::SESSION_TARGET;

/// Receiver registered for one event category.
///
/// `deliver` runs on the platform's delivery thread and must return quickly.
pub trait Subscriber: Send + Sync {
    /// Accepts one inbound event.
    fn deliver(&self, event: Event);
}

/// Errors raised while changing subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscribeError {
    /// Another subscriber already owns the category.
    #[error("event category {category} already has a subscriber")]
    AlreadySubscribed {
        /// Category that was requested.
        category: EventCategory,
    },
}

/// Outcome of handing an inbound event to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// A subscriber accepted the event.
    Routed,
    /// No subscriber is registered for the event's category.
    Unsubscribed,
    /// The session that issued the handle has been released.
    SessionReleased,
}

#[derive(Default)]
pub(crate) struct SubscriberTable {
    entries: Mutex<BTreeMap<EventCategory, Arc<dyn Subscriber>>>,
}

impl SubscriberTable {
    pub(crate) fn insert(
        &self,
        category: EventCategory,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), SubscribeError> {
        let mut entries = self.lock_entries();
        if entries.contains_key(&category) {
            return Err(SubscribeError::AlreadySubscribed { category });
        }
        entries.insert(category, subscriber);
        Ok(())
    }

    pub(crate) fn remove(&self, category: EventCategory) -> Option<Arc<dyn Subscriber>> {
        self.lock_entries()
            .remove(&category)
    }

    pub(crate) fn categories(&self) -> BTreeSet<EventCategory> {
        self.lock_entries()
            .keys()
            .copied()
            .collect()
    }

    fn lookup(&self, category: EventCategory) -> Option<Arc<dyn Subscriber>> {
        self.lock_entries()
            .get(&category)
            .cloned()
    }

    fn lock_entries(&self) -> MutexGuard<'_, BTreeMap<EventCategory, Arc<dyn Subscriber>>> {
        // Each critical section is a single map operation, so the map is
        // consistent even after a poisoning panic.
        self.entries
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    pub(crate) fn route(&self, event: Event) -> Delivery {
        // The lock is released before the subscriber runs.
        match self.lookup(event.category) {
            Some(subscriber) => {
                subscriber.deliver(event);
                Delivery::Routed
            }
            None => {
                debug!(
                    target: SESSION_TARGET,
                    category = %event.category,
                    "dropping event without subscriber"
                );
                Delivery::Unsubscribed
            }
        }
    }
}

/// Non-owning handle the platform uses to push inbound events.
///
/// The handle does not keep the session alive; once the session is released
/// deliveries report [`Delivery::SessionReleased`].
#[derive(Debug, Clone)]
pub struct InboundEvents {
    table: Weak<SubscriberTable>,
}

impl InboundEvents {
    pub(crate) fn new(table: &Arc<SubscriberTable>) -> Self {
        Self {
            table: Arc::downgrade(table),
        }
    }

    /// Routes `event` to the subscriber registered for its category.
    pub fn deliver(&self, event: Event) -> Delivery {
        match self.table.upgrade() {
            Some(table) => table.route(event),
            None => Delivery::SessionReleased,
        }
    }
}
