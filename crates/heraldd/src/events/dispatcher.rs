//! Attaches the handler table to a session and runs each event off the
//! delivery thread.

use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use tracing::{debug, error, warn};

use crate::health::HealthReporter;
use crate::session::{SessionClient, Subscriber};

use super::EVENTS_TARGET;
use super::category::{Event, EventCategory};
use super::handler::{EventHandler, HandlerError, HandlerTable};

/// Routes inbound events from a session to the handlers in a [`HandlerTable`].
///
/// Attachment is tracked by category. [`Self::detach`] removes exactly the
/// categories [`Self::attach`] added, so receivers registered on the session
/// by anything else survive a detach.
pub struct EventDispatcher {
    attached: BTreeSet<EventCategory>,
    in_flight: Arc<AtomicUsize>,
}

impl EventDispatcher {
    /// Subscribes one route per category in `routes` to `session`.
    ///
    /// Categories that already have a receiver on the session are skipped and
    /// left untouched.
    #[must_use]
    pub fn attach<P>(
        routes: &HandlerTable,
        reporter: Arc<dyn HealthReporter>,
        session: &SessionClient<P>,
    ) -> Self {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut attached = BTreeSet::new();
        for (category, handler) in routes.iter() {
            let route = DispatchRoute {
                category,
                handler: Arc::clone(handler),
                reporter: Arc::clone(&reporter),
                in_flight: Arc::clone(&in_flight),
            };
            match session.subscribe(category, Arc::new(route)) {
                Ok(()) => {
                    attached.insert(category);
                }
                Err(error) => warn!(
                    target: EVENTS_TARGET,
                    %category,
                    error = %error,
                    "leaving existing subscriber in place"
                ),
            }
        }
        debug!(
            target: EVENTS_TARGET,
            attached = attached.len(),
            "event dispatcher attached"
        );
        Self {
            attached,
            in_flight,
        }
    }

    /// Removes every subscription made by [`Self::attach`].
    ///
    /// Returns the number of categories removed; zero after an earlier detach.
    /// Handler invocations already running are not interrupted.
    pub fn detach<P>(&mut self, session: &SessionClient<P>) -> usize {
        let attached = std::mem::take(&mut self.attached);
        if attached.is_empty() {
            return 0;
        }
        let removed = attached
            .iter()
            .filter(|category| session.unsubscribe(**category).is_some())
            .count();
        debug!(
            target: EVENTS_TARGET,
            removed,
            in_flight = self.in_flight(),
            "event dispatcher detached"
        );
        removed
    }

    /// Categories this dispatcher currently owns on a session.
    #[must_use]
    pub fn attached(&self) -> &BTreeSet<EventCategory> {
        &self.attached
    }

    /// Number of handler invocations still running.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("EventDispatcher")
            .field("attached", &self.attached)
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

struct DispatchRoute {
    category: EventCategory,
    handler: Arc<dyn EventHandler>,
    reporter: Arc<dyn HealthReporter>,
    in_flight: Arc<AtomicUsize>,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl Subscriber for DispatchRoute {
    fn deliver(&self, event: Event) {
        let guard = InFlightGuard::enter(&self.in_flight);
        let category = self.category;
        let handler = Arc::clone(&self.handler);
        let reporter = Arc::clone(&self.reporter);
        let spawned = thread::Builder::new()
            .name(format!("herald-event-{category}"))
            .spawn(move || {
                let _guard = guard;
                if let Err(failure) = invoke(handler.as_ref(), category, &event) {
                    reporter.handler_failed(&failure, &event);
                }
            });
        if let Err(spawn_error) = spawned {
            error!(
                target: EVENTS_TARGET,
                %category,
                error = %spawn_error,
                "failed to spawn handler thread; event dropped"
            );
        }
    }
}

fn invoke(
    handler: &dyn EventHandler,
    category: EventCategory,
    event: &Event,
) -> Result<(), HandlerError> {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event))) {
        Ok(result) => result,
        Err(payload) => Err(HandlerError::Panicked {
            category,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
