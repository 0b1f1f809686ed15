//! The single live connection to the messaging platform.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use herald_config::{Config, WorkspaceId};
use tracing::{debug, info, warn};

use crate::commands::{CommandModuleDescriptor, PermissionOverlay, PermissionOverlayBuilder};
use crate::events::{Event, EventCategory};

use super::SESSION_TARGET;
use super::errors::{ConnectionError, DisconnectError};
use super::inbound::{Delivery, InboundEvents, SubscribeError, Subscriber, SubscriberTable};
use super::platform::{Identity, Platform, PlatformError, Presence};

/// Connection state of a [`SessionClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built but never connected.
    Uninitialized,
    /// Transport session is open.
    Connected,
    /// Transport session is closed; terminal.
    Disconnected,
}

impl fmt::Display for SessionState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Uninitialized => "uninitialized",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug)]
struct Connection {
    state: SessionState,
    identity: Option<Identity>,
}

/// Owns the transport session and its event subscription table.
///
/// A client moves through `Uninitialized -> Connected -> Disconnected` once.
/// Reconnecting requires a new client.
pub struct SessionClient<P> {
    platform: P,
    config: Arc<Config>,
    connection: Mutex<Connection>,
    subscribers: Arc<SubscriberTable>,
}

impl<P> SessionClient<P> {
    /// Builds a disconnected client over `platform`.
    pub fn new(platform: P, config: Arc<Config>) -> Self {
        Self {
            platform,
            config,
            connection: Mutex::new(Connection {
                state: SessionState::Uninitialized,
                identity: None,
            }),
            subscribers: Arc::new(SubscriberTable::default()),
        }
    }

    /// Current connection state.
    pub fn state(&self) -> SessionState {
        self.lock_connection().state
    }

    /// Identity reported by the platform on connect.
    pub fn identity(&self) -> Option<Identity> {
        self.lock_connection().identity.clone()
    }

    /// Handle through which inbound events reach the subscribers.
    pub fn inbound(&self) -> InboundEvents {
        InboundEvents::new(&self.subscribers)
    }

    /// Registers `subscriber` as the receiver for `category`.
    pub fn subscribe(
        &self,
        category: EventCategory,
        subscriber: Arc<dyn Subscriber>,
    ) -> Result<(), SubscribeError> {
        self.subscribers.insert(category, subscriber)?;
        debug!(target: SESSION_TARGET, %category, "subscribed");
        Ok(())
    }

    /// Removes the receiver for `category`, returning it when present.
    pub fn unsubscribe(&self, category: EventCategory) -> Option<Arc<dyn Subscriber>> {
        let removed = self.subscribers.remove(category);
        debug!(
            target: SESSION_TARGET,
            %category,
            removed = removed.is_some(),
            "unsubscribed"
        );
        removed
    }

    /// Routes `event` to its category's receiver, as the platform would.
    pub fn deliver(&self, event: Event) -> Delivery {
        self.subscribers.route(event)
    }

    /// Categories that currently have a receiver.
    pub fn subscriptions(&self) -> BTreeSet<EventCategory> {
        self.subscribers.categories()
    }

    fn lock_connection(&self) -> MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl<P> SessionClient<P>
where
    P: Platform,
{
    /// Opens the transport session using the configured credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the platform rejects the session, or
    /// when the client is already connected or was disconnected before.
    pub fn connect(&self) -> Result<Identity, ConnectionError> {
        let mut connection = self.lock_connection();
        match connection.state {
            SessionState::Uninitialized => {}
            SessionState::Connected => return Err(ConnectionError::AlreadyConnected),
            SessionState::Disconnected => return Err(ConnectionError::Terminated),
        }

        let identity = self.platform.open(
            self.config.credentials(),
            &self.config.session,
            self.inbound(),
        )?;
        info!(
            target: SESSION_TARGET,
            identity = %identity,
            shard_id = self.config.session.shard_id,
            shard_count = self.config.session.shard_count,
            "session connected"
        );
        connection.state = SessionState::Connected;
        connection.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Publishes `presence`; failures are logged and otherwise ignored.
    ///
    /// The connection lock is held for the platform call, so a concurrent
    /// disconnect waits until the update completes.
    pub fn update_presence(&self, presence: &Presence) {
        let connection = self.lock_connection();
        let state = connection.state;
        if state != SessionState::Connected {
            debug!(
                target: SESSION_TARGET,
                %state,
                status = %presence.status,
                "skipping presence update outside a connected session"
            );
            return;
        }
        if let Err(error) = self.platform.update_presence(presence) {
            warn!(
                target: SESSION_TARGET,
                status = %presence.status,
                error = %error,
                "presence update failed"
            );
        }
    }

    /// Closes the transport session.
    ///
    /// Calling this on a disconnected client is a no-op. A client that never
    /// connected moves straight to `Disconnected` without touching the
    /// platform.
    ///
    /// # Errors
    ///
    /// Returns [`DisconnectError`] when the platform reports a failure while
    /// closing. The client is disconnected regardless.
    pub fn disconnect(&self) -> Result<(), DisconnectError> {
        let mut connection = self.lock_connection();
        let previous = connection.state;
        connection.state = SessionState::Disconnected;
        match previous {
            SessionState::Disconnected => {
                debug!(target: SESSION_TARGET, "session already disconnected");
                Ok(())
            }
            SessionState::Uninitialized => {
                debug!(target: SESSION_TARGET, "session closed before connecting");
                Ok(())
            }
            SessionState::Connected => {
                let result = self
                    .platform
                    .close()
                    .map_err(|source| DisconnectError { source });
                info!(
                    target: SESSION_TARGET,
                    clean = result.is_ok(),
                    "session disconnected"
                );
                result
            }
        }
    }

    /// Registers `module` in `workspace` with the overlay built by `configure`.
    ///
    /// Registration is forwarded even before the session connects; the
    /// platform queues it until the session is ready.
    ///
    /// # Errors
    ///
    /// Returns the platform error when registration is refused, or
    /// [`PlatformError::closed`] after disconnect.
    pub fn register_commands<F>(
        &self,
        module: &CommandModuleDescriptor,
        workspace: WorkspaceId,
        configure: F,
    ) -> Result<PermissionOverlay, PlatformError>
    where
        F: FnOnce(&mut PermissionOverlayBuilder),
    {
        let connection = self.lock_connection();
        if connection.state == SessionState::Disconnected {
            return Err(PlatformError::closed());
        }
        let mut builder = PermissionOverlay::builder();
        configure(&mut builder);
        let overlay = builder.build();
        self.platform
            .register_commands(module, workspace, &overlay)?;
        Ok(overlay)
    }
}

impl<P> fmt::Debug for SessionClient<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionClient")
            .field("state", &self.state())
            .field("subscriptions", &self.subscriptions())
            .finish_non_exhaustive()
    }
}
