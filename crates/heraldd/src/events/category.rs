//! Inbound event categories and payloads.

use herald_config::WorkspaceId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Categories of inbound platform events a handler can subscribe to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deserialize,
    Serialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventCategory {
    /// A message was posted.
    MessageCreated,
    /// A reaction was added to a message.
    MessageReactionAdded,
    /// A member joined a workspace.
    MemberAdded,
    /// A member left a workspace.
    MemberRemoved,
    /// A user interacted with a message component.
    ComponentInteraction,
    /// A registered command failed on the platform side.
    CommandErrored,
}

/// One inbound event as delivered by the platform.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Event {
    /// Category used for routing.
    pub category: EventCategory,
    /// Workspace the event originated in, when it has one.
    pub workspace: Option<WorkspaceId>,
    /// Platform payload.
    pub payload: serde_json::Value,
}

impl Event {
    /// Builds an event with an empty payload.
    #[must_use]
    pub fn new(category: EventCategory) -> Self {
        Self {
            category,
            workspace: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Attaches the originating workspace.
    #[must_use]
    pub fn in_workspace(mut self, workspace: WorkspaceId) -> Self {
        self.workspace = Some(workspace);
        self
    }

    /// Attaches the platform payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
