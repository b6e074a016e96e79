//! Menu error types

use super::tree::NodeId;
use crate::platform::{PlatformError, UserId};
use thiserror::Error;

/// Errors that end the handling of one event
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("No session for user {0}")]
    SessionNotFound(UserId),
    #[error("Failed to acknowledge callback: {0}")]
    Acknowledge(PlatformError),
    #[error("Failed to edit menu message: {0}")]
    Edit(PlatformError),
    #[error("Failed to send menu message: {0}")]
    Send(PlatformError),
    #[error("No handler bound to option {0:?}")]
    UnknownButton(String),
    #[error("Menu has not been rendered for locale {0:?}")]
    NotRendered(String),
    #[error("Node {0} does not belong to this menu")]
    UnknownNode(NodeId),
    #[error("Cannot attach node {child} under {parent}: it would become its own ancestor")]
    Cycle { parent: NodeId, child: NodeId },
}
