//! Callback dispatch
//!
//! Every rendered option is bound to the node it leads to. A press is
//! acknowledged first; the endpoint only runs once the platform accepted
//! the acknowledgement.

use super::endpoint::{Directive, EndpointContext};
use super::navigation::Transition;
use super::{Menu, MenuError, NodeId};
use crate::platform::Callback;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// How a press on an option is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Run the node's endpoint, then follow its directive
    Interactive,
    /// No endpoint: just move forward
    DeadEnd,
}

/// Target of one rendered option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub node: NodeId,
    pub locale: String,
    pub kind: HandlerKind,
}

#[derive(Default)]
struct Bindings {
    by_option: HashMap<String, Binding>,
    /// Current option identifier of each (node, locale)
    current: HashMap<(NodeId, String), String>,
}

/// Option identifier to handler table.
///
/// Holds one binding per node and locale: registering a new identifier for
/// the same slot retires the previous one.
#[derive(Default)]
pub struct HandlerRegistry {
    inner: RwLock<Bindings>,
}

impl HandlerRegistry {
    pub async fn register(&self, unique: String, binding: Binding) {
        let mut inner = self.inner.write().await;
        let slot = (binding.node, binding.locale.clone());
        if let Some(old) = inner.current.insert(slot, unique.clone()) {
            if old != unique {
                inner.by_option.remove(&old);
            }
        }
        inner.by_option.insert(unique, binding);
    }

    pub async fn resolve(&self, unique: &str) -> Option<Binding> {
        self.inner.read().await.by_option.get(unique).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_option.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Menu {
    /// Handle a button press.
    ///
    /// Failures are logged here and also returned; nothing is retried.
    pub async fn dispatch(&self, callback: &Callback) -> Result<Transition, MenuError> {
        let Some(binding) = self.handlers.resolve(&callback.data).await else {
            tracing::warn!(user = %callback.user, data = %callback.data, "No handler for option");
            return Err(MenuError::UnknownButton(callback.data.clone()));
        };

        if let Err(e) = self.messenger.respond(callback).await {
            tracing::error!(user = %callback.user, error = %e, "Failed to respond");
            return Err(MenuError::Acknowledge(e));
        }

        let Some(session) = self.sessions.session(callback.user).await else {
            tracing::warn!(user = %callback.user, "Session does not exist");
            return Err(MenuError::SessionNotFound(callback.user));
        };
        let mut session = session.lock().await;
        let node = binding.node;

        let endpoint = match binding.kind {
            HandlerKind::Interactive => self.tree.node(node)?.endpoint().cloned(),
            HandlerKind::DeadEnd => None,
        };
        let Some(endpoint) = endpoint else {
            return self.next(node, &mut session).await;
        };

        let directive = {
            let mut cx = EndpointContext::new(self, node, callback, &mut session);
            endpoint.handle(&mut cx).await
        };
        tracing::debug!(user = %callback.user, node = %node, ?directive, "Endpoint finished");

        match directive {
            Directive::Forward => self.next(node, &mut session).await,
            Directive::Back => self.back(node, &mut session).await,
            Directive::Stay => Ok(Transition::Unchanged),
        }
    }
}
