//! Per-user navigation state

use crate::menu::NodeId;
use crate::platform::{MessageRef, SessionStore, UserId};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Shared handle to a session; the lock is held for a whole callback
pub type SessionHandle = Arc<Mutex<Session>>;

/// Where a user is in the menu and what their screen currently shows
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserId,
    /// Node whose options the user was last moved to
    pub position: NodeId,
    /// Message the menu is displayed in
    pub message: MessageRef,
    pub locale: String,
    /// Nodes whose caption changed since the last edit
    dirty: HashSet<NodeId>,
}

impl Session {
    pub fn new(
        user: UserId,
        position: NodeId,
        message: MessageRef,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            user,
            position,
            message,
            locale: locale.into(),
            dirty: HashSet::new(),
        }
    }

    /// Text currently shown above the options
    pub fn caption(&self) -> &str {
        &self.message.text
    }

    /// Replace the displayed caption on behalf of `node`.
    ///
    /// Returns whether anything changed. Identical text leaves the dirty
    /// state untouched so no redundant edit follows.
    pub fn set_caption(&mut self, node: NodeId, text: String) -> bool {
        if self.message.text == text {
            return false;
        }
        self.message.text = text;
        self.dirty.insert(node);
        true
    }

    pub fn is_dirty(&self, node: NodeId) -> bool {
        self.dirty.contains(&node)
    }

    pub fn mark_dirty(&mut self, node: NodeId) {
        self.dirty.insert(node);
    }

    pub(crate) fn clear_dirty(&mut self, node: NodeId) {
        self.dirty.remove(&node);
    }
}

/// In-process session storage
#[derive(Default)]
pub struct InMemorySessions {
    sessions: RwLock<HashMap<UserId, SessionHandle>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn session(&self, user: UserId) -> Option<SessionHandle> {
        self.sessions.read().await.get(&user).cloned()
    }

    async fn insert(&self, session: Session) -> SessionHandle {
        let user = session.user;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(user, Arc::clone(&handle));
        handle
    }

    async fn remove(&self, user: UserId) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&user)
    }
}
