//! Hierarchical menu engine
//!
//! A [`MenuTree`] is assembled once, rendered per locale into option layouts,
//! and then driven by button presses: each press runs the node's endpoint and
//! the navigation step it asks for edits the user's menu message in place.

mod dispatch;
mod endpoint;
mod error;
mod markup;
mod navigation;
mod render;
mod tree;

#[cfg(test)]
mod proptests;

pub use dispatch::{Binding, HandlerKind, HandlerRegistry};
pub use endpoint::{endpoint_fn, Directive, Endpoint, EndpointContext, FnEndpoint};
pub use error::MenuError;
pub use markup::{button_id, Button, Markup, UNIQUE_PREFIX};
pub use navigation::Transition;
pub use tree::{MenuBuilder, MenuTree, Node, NodeId, NodeRef};

use crate::config::MenuConfig;
use crate::platform::{ChatId, Messenger, SessionStore, Translator, UserId};
use crate::session::{Session, SessionHandle};
use std::collections::BTreeSet;
use std::sync::atomic::AtomicI64;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A rendered menu bound to its collaborators
pub struct Menu {
    tree: MenuTree,
    config: MenuConfig,
    messenger: Arc<dyn Messenger>,
    translator: Arc<dyn Translator>,
    sessions: Arc<dyn SessionStore>,
    handlers: HandlerRegistry,
    rendered: RwLock<BTreeSet<String>>,
    /// Stamp of the latest render pass, in microseconds
    last_stamp: AtomicI64,
}

impl Menu {
    pub fn new(
        tree: MenuTree,
        config: MenuConfig,
        messenger: Arc<dyn Messenger>,
        translator: Arc<dyn Translator>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            tree,
            config,
            messenger,
            translator,
            sessions,
            handlers: HandlerRegistry::default(),
            rendered: RwLock::new(BTreeSet::new()),
            last_stamp: AtomicI64::new(0),
        }
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Locales that completed at least one render pass
    pub async fn rendered_locales(&self) -> Vec<String> {
        self.rendered.read().await.iter().cloned().collect()
    }

    /// Render every configured locale
    pub async fn render_all(&self) -> Result<(), MenuError> {
        for locale in &self.config.locales {
            self.render(locale).await?;
        }
        Ok(())
    }

    /// Send the root screen to `chat` and start a session for `user`
    pub async fn open(
        &self,
        user: UserId,
        chat: ChatId,
        caption: &str,
    ) -> Result<SessionHandle, MenuError> {
        let locale = self.config.default_locale.clone();
        let root = self.tree.root();
        let markup = self
            .tree
            .node(root)?
            .markup(&locale)
            .await
            .ok_or_else(|| MenuError::NotRendered(locale.clone()))?;

        let message = match self.messenger.send(chat, caption, &markup).await {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(user = %user, error = %e, "Failed to open menu");
                return Err(MenuError::Send(e));
            }
        };

        tracing::info!(user = %user, locale = %locale, "Menu opened");
        Ok(self
            .sessions
            .insert(Session::new(user, root, message, locale))
            .await)
    }

    /// Language of a user's session, or the default when there is none
    pub async fn language(&self, user: UserId) -> String {
        match self.sessions.session(user).await {
            Some(session) => session.lock().await.locale.clone(),
            None => self.config.default_locale.clone(),
        }
    }

    /// Switch a user's locale and redraw their current screen.
    ///
    /// For use outside endpoints; an endpoint already holds the session and
    /// goes through [`EndpointContext::set_language`] instead.
    pub async fn set_language(
        &self,
        user: UserId,
        locale: impl Into<String>,
    ) -> Result<Transition, MenuError> {
        let Some(session) = self.sessions.session(user).await else {
            tracing::warn!(user = %user, "Session does not exist");
            return Err(MenuError::SessionNotFound(user));
        };
        let mut session = session.lock().await;
        session.locale = locale.into();
        let position = session.position;
        session.mark_dirty(position);
        tracing::info!(user = %user, locale = %session.locale, "Language switched");
        self.next(position, &mut session).await
    }
}
