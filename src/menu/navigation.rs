//! Navigation state machine
//!
//! A session sits at one node. `next` and `back` decide which rendered
//! screen to show and edit the session's message in place. Session state
//! only changes once the edit succeeded, so a failed edit leaves the
//! recorded position matching what the user still sees.

use super::markup::Markup;
use super::{Menu, MenuError, NodeId};
use crate::session::Session;
use std::sync::Arc;

/// Outcome of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing needed redrawing
    Unchanged,
    /// The screen was edited and the session now sits at this node
    Moved(NodeId),
}

impl Menu {
    /// Show the options below `node`, or refresh the parent's screen when
    /// `node` is a leaf whose caption changed
    pub(crate) async fn next(
        &self,
        node: NodeId,
        session: &mut Session,
    ) -> Result<Transition, MenuError> {
        let current = self.tree.node(node)?;
        let leaf = current.is_leaf();
        if leaf && !session.is_dirty(node) {
            return Ok(Transition::Unchanged);
        }

        let target = if leaf {
            current.parent().unwrap_or(node)
        } else {
            node
        };
        let markup = self.markup_for(target, &session.locale).await?;
        self.update(node, node, session, &markup).await
    }

    /// Return to the screen one level up from the one being viewed
    pub(crate) async fn back(
        &self,
        node: NodeId,
        session: &mut Session,
    ) -> Result<Transition, MenuError> {
        let current = self.tree.node(node)?;
        let grandparent = match current.parent() {
            Some(parent) => self
                .tree
                .node(parent)?
                .parent()
                .map(|grandparent| (parent, grandparent)),
            None => None,
        };

        match grandparent {
            Some((parent, grandparent)) => {
                let markup = self.markup_for(grandparent, &session.locale).await?;
                self.update(node, parent, session, &markup).await
            }
            None if session.is_dirty(node) => {
                let root = self.tree.root();
                let markup = self.markup_for(root, &session.locale).await?;
                self.update(node, root, session, &markup).await
            }
            // Already at the top
            None => Ok(Transition::Unchanged),
        }
    }

    async fn markup_for(&self, node: NodeId, locale: &str) -> Result<Arc<Markup>, MenuError> {
        self.tree
            .node(node)?
            .markup(locale)
            .await
            .ok_or_else(|| MenuError::NotRendered(locale.to_string()))
    }

    /// Edit the session's message and, on success, move it to `position`
    async fn update(
        &self,
        node: NodeId,
        position: NodeId,
        session: &mut Session,
        markup: &Markup,
    ) -> Result<Transition, MenuError> {
        let edited = self
            .messenger
            .edit(&session.message, &session.message.text, markup)
            .await;
        match edited {
            Ok(message) => {
                session.clear_dirty(node);
                session.message = message;
                session.position = position;
                tracing::debug!(
                    user = %session.user,
                    node = %node,
                    position = %position,
                    "Menu updated"
                );
                Ok(Transition::Moved(position))
            }
            Err(e) => {
                tracing::error!(
                    user = %session.user,
                    node = %node,
                    error = %e,
                    "Failed to update menu"
                );
                Err(MenuError::Edit(e))
            }
        }
    }
}
