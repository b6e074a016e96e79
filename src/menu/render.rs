//! Locale render pass

use super::dispatch::{Binding, HandlerKind};
use super::markup::{button_id, Button, Markup};
use super::{Menu, MenuError, NodeId};
use std::collections::HashMap;
use std::sync::atomic::Ordering;

impl Menu {
    /// Build the option layout of every node for `locale` and bind a
    /// handler to each option.
    ///
    /// Running it again for the same locale produces fresh option
    /// identifiers; the previous generation stops resolving.
    pub async fn render(&self, locale: &str) -> Result<(), MenuError> {
        let stamp = self.next_stamp();
        let paths = self.derive_paths()?;

        let mut options = 0usize;
        for id in self.tree.depth_first() {
            let node = self.tree.node(id)?;
            let mut rows = Vec::with_capacity(node.children().len());
            for &child_id in node.children() {
                let child = self.tree.node(child_id)?;
                let unique = button_id(stamp, locale, child_id);
                let path = paths
                    .get(&child_id)
                    .ok_or(MenuError::UnknownNode(child_id))?;
                let text = self.translator.translate(locale, path);
                let kind = if child.endpoint().is_some() {
                    HandlerKind::Interactive
                } else {
                    HandlerKind::DeadEnd
                };
                self.handlers
                    .register(
                        unique.clone(),
                        Binding {
                            node: child_id,
                            locale: locale.to_string(),
                            kind,
                        },
                    )
                    .await;
                rows.push(vec![Button { text, unique }]);
            }
            options += rows.len();
            let path = paths.get(&id).ok_or(MenuError::UnknownNode(id))?;
            node.set_path(path.clone()).await;
            node.set_markup(locale, Markup { rows }).await;
        }

        self.rendered.write().await.insert(locale.to_string());
        tracing::info!(locale, nodes = self.tree.len(), options, "Menu rendered");
        Ok(())
    }

    /// Current time in microseconds, bumped past the previous pass so two
    /// renders never share a stamp
    fn next_stamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_micros();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    /// Lookup key of every node: the base path for the root, the parent's
    /// path plus `/` and the caption key for everything below it
    fn derive_paths(&self) -> Result<HashMap<NodeId, String>, MenuError> {
        let mut paths = HashMap::with_capacity(self.tree.len());
        for id in self.tree.depth_first() {
            let node = self.tree.node(id)?;
            let path = match node.parent().and_then(|parent| paths.get(&parent)) {
                Some(parent_path) => format!("{parent_path}/{}", node.text()),
                None => self.config.base_path.clone(),
            };
            paths.insert(id, path);
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Fixture;
    use super::*;

    #[tokio::test]
    async fn test_paths_follow_tree_shape() {
        let fx = Fixture::new().await;
        let tree = fx.menu.tree();

        assert_eq!(tree.node(tree.root()).unwrap().path().await, "menu");
        assert_eq!(tree.node(fx.a).unwrap().path().await, "menu/A");
        assert_eq!(tree.node(fx.a1).unwrap().path().await, "menu/A/A1");
        assert_eq!(tree.node(fx.b1a).unwrap().path().await, "menu/B/B1/B1a");
    }

    #[tokio::test]
    async fn test_markup_lists_children_in_order() {
        let fx = Fixture::new().await;
        let markup = fx.markup(fx.a, "fr").await;

        let labels: Vec<_> = markup.buttons().map(|b| b.text.as_str()).collect();
        assert_eq!(labels, vec!["fr:menu/A/A1", "fr:menu/A/A2"]);
        assert!(markup.buttons().all(|b| b.unique.contains("_node_fr")));
        assert!(fx.markup(fx.a1, "fr").await.is_empty());
    }

    #[tokio::test]
    async fn test_rendered_locales_are_tracked() {
        let fx = Fixture::new().await;
        assert_eq!(fx.menu.rendered_locales().await, vec!["en", "fr"]);
        assert!(fx
            .menu
            .tree()
            .node(fx.a)
            .unwrap()
            .markup("de")
            .await
            .is_none());

        fx.menu.render("de").await.unwrap();
        assert_eq!(fx.menu.rendered_locales().await, vec!["de", "en", "fr"]);
        assert!(fx.menu.tree().node(fx.a).unwrap().markup("de").await.is_some());
    }

    #[tokio::test]
    async fn test_handler_kind_follows_endpoint() {
        let fx = Fixture::new().await;
        let root = fx.markup(fx.menu.tree().root(), "en").await;
        let a_option = &root.rows[0][0];
        let binding = fx.menu.handlers().resolve(&a_option.unique).await.unwrap();
        assert_eq!(binding.node, fx.a);
        assert_eq!(binding.kind, HandlerKind::DeadEnd);

        let a = fx.markup(fx.a, "en").await;
        let binding = fx.menu.handlers().resolve(&a.rows[0][0].unique).await.unwrap();
        assert_eq!(binding.node, fx.a1);
        assert_eq!(binding.kind, HandlerKind::Interactive);
    }

    #[tokio::test]
    async fn test_rerender_issues_fresh_identifiers() {
        let fx = Fixture::new().await;
        let root = fx.menu.tree().root();
        // seven non-root nodes, two locales
        assert_eq!(fx.menu.handlers().len().await, 14);
        let before = fx.markup(root, "en").await;

        fx.menu.render("en").await.unwrap();
        let after = fx.markup(root, "en").await;

        assert_eq!(fx.menu.handlers().len().await, 14);
        for (old, new) in before.buttons().zip(after.buttons()) {
            assert_ne!(old.unique, new.unique);
            assert!(fx.menu.handlers().resolve(&old.unique).await.is_none());
            assert!(fx.menu.handlers().resolve(&new.unique).await.is_some());
        }
        // the other locale keeps its bindings
        let fr = fx.markup(root, "fr").await;
        assert!(fx.menu.handlers().resolve(&fr.rows[0][0].unique).await.is_some());
    }

    #[test]
    fn test_stamps_increase_within_the_same_instant() {
        let menu = Menu::new(
            crate::menu::MenuBuilder::new().build(),
            crate::config::MenuConfig::default(),
            std::sync::Arc::new(crate::platform::testing::MockMessenger::new()),
            std::sync::Arc::new(crate::platform::testing::EchoTranslator),
            std::sync::Arc::new(crate::session::InMemorySessions::new()),
        );
        let stamps: Vec<_> = (0..100).map(|_| menu.next_stamp()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
