//! Property-based tests for tree assembly and rendering

use super::*;
use crate::platform::testing::{EchoTranslator, MockMessenger};
use crate::session::InMemorySessions;
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    /// Add a child under the n-th node created so far
    Add { parent: usize, text: String },
    /// Move the n-th node under the m-th one
    Move { node: usize, parent: usize },
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (any::<usize>(), "[a-z]{1,6}").prop_map(|(parent, text)| Step::Add { parent, text }),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(node, parent)| Step::Move { node, parent }),
    ]
}

/// Apply the steps and return the tree plus how many nodes were created
fn assemble(steps: &[Step]) -> (MenuTree, usize) {
    let builder = MenuBuilder::new();
    let mut nodes = vec![builder.root()];
    for step in steps {
        match step {
            Step::Add { parent, text } => {
                let parent = nodes[parent % nodes.len()];
                nodes.push(parent.add_child(text.clone(), None));
            }
            Step::Move { node, parent } => {
                let node = nodes[node % nodes.len()];
                let parent = nodes[parent % nodes.len()];
                // cycles are rejected and leave the tree as it was
                let _ = parent.add_children(&[node]);
            }
        }
    }
    let created = nodes.len();
    (builder.build(), created)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn bind_menu(tree: MenuTree, base_path: &str) -> Menu {
    let config = crate::config::MenuConfig {
        base_path: base_path.to_string(),
        default_locale: "en".to_string(),
        locales: vec!["en".to_string(), "fr".to_string()],
    };
    Menu::new(
        tree,
        config,
        Arc::new(MockMessenger::new()),
        Arc::new(EchoTranslator),
        Arc::new(InMemorySessions::new()),
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_every_node_is_reachable_with_distinct_id(steps in prop::collection::vec(arb_step(), 0..60)) {
        let (tree, created) = assemble(&steps);
        let order = tree.depth_first();
        let unique: HashSet<_> = order.iter().copied().collect();

        prop_assert_eq!(order.len(), created);
        prop_assert_eq!(unique.len(), created);
        prop_assert_eq!(tree.len(), created);
    }

    #[test]
    fn prop_children_point_back_at_parent(steps in prop::collection::vec(arb_step(), 0..60)) {
        let (tree, _) = assemble(&steps);
        for id in tree.depth_first() {
            let node = tree.node(id).unwrap();
            for child in node.children() {
                prop_assert_eq!(tree.node(*child).unwrap().parent(), Some(id));
            }
        }
        prop_assert_eq!(tree.node(tree.root()).unwrap().parent(), None);
    }

    #[test]
    fn prop_path_extends_parent_path(
        steps in prop::collection::vec(arb_step(), 0..40),
        base in "[a-z]{1,8}",
    ) {
        let (tree, _) = assemble(&steps);
        let menu = bind_menu(tree, &base);
        let rt = runtime();

        rt.block_on(menu.render_all()).unwrap();

        for id in menu.tree().depth_first() {
            let node = menu.tree().node(id).unwrap();
            let path = rt.block_on(node.path());
            match node.parent() {
                Some(parent) => {
                    let parent_path = rt.block_on(menu.tree().node(parent).unwrap().path());
                    prop_assert_eq!(path, format!("{parent_path}/{}", node.text()));
                }
                None => prop_assert_eq!(path, base.clone()),
            }
            for locale in ["en", "fr"] {
                let markup = rt.block_on(node.markup(locale)).unwrap();
                prop_assert_eq!(markup.rows.len(), node.children().len());
            }
        }
    }

    #[test]
    fn prop_rerender_keeps_one_binding_per_option(steps in prop::collection::vec(arb_step(), 0..40)) {
        let (tree, created) = assemble(&steps);
        let menu = bind_menu(tree, "menu");
        let rt = runtime();

        rt.block_on(menu.render_all()).unwrap();
        rt.block_on(menu.render("en")).unwrap();

        prop_assert_eq!(rt.block_on(menu.handlers().len()), (created - 1) * 2);
    }
}
