//! Menu tree model and assembly API

use super::endpoint::Endpoint;
use super::error::MenuError;
use super::markup::Markup;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;

/// Identity of a node, unique within one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One menu screen
pub struct Node {
    id: NodeId,
    text: String,
    endpoint: Option<Arc<dyn Endpoint>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Locale lookup key, written by the render pass
    path: RwLock<String>,
    markups: RwLock<HashMap<String, Arc<Markup>>>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Default caption key
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn endpoint(&self) -> Option<&Arc<dyn Endpoint>> {
        self.endpoint.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub async fn path(&self) -> String {
        self.path.read().await.clone()
    }

    pub(crate) async fn set_path(&self, path: String) {
        *self.path.write().await = path;
    }

    /// Options rendered for `locale`, if that locale has been rendered
    pub async fn markup(&self, locale: &str) -> Option<Arc<Markup>> {
        self.markups.read().await.get(locale).cloned()
    }

    pub(crate) async fn set_markup(&self, locale: &str, markup: Markup) {
        self.markups
            .write()
            .await
            .insert(locale.to_string(), Arc::new(markup));
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("endpoint", &self.endpoint.is_some())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Immutable tree produced by [`MenuBuilder::build`]
#[derive(Debug)]
pub struct MenuTree {
    root: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl MenuTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, MenuError> {
        self.get(id).ok_or(MenuError::UnknownNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in depth-first pre-order, children in display order
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }
}

struct Draft {
    text: String,
    endpoint: Option<Arc<dyn Endpoint>>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Grows a menu tree. Safe to share between threads while assembling.
pub struct MenuBuilder {
    serial: AtomicU64,
    root: NodeId,
    drafts: Mutex<HashMap<NodeId, Draft>>,
}

impl Default for MenuBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuBuilder {
    pub fn new() -> Self {
        let root = NodeId(1);
        let mut drafts = HashMap::new();
        drafts.insert(
            root,
            Draft {
                text: String::new(),
                endpoint: None,
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            serial: AtomicU64::new(root.0),
            root,
            drafts: Mutex::new(drafts),
        }
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            builder: self,
            id: self.root,
        }
    }

    /// Create a node that is not attached anywhere yet
    pub fn node(
        &self,
        text: impl Into<String>,
        endpoint: Option<Arc<dyn Endpoint>>,
    ) -> NodeRef<'_> {
        let id = self.allocate(text.into(), endpoint, None);
        NodeRef { builder: self, id }
    }

    fn drafts(&self) -> MutexGuard<'_, HashMap<NodeId, Draft>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate(
        &self,
        text: String,
        endpoint: Option<Arc<dyn Endpoint>>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.serial.fetch_add(1, Ordering::Relaxed) + 1);
        let mut drafts = self.drafts();
        drafts.insert(
            id,
            Draft {
                text,
                endpoint,
                parent,
                children: Vec::new(),
            },
        );
        if let Some(parent) = parent {
            if let Some(draft) = drafts.get_mut(&parent) {
                draft.children.push(id);
            }
        }
        id
    }

    fn adopt(&self, parent: NodeId, children: &[NodeId]) -> Result<(), MenuError> {
        let mut drafts = self.drafts();
        for &child in children {
            let mut cursor = Some(parent);
            while let Some(id) = cursor {
                if id == child {
                    return Err(MenuError::Cycle { parent, child });
                }
                cursor = drafts.get(&id).and_then(|draft| draft.parent);
            }

            let previous = match drafts.get_mut(&child) {
                Some(draft) => draft.parent.replace(parent),
                None => return Err(MenuError::UnknownNode(child)),
            };
            if let Some(old) = previous {
                if let Some(draft) = drafts.get_mut(&old) {
                    draft.children.retain(|id| *id != child);
                }
            }
            if let Some(draft) = drafts.get_mut(&parent) {
                draft.children.push(child);
            }
        }
        Ok(())
    }

    /// Freeze the tree. Nodes not reachable from the root are dropped.
    pub fn build(self) -> MenuTree {
        let root = self.root;
        let mut drafts = self
            .drafts
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        let mut nodes = HashMap::with_capacity(drafts.len());
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(draft) = drafts.remove(&id) else {
                continue;
            };
            stack.extend(draft.children.iter().copied());
            nodes.insert(
                id,
                Node {
                    id,
                    text: draft.text,
                    endpoint: draft.endpoint,
                    parent: draft.parent,
                    children: draft.children,
                    path: RwLock::new(String::new()),
                    markups: RwLock::new(HashMap::new()),
                },
            );
        }

        if !drafts.is_empty() {
            tracing::debug!(
                dropped = drafts.len(),
                "Dropping menu nodes never attached to the root"
            );
        }

        MenuTree { root, nodes }
    }
}

/// Handle to a node while the tree is being assembled
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    builder: &'a MenuBuilder,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Append a child and return it
    pub fn add_child(
        &self,
        text: impl Into<String>,
        endpoint: Option<Arc<dyn Endpoint>>,
    ) -> NodeRef<'a> {
        let id = self.builder.allocate(text.into(), endpoint, Some(self.id));
        NodeRef {
            builder: self.builder,
            id,
        }
    }

    /// Append a child that takes over the given subtrees, and return it
    pub fn add_child_with(
        &self,
        text: impl Into<String>,
        endpoint: Option<Arc<dyn Endpoint>>,
        subtrees: &[NodeRef<'_>],
    ) -> Result<NodeRef<'a>, MenuError> {
        let child = self.add_child(text, endpoint);
        child.add_children(subtrees)?;
        Ok(child)
    }

    /// Reparent each node under this one, keeping their order
    pub fn add_children(&self, nodes: &[NodeRef<'_>]) -> Result<NodeRef<'a>, MenuError> {
        let ids: Vec<NodeId> = nodes.iter().map(NodeRef::id).collect();
        self.builder.adopt(self.id, &ids)?;
        Ok(*self)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.id).finish()
    }
}
