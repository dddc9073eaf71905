// Item tree - local mirror of the remote report hierarchy
//
// The root stands for the launch. Every other node owns a TestItem that
// already carries its remote id: a node is only inserted once the service
// (or a lookup) handed out its identity.

use crate::client::ReportClient;
use crate::error::ReportError;
use crate::events::LeafContainer;
use crate::model::{ItemKind, RemoteId, TestItem};
use crate::time::{TimeKeeper, Timestamp};
use std::collections::HashMap;
use tracing::debug;

/// Index of a node inside an [`ItemTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct TreeNode {
    segment: String,
    item: Option<TestItem>,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
}

impl TreeNode {
    /// `None` only for the root
    pub fn item(&self) -> Option<&TestItem> {
        self.item.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// How this process shares the launch with others
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportMode {
    /// Several worker processes report into one launch
    pub parallel: bool,
    /// The launch was started by someone else
    pub attach_to_launch: bool,
}

impl ReportMode {
    /// Folder identities must be resolved through the service
    pub fn is_shared(&self) -> bool {
        self.parallel || self.attach_to_launch
    }
}

#[derive(Debug, Clone)]
pub struct ItemTree {
    nodes: Vec<TreeNode>,
}

impl Default for ItemTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TreeNode {
                segment: String::new(),
                item: None,
                parent: None,
                children: HashMap::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Number of items, the root excluded
    pub fn item_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn child(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        self.nodes[parent.0].children.get(segment).copied()
    }

    pub fn item(&self, id: NodeId) -> Option<&TestItem> {
        self.nodes[id.0].item.as_ref()
    }

    pub fn item_mut(&mut self, id: NodeId) -> Option<&mut TestItem> {
        self.nodes[id.0].item.as_mut()
    }

    pub fn remote_id(&self, id: NodeId) -> Option<&RemoteId> {
        self.item(id).and_then(TestItem::remote_id)
    }

    /// Node reached by following `path` from the root
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root(), |node, segment| self.child(node, segment))
    }

    /// Make sure every node named by `container.path` exists locally and
    /// remotely, and return the leaf.
    ///
    /// In shared mode a missing folder is first looked up on the service
    /// and reused when another process already created it. Two processes
    /// can still miss each other and both create the folder; the service
    /// then shows it twice.
    pub fn sync_path<C: ReportClient>(
        &mut self,
        container: &LeafContainer,
        time: Timestamp,
        mode: ReportMode,
        client: &mut C,
        clock: &mut TimeKeeper,
    ) -> Result<NodeId, ReportError> {
        let last = match container.path.len() {
            0 => {
                return Err(ReportError::EmptyPath {
                    uri: container.description.clone().unwrap_or_default(),
                });
            }
            n => n - 1,
        };

        let mut parent = self.root();
        for (index, segment) in container.path.iter().enumerate() {
            if let Some(child) = self.child(parent, segment) {
                parent = child;
                continue;
            }

            let start_time = clock.adjust(time);
            let item = if index < last {
                TestItem::new(format!("Folder: {}", segment), ItemKind::Suite, start_time)
            } else {
                TestItem::new(container.title.clone(), ItemKind::Test, start_time)
                    .with_description(container.description.clone())
                    .with_tags(container.tags.iter().cloned())
            };

            let parent_id = self.remote_id(parent).cloned();
            let borrowed = if mode.is_shared() && item.kind == ItemKind::Suite {
                client.lookup_item_id(&item.name, parent_id.as_ref())?
            } else {
                None
            };

            let item = match borrowed {
                Some(remote_id) => {
                    debug!("Reusing '{}' created by another process ({})", item.name, remote_id);
                    item.borrowed(remote_id)
                }
                None => self.start_remote(item, parent_id.as_ref(), client)?,
            };

            parent = self.insert(parent, segment.clone(), item);
        }

        Ok(parent)
    }

    /// Create `item` remotely and add it under `parent`
    pub fn start_child<C: ReportClient>(
        &mut self,
        parent: NodeId,
        segment: &str,
        item: TestItem,
        client: &mut C,
    ) -> Result<NodeId, ReportError> {
        let parent_id = self.remote_id(parent).cloned();
        let item = self.start_remote(item, parent_id.as_ref(), client)?;
        let key = if self.child(parent, segment).is_some() {
            format!("{}#{}", segment, self.nodes.len())
        } else {
            segment.to_string()
        };
        Ok(self.insert(parent, key, item))
    }

    fn start_remote<C: ReportClient>(
        &self,
        mut item: TestItem,
        parent: Option<&RemoteId>,
        client: &mut C,
    ) -> Result<TestItem, ReportError> {
        let remote_id = client.start_item(&item, parent)?;
        debug!("Started {:?} '{}' ({})", item.kind, item.name, remote_id);
        item.assign_remote_id(remote_id)?;
        Ok(item)
    }

    fn insert(&mut self, parent: NodeId, segment: String, item: TestItem) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            segment: segment.clone(),
            item: Some(item),
            parent: Some(parent),
            children: HashMap::new(),
        });
        self.nodes[parent.0].children.insert(segment, id);
        id
    }

    /// Descendants of `from` with every child listed before its parent
    pub fn post_order(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.collect_post_order(from, &mut order);
        order.retain(|id| *id != from);
        order
    }

    fn collect_post_order(&self, id: NodeId, order: &mut Vec<NodeId>) {
        let mut children: Vec<NodeId> = self.nodes[id.0].children.values().copied().collect();
        children.sort_by_key(|child| child.0);
        for child in children {
            self.collect_post_order(child, order);
        }
        order.push(id);
    }

    /// Segments from the root down to `id`
    pub fn path_of(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            let entry = &self.nodes[node.0];
            if entry.parent.is_some() {
                path.push(entry.segment.as_str());
            }
            current = entry.parent;
        }
        path.reverse();
        path
    }
}
