//! The view tree arena.
//!
//! A `ViewTree` owns every node in a single slot arena addressed by stable
//! [`NodeId`] indices. Children store indices, parents are back-links, and a
//! free list recycles removed slots. The whole graph is freed together when
//! the tree is dropped, and a partially built tree is always safe to drop.
//!
//! Ownership rules: every node has at most one parent, the root has none,
//! and attaching a node that already has an owner is an error. Reusing a
//! subtree requires an explicit deep copy. Sharing happens only at the tree
//! level: layout hands an `Arc<ViewTree>` to renderers, which borrow it
//! read-only.

use crate::error::TreeError;
use crate::node::{NodeId, NodeKind, ViewNode};
use galley_types::{DocumentMeta, Size};

enum Slot {
    Occupied(Box<ViewNode>),
    Free { next: Option<u32> },
}

/// A positioned, styled layout tree in absolute typographical coordinates.
pub struct ViewTree {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    live: usize,
    root: Option<NodeId>,
    pages: Vec<NodeId>,
    size: Size,
    pub meta: DocumentMeta,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            live: 0,
            root: None,
            pages: Vec::new(),
            size: Size::zero(),
            meta: DocumentMeta::default(),
        }
    }

    pub fn with_meta(meta: DocumentMeta) -> Self {
        Self {
            meta,
            ..Self::new()
        }
    }

    // --- Node creation and access ---

    /// Allocates a new detached node and returns its id.
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Box::new(ViewNode::new(kind));
        match self.free_head {
            Some(index) => {
                let next = match &self.slots[index as usize] {
                    Slot::Free { next } => *next,
                    Slot::Occupied(_) => None,
                };
                self.free_head = next;
                self.slots[index as usize] = Slot::Occupied(node);
                self.live += 1;
                NodeId(index)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot::Occupied(node));
                self.live += 1;
                NodeId(index)
            }
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&ViewNode> {
        match self.slots.get(id.0 as usize) {
            Some(Slot::Occupied(node)) => Some(node.as_ref()),
            _ => None,
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ViewNode> {
        match self.slots.get_mut(id.0 as usize) {
            Some(Slot::Occupied(node)) => Some(node.as_mut()),
            _ => None,
        }
    }

    fn require(&self, id: NodeId) -> Result<&ViewNode, TreeError> {
        self.node(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn require_mut(&mut self, id: NodeId) -> Result<&mut ViewNode, TreeError> {
        self.node_mut(id).ok_or(TreeError::NodeNotFound(id))
    }

    /// Number of live nodes in the arena.
    pub fn live_node_count(&self) -> usize {
        self.live
    }

    // --- Structure ---

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Makes `id` the tree root. The node must be detached.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.require(id)?;
        if node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// Transfers ownership of `child` to `parent`, appending it after the
    /// existing children.
    ///
    /// Fails if either node is gone, if `child` already has an owner (reuse
    /// requires [`deep_copy`](Self::deep_copy)), if `child` is the tree root,
    /// or if the edge would create a cycle.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.require(parent)?;
        let child_node = self.require(child)?;
        if child_node.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.root == Some(child) {
            return Err(TreeError::CannotAttachRoot(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::CycleDetected { parent, child });
        }

        self.require_mut(child)?.parent = Some(parent);
        self.require_mut(parent)?.children.push(child);
        Ok(())
    }

    /// True if `ancestor` is on the parent chain of `node`.
    fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    /// Detaches `child` from its parent, leaving it alive and parentless.
    pub fn detach(&mut self, child: NodeId) -> Result<(), TreeError> {
        let parent = self.require(child)?.parent;
        if let Some(parent) = parent {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|&c| c != child);
            }
        }
        self.require_mut(child)?.parent = None;
        Ok(())
    }

    /// Removes `id` and every descendant, recycling their slots.
    ///
    /// Returns the number of nodes freed. Each node is freed exactly once;
    /// stale ids into the removed subtree no longer resolve.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize, TreeError> {
        self.require(id)?;
        self.detach(id)?;
        if self.root == Some(id) {
            self.root = None;
        }
        self.pages.retain(|&p| p != id);

        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for node_id in &doomed {
            self.slots[node_id.0 as usize] = Slot::Free {
                next: self.free_head,
            };
            self.free_head = Some(node_id.0);
            self.live -= 1;
        }
        Ok(doomed.len())
    }

    // --- Traversal and search ---

    /// Pre-order iterator over `start` and its descendants, children in
    /// insertion order.
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: if self.node(start).is_some() {
                vec![start]
            } else {
                Vec::new()
            },
        }
    }

    /// Structured recursive pre-order walk with depth, replacing callback
    /// tree walking. The visitor sees each node exactly once.
    pub fn walk<F>(&self, start: NodeId, visitor: &mut F)
    where
        F: FnMut(NodeId, &ViewNode, usize),
    {
        self.walk_at_depth(start, 0, visitor);
    }

    fn walk_at_depth<F>(&self, id: NodeId, depth: usize, visitor: &mut F)
    where
        F: FnMut(NodeId, &ViewNode, usize),
    {
        let Some(node) = self.node(id) else {
            return;
        };
        visitor(id, node, depth);
        let children = node.children.clone();
        for child in children {
            self.walk_at_depth(child, depth + 1, visitor);
        }
    }

    /// First node (pre-order from the root) whose role equals `role`.
    pub fn find_by_role(&self, role: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .find(|&id| self.node(id).and_then(|n| n.role.as_deref()) == Some(role))
    }

    /// First node (pre-order from the root) whose id string equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root?;
        self.descendants(root)
            .find(|&n| self.node(n).and_then(|n| n.id.as_deref()) == Some(id))
    }

    // --- Geometry helpers for layout producers ---

    /// Shifts the bounds of `id` and all its descendants by (dx, dy).
    ///
    /// Layout producers build subtrees at a local origin and translate them
    /// into place when composing; bounds of a composite node are never
    /// auto-computed here.
    pub fn translate_subtree(&mut self, id: NodeId, dx: f64, dy: f64) {
        let ids: Vec<NodeId> = self.descendants(id).collect();
        for node_id in ids {
            if let Some(node) = self.node_mut(node_id) {
                node.bounds = node.bounds.translated(dx, dy);
            }
        }
    }

    // --- Copying ---

    /// Deep-copies the subtree rooted at `src_id` in `src` into this tree,
    /// returning the detached copy's root. This is the only way to use "the
    /// same" subtree in two places.
    pub fn deep_copy_from(&mut self, src: &ViewTree, src_id: NodeId) -> Result<NodeId, TreeError> {
        let src_node = src.node(src_id).ok_or(TreeError::NodeNotFound(src_id))?;

        let copy = self.new_node(src_node.kind.clone());
        {
            let node = self.require_mut(copy)?;
            node.bounds = src_node.bounds;
            node.style = src_node.style.clone();
            node.role = src_node.role.clone();
            node.id = src_node.id.clone();
        }
        for &child in &src_node.children {
            let child_copy = self.deep_copy_from(src, child)?;
            self.add_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    /// Deep-copies a subtree within this tree, returning a detached copy.
    pub fn deep_copy(&mut self, src_id: NodeId) -> Result<NodeId, TreeError> {
        let src_node = self.require(src_id)?;
        let kind = src_node.kind.clone();
        let bounds = src_node.bounds;
        let style = src_node.style.clone();
        let role = src_node.role.clone();
        let id_string = src_node.id.clone();
        let children = src_node.children.clone();

        let copy = self.new_node(kind);
        {
            let node = self.require_mut(copy)?;
            node.bounds = bounds;
            node.style = style;
            node.role = role;
            node.id = id_string;
        }
        for child in children {
            let child_copy = self.deep_copy(child)?;
            self.add_child(copy, child_copy)?;
        }
        Ok(copy)
    }

    // --- Document metadata ---

    pub fn pages(&self) -> &[NodeId] {
        &self.pages
    }

    /// Registers a node on the document page list.
    pub fn add_page(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.require(id)?;
        self.pages.push(id);
        Ok(())
    }

    /// Overall document size in points.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

/// Pre-order iterator returned by [`ViewTree::descendants`].
pub struct Descendants<'tree> {
    tree: &'tree ViewTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.tree.node(id) {
            // Reverse push keeps insertion order on pop.
            for &child in node.children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(id)
    }
}
