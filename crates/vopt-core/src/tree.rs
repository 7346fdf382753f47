//! Arena backed syntax tree with parent back-references.
//!
//! Every node lives in one [`Arena`] and is addressed by a [`NodeId`].
//! Parent links are plain ids, and the mutation primitives below always
//! update both directions of a link in the same step: a node is never
//! listed among the children of one node while pointing at another parent.
//! Nodes dropped by a replacement stay allocated but become unreachable from
//! the root; [`Tree::is_attached`] tells the two states apart.

use crate::arena::Arena;

pub mod builder;
pub mod debug;
#[cfg(feature = "tree-json")]
pub mod json;
pub mod node;

pub use node::{Attributes, Node, NodeId, NodeKind, attr};

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Arena<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new(NodeKind::File)
    }
}

impl Tree {
    /// Creates a tree holding a single root node of the given kind.
    pub fn new(root_kind: NodeKind) -> Self {
        let mut nodes = Arena::new(64);
        let root = nodes.alloc(Node::new(root_kind));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Number of arena slots, including nodes detached by rewrites.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.alloc(Node::new(kind))
    }

    /// Allocates a detached node and attaches `children` to it in order.
    pub fn create_with_children(
        &mut self,
        kind: NodeKind,
        children: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        let id = self.create(kind);
        for child in children {
            self.append_child(id, child);
        }
        id
    }

    /// Appends `child` to `parent`, moving it out of its previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            !self.is_ancestor_or_self(child, parent),
            "attaching a node below itself would create a cycle"
        );
        self.detach(child);
        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Removes `id` from its parent's children and clears its parent link.
    ///
    /// Returns the position it occupied, or `None` if it was already detached.
    pub fn detach(&mut self, id: NodeId) -> Option<usize> {
        let parent = self.nodes[id].parent.take()?;
        let siblings = &mut self.nodes[parent].children;
        let position = siblings.iter().position(|&child| child == id)?;
        siblings.remove(position);
        Some(position)
    }

    /// Puts `new` at the position of `old` and drops `old` from the tree.
    ///
    /// `new` may currently live anywhere, including inside `old`'s subtree; it
    /// is relocated, not copied. Replacing the root makes `new` the root.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) {
        self.replace_node_with_sequence(old, &[new]);
    }

    /// Splices `new_nodes`, in order, into the position of `old` and drops
    /// `old` from the tree.
    ///
    /// An empty sequence simply removes `old`. Replacing the root with
    /// anything but exactly one node makes a new `block` holding the sequence
    /// the root.
    pub fn replace_node_with_sequence(&mut self, old: NodeId, new_nodes: &[NodeId]) {
        if new_nodes == [old] {
            return;
        }

        debug_assert!(
            new_nodes
                .iter()
                .all(|&new| !self.is_ancestor_or_self(new, old)),
            "a node cannot replace itself or one of its own descendants"
        );

        if old == self.root && new_nodes.len() != 1 {
            let block = self.create(NodeKind::Block);
            for &new in new_nodes {
                self.append_child(block, new);
            }
            self.root = block;
            return;
        }

        // Pull the replacements out first: they may be descendants of `old`
        // or siblings preceding it, both of which shift positions.
        for &new in new_nodes {
            self.detach(new);
        }

        match self.nodes[old].parent {
            Some(parent) => {
                let position = self.detach(old).unwrap_or(self.nodes[parent].children.len());
                let siblings = &mut self.nodes[parent].children;
                siblings.splice(position..position, new_nodes.iter().copied());
                for &new in new_nodes {
                    self.nodes[new].parent = Some(parent);
                }
            }
            None if old == self.root => {
                if let [new] = new_nodes {
                    self.root = *new;
                }
            }
            None => {}
        }
    }

    /// Returns `true` if `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.ancestors_or_self(id).last() == Some(self.root)
    }

    /// Returns `true` if `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_or_self(node).any(|id| id == ancestor)
    }

    /// Iterates over the parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    fn ancestors_or_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.parent(current))
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Walks up from `node`, skipping `group` wrappers, and returns the first
    /// ancestor that is not a group.
    ///
    /// Stops at `stop_at` when it is reached first and returns it; returns
    /// `None` when the chain ends before a non-group ancestor is found.
    pub fn nearest_non_group_ancestor(
        &self,
        node: NodeId,
        stop_at: Option<NodeId>,
    ) -> Option<NodeId> {
        for ancestor in self.ancestors(node) {
            if Some(ancestor) == stop_at || !self.nodes[ancestor].is(NodeKind::Group) {
                return Some(ancestor);
            }
        }
        stop_at
    }

    /// Unwraps nested `group` nodes that have exactly one non-comment child.
    pub fn skip_groups(&self, mut id: NodeId) -> NodeId {
        while self.nodes[id].is(NodeKind::Group) && self.children_len(id, true) == 1 {
            match self.first_child(id, true) {
                Some(inner) => id = inner,
                None => break,
            }
        }
        id
    }

    pub fn children_len(&self, id: NodeId, ignore_comments: bool) -> usize {
        self.children_iter(id, ignore_comments).count()
    }

    pub fn first_child(&self, id: NodeId, ignore_comments: bool) -> Option<NodeId> {
        self.children_iter(id, ignore_comments).next()
    }

    pub fn child_at(&self, id: NodeId, position: usize, ignore_comments: bool) -> Option<NodeId> {
        self.children_iter(id, ignore_comments).nth(position)
    }

    /// Returns the first child of the given kind (the "named slot" access).
    pub fn child_by_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].is(kind))
    }

    pub fn children_iter(
        &self,
        id: NodeId,
        ignore_comments: bool,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(move |&child| !(ignore_comments && self.nodes[child].kind.is_comment()))
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
