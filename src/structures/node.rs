/*!
(The internal representation of) a node of the model graph.

Each node is identified by a [NodeId] assigned at creation in monotonically increasing order and never reused while the node exists.
Creation-order traversal is significant: candidate blockers are always tried smallest-id-first, which the termination argument of the calculus relies on.

Nodes are stored in, and accessed through, the [node database](crate::db::node).
*/

use std::collections::BTreeMap;

use crate::structures::concept::{Concept, Role};

/// A node, identified by its index into the node database.
pub type NodeId = u32;

/// The maximum instance of a node id.
pub const NODE_MAX: NodeId = NodeId::MAX;

/// The kind of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A named individual, or the root of a tree of fresh nodes.
    Root,

    /// A fresh node introduced by existential expansion --- the only kind blocking applies to.
    Tree,

    /// A node introduced by description-graph expansion.
    Graph,
}

/// The block status of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockStatus {
    /// Not blocked.
    Unblocked,

    /// Directly blocked by the given node.
    Directly(NodeId),

    /// Indirectly blocked, via the given (blocked) parent.
    Indirectly(NodeId),

    /// Blocked by a signature proven safe in a previously found model.
    Signature,
}

impl BlockStatus {
    /// Whether the node is blocked in any way.
    pub fn is_blocked(&self) -> bool {
        !matches!(self, BlockStatus::Unblocked)
    }

    /// Whether the node is directly blocked.
    ///
    /// Signature blocks count as direct: there is a witness, though not one in the current model.
    pub fn is_directly_blocked(&self) -> bool {
        matches!(self, BlockStatus::Directly(_) | BlockStatus::Signature)
    }

    /// The node recorded as the reason for the block, if any.
    ///
    /// For an indirect block this is the blocked parent.
    pub fn witness(&self) -> Option<NodeId> {
        match self {
            BlockStatus::Directly(node) | BlockStatus::Indirectly(node) => Some(*node),
            BlockStatus::Unblocked | BlockStatus::Signature => None,
        }
    }
}

/// A node of the model graph.
///
/// The label maps each asserted concept to its core flag.
/// A [BTreeMap] is used so core concepts iterate in a canonical order, which keeps blocking digests and signatures deterministic.
pub struct Node {
    /// The parent of the node, absent for roots.
    pub parent: Option<NodeId>,

    /// The role on the tree edge from the parent, if any.
    pub parent_role: Option<Role>,

    /// Depth of the node in its tree --- roots are at 0.
    pub depth: u32,

    /// The kind of the node.
    pub kind: NodeKind,

    /// The node was merged into another node.
    pub merged: bool,

    /// The node was pruned.
    pub pruned: bool,

    /// The node was destroyed --- its id is dead and skipped by traversal.
    pub destroyed: bool,

    /// The current block status.
    pub block: BlockStatus,

    /// A count of existential obligations not yet processed by the expansion driver.
    pub unprocessed_existentials: usize,

    /// The label: asserted concepts, each mapped to its core flag.
    pub(crate) label: BTreeMap<Concept, bool>,

    /// Validator-private memo: the current block assignment has been checked.
    pub(crate) validation_checked: bool,

    /// Validator-private memo: the checked assignment violated some condition.
    pub(crate) validation_violated: bool,
}

impl Node {
    pub(crate) fn new(
        parent: Option<NodeId>,
        parent_role: Option<Role>,
        depth: u32,
        kind: NodeKind,
    ) -> Self {
        Node {
            parent,
            parent_role,
            depth,
            kind,
            merged: false,
            pruned: false,
            destroyed: false,
            block: BlockStatus::Unblocked,
            unprocessed_existentials: 0,
            label: BTreeMap::new(),
            validation_checked: false,
            validation_violated: false,
        }
    }

    /// Whether the node is active --- neither merged, pruned, nor destroyed.
    pub fn is_active(&self) -> bool {
        !self.merged && !self.pruned && !self.destroyed
    }

    /// Whether the concept is in the label.
    pub fn has_concept(&self, concept: Concept) -> bool {
        self.label.contains_key(&concept)
    }

    /// Whether the concept is in the label, flagged core.
    pub fn has_core_concept(&self, concept: Concept) -> bool {
        self.label.get(&concept).copied().unwrap_or(false)
    }

    /// The concepts of the label, in canonical order.
    pub fn concepts(&self) -> impl Iterator<Item = Concept> + '_ {
        self.label.keys().copied()
    }

    /// The core concepts of the label, in canonical order.
    pub fn core_concepts(&self) -> impl Iterator<Item = Concept> + '_ {
        self.label
            .iter()
            .filter_map(|(concept, core)| core.then_some(*concept))
    }
}
