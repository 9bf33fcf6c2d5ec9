/*!
The direct blocking oracle: who may block, who may be blocked, and what the blocking-relevant label is.

A [DirectBlockingChecker] answers the *syntactic* side of blocking:
a digest of a node's blocking-relevant label, a pairwise compatibility predicate over digest-equal nodes, and two per-node dirty flags.

- `blocking_info_changed` --- the blocking-relevant label changed since the last pre-blocking pass over the node.
- `changed_since_validation` --- anything validation-relevant changed since the last full validation pass.

The checker keeps its per-node flags in vectors parallel to the node database, grown through [node_initialized](DirectBlockingChecker::node_initialized).

[CoreBlockingChecker] is the concrete checker for anywhere validated blocking: two nodes are compatible when their core labels are equal.
*/

use crate::{
    db::node::NodeDB,
    structures::{
        concept::Concept,
        node::{NodeId, NodeKind},
    },
};

/// The oracle consulted for the syntactic side of blocking.
pub trait DirectBlockingChecker {
    /// Forget all per-node state.
    fn clear(&mut self);

    /// Grow per-node state for a freshly created node.
    fn node_initialized(&mut self, node: NodeId);

    /// Drop per-node state for a destroyed node.
    fn node_destroyed(&mut self, node: NodeId);

    /// Whether `node` is eligible to be blocked.
    fn can_be_blocked(&self, nodes: &NodeDB, node: NodeId) -> bool;

    /// Whether `node` is eligible to block others.
    fn can_be_blocker(&self, nodes: &NodeDB, node: NodeId) -> bool;

    /// A digest of the blocking-relevant label of `node`.
    ///
    /// Digest equality is necessary, not sufficient: candidates are confirmed through [is_blocked_by](Self::is_blocked_by).
    fn blocking_digest(&self, nodes: &NodeDB, node: NodeId) -> u32;

    /// Whether `blocked` may be blocked by `blocker`.
    ///
    /// Not necessarily symmetric.
    fn is_blocked_by(&self, nodes: &NodeDB, blocker: NodeId, blocked: NodeId) -> bool;

    /// Whether anything validation-relevant changed at `node` since the last full validation.
    ///
    /// None stands for the absent parent of a root, which never changes.
    fn has_changed_since_validation(&self, node: Option<NodeId>) -> bool;

    /// Set or clear the validation dirty flag of `node`.
    fn set_changed_since_validation(&mut self, node: NodeId, changed: bool);

    /// Whether the blocking-relevant label of `node` changed since the last pre-blocking pass over it.
    fn has_blocking_info_changed(&self, node: NodeId) -> bool;

    /// Clear the pre-blocking dirty flag of `node`.
    fn clear_blocking_info_changed(&mut self, node: NodeId);

    /// Note a concept assertion added to or removed from `node`.
    /// Returns true if the change can affect the blocking digest.
    fn concept_assertion_changed(&mut self, node: NodeId, concept: Concept, core: bool) -> bool;

    /// Note a role assertion added or removed between `from` and `to`.
    /// Returns true if the change can affect a blocking digest.
    fn role_assertion_changed(&mut self, from: NodeId, to: NodeId, core: bool) -> bool;

    /// The canonical blocking signature of `node`, for the signature cache.
    fn signature(&self, nodes: &NodeDB, node: NodeId) -> Box<[Concept]>;
}

/// The checker for anywhere validated blocking: compatibility is equality of core labels.
#[derive(Default)]
pub struct CoreBlockingChecker {
    /// Validation dirty flags, indexed by node.
    changed_since_validation: Vec<bool>,

    /// Pre-blocking dirty flags, indexed by node.
    blocking_info_changed: Vec<bool>,
}

impl CoreBlockingChecker {
    fn blockable(nodes: &NodeDB, node: NodeId) -> bool {
        let node = nodes.node(node);
        node.kind == NodeKind::Tree && node.parent.is_some()
    }
}

impl DirectBlockingChecker for CoreBlockingChecker {
    fn clear(&mut self) {
        self.changed_since_validation.clear();
        self.blocking_info_changed.clear();
    }

    fn node_initialized(&mut self, node: NodeId) {
        let required = node as usize + 1;
        if self.changed_since_validation.len() < required {
            self.changed_since_validation.resize(required, false);
            self.blocking_info_changed.resize(required, false);
        }
        self.changed_since_validation[node as usize] = true;
        self.blocking_info_changed[node as usize] = true;
    }

    fn node_destroyed(&mut self, node: NodeId) {
        self.changed_since_validation[node as usize] = false;
        self.blocking_info_changed[node as usize] = false;
    }

    fn can_be_blocked(&self, nodes: &NodeDB, node: NodeId) -> bool {
        Self::blockable(nodes, node)
    }

    fn can_be_blocker(&self, nodes: &NodeDB, node: NodeId) -> bool {
        Self::blockable(nodes, node)
    }

    fn blocking_digest(&self, nodes: &NodeDB, node: NodeId) -> u32 {
        // FNV-style fold over the core label, deterministic across runs.
        let mut digest: u32 = 0x811C_9DC5;
        for concept in nodes.node(node).core_concepts() {
            digest = digest.wrapping_mul(0x0100_0193) ^ concept.digest();
        }
        digest
    }

    fn is_blocked_by(&self, nodes: &NodeDB, blocker: NodeId, blocked: NodeId) -> bool {
        nodes
            .node(blocker)
            .core_concepts()
            .eq(nodes.node(blocked).core_concepts())
    }

    fn has_changed_since_validation(&self, node: Option<NodeId>) -> bool {
        match node {
            None => false,
            Some(node) => self.changed_since_validation[node as usize],
        }
    }

    fn set_changed_since_validation(&mut self, node: NodeId, changed: bool) {
        self.changed_since_validation[node as usize] = changed;
    }

    fn has_blocking_info_changed(&self, node: NodeId) -> bool {
        self.blocking_info_changed[node as usize]
    }

    fn clear_blocking_info_changed(&mut self, node: NodeId) {
        self.blocking_info_changed[node as usize] = false;
    }

    fn concept_assertion_changed(&mut self, node: NodeId, _concept: Concept, core: bool) -> bool {
        if core {
            self.blocking_info_changed[node as usize] = true;
        }
        // Concept assertions always count as digest-relevant for the changed watermark.
        true
    }

    fn role_assertion_changed(&mut self, from: NodeId, to: NodeId, core: bool) -> bool {
        if core {
            self.blocking_info_changed[from as usize] = true;
            self.blocking_info_changed[to as usize] = true;
        }
        core
    }

    fn signature(&self, nodes: &NodeDB, node: NodeId) -> Box<[Concept]> {
        nodes.node(node).core_concepts().collect()
    }
}
