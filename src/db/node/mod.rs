/*!
A database of node related things, accessed via fields on a [NodeDB] struct.

The database owns the arena of [Node]s, addressed by [NodeId], together with the non-tree role edges of the model graph.
Ids are assigned in creation order and never reused while the node exists: a destroyed node keeps its slot, flagged, and is skipped by traversal.

The external expansion driver mutates nodes through the [context](crate::context), which forwards every mutation to the blocking strategy.
Mutating the database directly without notification desynchronizes the cache and validator state --- there is no snapshot or rollback.
*/

use std::collections::{BTreeSet, btree_map};

use crate::{
    misc::log::targets::{self},
    structures::{
        concept::{Concept, Role},
        node::{NODE_MAX, Node, NodeId, NodeKind},
    },
    types::err::{self},
};

/// The node database.
pub struct NodeDB {
    /// The nodes, in creation order.
    nodes: Vec<Node>,

    /// Role assertions which are not tree edges, as (role, from, to) triples.
    role_assertions: BTreeSet<(Role, NodeId, NodeId)>,
}

impl Default for NodeDB {
    fn default() -> Self {
        NodeDB {
            nodes: Vec::default(),
            role_assertions: BTreeSet::default(),
        }
    }
}

impl NodeDB {
    /// A count of node ids issued, destroyed nodes included.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// A fresh node --- on Ok the node is part of the model graph, with the next id in creation order.
    pub fn fresh_node(
        &mut self,
        parent: Option<NodeId>,
        parent_role: Option<Role>,
        kind: NodeKind,
    ) -> Result<NodeId, err::NodeDBError> {
        let id = match self.nodes.len().try_into() {
            Ok(id) if id < NODE_MAX => id,
            _ => return Err(err::NodeDBError::NodesExhausted),
        };

        let depth = match parent {
            None => 0,
            Some(parent) => match self.nodes.get(parent as usize) {
                None => return Err(err::NodeDBError::MissingParent),
                Some(parent_node) => parent_node.depth + 1,
            },
        };

        self.nodes.push(Node::new(parent, parent_role, depth, kind));
        log::trace!(target: targets::NODE_DB, "Fresh node {id} at depth {depth}");
        Ok(id)
    }

    /// The node with the given id.
    ///
    /// # Panics
    /// If the id was never issued.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// The node with the given id, mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    /// The first node in creation order, if any node exists.
    pub fn first_node(&self) -> Option<NodeId> {
        self.ids_from(0).next()
    }

    /// Node ids from `start` (inclusive) in creation order, skipping destroyed nodes.
    pub fn ids_from(&self, start: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        (start..self.nodes.len() as NodeId).filter(|id| !self.nodes[*id as usize].destroyed)
    }

    /// Whether `ancestor` lies on the parent path of `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Add `concept` to the label of `node` with the given core flag.
    /// Returns false if the concept was already present, leaving the existing core flag untouched.
    /// Core upgrades of an existing assertion go through [set_concept_core](Self::set_concept_core), which reports them.
    pub fn add_concept(&mut self, node: NodeId, concept: Concept, core: bool) -> bool {
        match self.node_mut(node).label.entry(concept) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(core);
                true
            }
        }
    }

    /// Remove `concept` from the label of `node`.
    /// Returns false if the concept was not present.
    pub fn remove_concept(&mut self, node: NodeId, concept: Concept) -> bool {
        self.node_mut(node).label.remove(&concept).is_some()
    }

    /// Flag an asserted concept as core.
    /// Returns false if the concept was not present or already core.
    pub fn set_concept_core(&mut self, node: NodeId, concept: Concept) -> bool {
        match self.node_mut(node).label.get_mut(&concept) {
            Some(core) if !*core => {
                *core = true;
                true
            }
            _ => false,
        }
    }

    /// Record a role assertion from `from` to `to`.
    /// Tree edges are recorded on the child node, not here.
    pub fn add_role_assertion(&mut self, role: Role, from: NodeId, to: NodeId) -> bool {
        self.role_assertions.insert((role, from, to))
    }

    /// Retract a role assertion.
    pub fn remove_role_assertion(&mut self, role: Role, from: NodeId, to: NodeId) -> bool {
        self.role_assertions.remove(&(role, from, to))
    }

    /// Whether a role edge runs from `from` to `to`, as a tree edge or an assertion.
    pub fn has_role_edge(&self, role: Role, from: NodeId, to: NodeId) -> bool {
        if self.role_assertions.contains(&(role, from, to)) {
            return true;
        }
        let to_node = self.node(to);
        to_node.parent == Some(from) && to_node.parent_role == Some(role)
    }

    /// Flag `node` as destroyed.
    ///
    /// The id is dead from here on: traversal skips it, and the strategy must have been notified so the cache and watermarks forget it.
    pub fn destroy(&mut self, node: NodeId) {
        let entry = self.node_mut(node);
        entry.destroyed = true;
        entry.label.clear();
        log::trace!(target: targets::NODE_DB, "Node {node} destroyed");
    }
}
