/*!
The blocker equivalence cache: currently active, unblocked, blockable nodes grouped by blocking signature.

Each entry of the underlying [ChainedTable] holds one equivalence class: an id-ordered sequence of nodes sharing a digest, each compatible with the class's representative (its first member).
Grouping by pairwise compatibility rather than a total equivalence mirrors that blocking is a per-pair decidable relation; keeping classes id-ordered lets every consumer prefer the oldest valid blocker, which the termination argument requires.

Each node's current entry is recorded in a cargo vector parallel to the node database.
Changes to a node can change its digest, so a node can never be located by *recomputing* its digest --- removal must go through the recorded entry, in O(1).

Contract breaches (double add, unknown entry, id-order violation, a node among its own candidates) are returned as [BlockersCacheError]s and must never be masked: they mean notifications were missed or reordered, and later blocking decisions would silently corrupt.
*/

use crate::{
    blocking::checker::DirectBlockingChecker,
    config::BlockersCacheConfig,
    db::node::NodeDB,
    generic::chained::{ChainedTable, EntryKey},
    misc::log::targets::{self},
    structures::node::NodeId,
    types::err::{self},
};

/// The blocker equivalence cache.
pub struct BlockersCache {
    /// Equivalence classes in a chained table, keyed by blocking digest.
    table: ChainedTable<Vec<NodeId>>,

    /// For each node, the entry currently holding it.
    cargo: Vec<Option<EntryKey>>,
}

impl BlockersCache {
    /// A fresh cache with local configuration options derived from `config`.
    pub fn new(config: &BlockersCacheConfig) -> Self {
        BlockersCache {
            table: ChainedTable::new(config.initial_buckets, config.load_factor_percent),
            cargo: Vec::default(),
        }
    }

    /// A count of equivalence classes.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the cache holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether `node` is currently a member of some equivalence class.
    pub fn contains(&self, node: NodeId) -> bool {
        self.cargo
            .get(node as usize)
            .is_some_and(|slot| slot.is_some())
    }

    /// Drop every equivalence class, keeping cargo and entry capacity.
    pub fn clear(&mut self) {
        self.table.clear();
        self.cargo.iter_mut().for_each(|slot| *slot = None);
    }

    /// Grow the cargo vector for a freshly created node.
    pub fn node_initialized(&mut self, node: NodeId) {
        let required = node as usize + 1;
        if self.cargo.len() < required {
            self.cargo.resize(required, None);
        }
    }

    /// Add `node` to the equivalence class matching its digest, or seed a fresh class with it as representative.
    ///
    /// The node must not already be a member of any class.
    pub fn add(
        &mut self,
        checker: &impl DirectBlockingChecker,
        nodes: &NodeDB,
        node: NodeId,
    ) -> Result<(), err::BlockersCacheError> {
        let digest = checker.blocking_digest(nodes, node);

        match self
            .table
            .find(digest, |members| checker.is_blocked_by(nodes, members[0], node))
        {
            Some(key) => {
                let members = self.table.get_mut(key);
                if members.contains(&node) {
                    return Err(err::BlockersCacheError::AlreadyPresent(node));
                }
                // Members are appended in strictly increasing id order.
                if members.last().is_some_and(|last| *last >= node) {
                    return Err(err::BlockersCacheError::OrderViolation(node));
                }
                members.push(node);
                self.cargo[node as usize] = Some(key);
            }
            None => {
                let key = self.table.insert(digest, vec![node]);
                self.cargo[node as usize] = Some(key);
            }
        }
        log::trace!(target: targets::CACHE, "Node {node} cached with digest {digest:#x}");
        Ok(())
    }

    /// Remove `node` from its equivalence class, if it is in one.
    ///
    /// A representative takes its whole class with it --- the entry is detached and recycled.
    /// A non-representative member truncates the class from its position onward: membership respects id order, and a removal invalidates everything appended later.
    ///
    /// Returns whether the node was a member.
    pub fn remove(&mut self, node: NodeId) -> Result<bool, err::BlockersCacheError> {
        let Some(key) = self.cargo.get(node as usize).copied().flatten() else {
            return Ok(false);
        };

        let members = self.table.get(key);
        let Some(position) = members.iter().position(|member| *member == node) else {
            return Err(err::BlockersCacheError::MissingEntry(node));
        };

        if position == 0 {
            let Some(members) = self.table.unlink(key) else {
                return Err(err::BlockersCacheError::CorruptChain);
            };
            for member in members {
                self.cargo[member as usize] = None;
            }
        } else {
            let members = self.table.get_mut(key);
            let dropped = members.split_off(position);
            for member in dropped {
                self.cargo[member as usize] = None;
            }
        }
        log::trace!(target: targets::CACHE, "Node {node} dropped from the cache");
        Ok(true)
    }

    /// The candidate blockers of `node`: the members of its matching equivalence class, in id order.
    ///
    /// Empty if the node is not blockable or no class matches.
    /// The node must not itself be a current member of the matching class.
    pub fn possible_blockers(
        &self,
        checker: &impl DirectBlockingChecker,
        nodes: &NodeDB,
        node: NodeId,
    ) -> Result<Vec<NodeId>, err::BlockersCacheError> {
        if !checker.can_be_blocked(nodes, node) {
            return Ok(Vec::default());
        }
        let digest = checker.blocking_digest(nodes, node);
        match self
            .table
            .find(digest, |members| checker.is_blocked_by(nodes, members[0], node))
        {
            None => Ok(Vec::default()),
            Some(key) => {
                let members = self.table.get(key);
                if members.contains(&node) {
                    return Err(err::BlockersCacheError::SelfCandidate(node));
                }
                Ok(members.clone())
            }
        }
    }

    /// Assert every member is active, unblocked, unmerged, and unpruned.
    ///
    /// For internal consistency testing only --- never production control flow.
    pub fn sanity_check(&self, nodes: &NodeDB) -> Result<(), err::BlockersCacheError> {
        for members in self.table.values() {
            for member in members {
                let node = nodes.node(*member);
                if !node.is_active() || node.block.is_blocked() || node.merged || node.pruned {
                    return Err(err::BlockersCacheError::UnsoundMember(*member));
                }
            }
        }
        Ok(())
    }
}
