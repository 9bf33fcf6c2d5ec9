/*!
Core-variable computation for compiled clauses.

When a clause fires, the derived concepts are flagged core or non-core per bound variable.
Only core concepts feed the blocking digest, so the fewer variables kept core, the coarser the digest and the earlier blocks are found.
The validator compensates for the imprecision, so dropping a variable from the core is a heuristic, never a soundness concern.
*/

use crate::{
    config::Config,
    db::node::NodeDB,
    structures::{
        clause::{Clause, ClauseKind},
        node::{NodeId, NodeKind},
    },
};

/// Which bound variables of a fired clause should derive *core* concepts.
///
/// One flag per binding, parallel to `bindings`.
///
/// With the singleton core nothing beyond the initial label is ever core.
/// Otherwise everything is core except, for a plain concept inclusion with at most two head alternatives, the deepest-bound tree node, provided no other bound non-root node sits below it.
/// Concepts derived at such a node describe only the node itself, so they cannot distinguish it from a blocker candidate any better than its parent's core already does.
pub fn core_variables(
    config: &Config,
    clause: &Clause,
    nodes: &NodeDB,
    bindings: &[NodeId],
) -> Vec<bool> {
    if config.singleton_core || bindings.is_empty() {
        return vec![false; bindings.len()];
    }

    if clause.kind != ClauseKind::ConceptInclusion {
        return vec![false; bindings.len()];
    }

    if clause.alternatives.len() > 2 {
        let mut core = vec![false; bindings.len()];
        core[0] = true;
        return core;
    }

    if clause.alternatives.is_empty() || clause.head_centred {
        return vec![false; bindings.len()];
    }

    let mut core = vec![true; bindings.len()];

    // The deepest-bound tree node, ties resolved to the first binding.
    let mut deepest: Option<(usize, NodeId)> = None;
    for (position, &node) in bindings.iter().enumerate() {
        if nodes.node(node).kind == NodeKind::Tree {
            let better = match deepest {
                None => true,
                Some((_, incumbent)) => nodes.node(node).depth > nodes.node(incumbent).depth,
            };
            if better {
                deepest = Some((position, node));
            }
        }
    }

    if let Some((position, node)) = deepest {
        let has_bound_descendant = bindings.iter().any(|&other| {
            other != node
                && nodes.node(other).kind != NodeKind::Root
                && nodes.is_ancestor_of(node, other)
        });
        if !has_bound_descendant {
            core[position] = false;
        }
    }

    core
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{
        clause::{HeadAlternative, PatternConcept},
        concept::Concept,
    };

    fn inclusion(alternative_count: usize) -> Clause {
        let alternatives = (0..alternative_count)
            .map(|atom| HeadAlternative {
                conditions: vec![PatternConcept::Concept(Concept::Atomic(atom as u32))],
            })
            .collect();
        Clause {
            kind: ClauseKind::ConceptInclusion,
            premise: vec![0],
            alternatives,
            head_centred: false,
        }
    }

    fn chain(nodes: &mut NodeDB, length: usize) -> Vec<NodeId> {
        let root = nodes.fresh_node(None, None, NodeKind::Root).unwrap();
        let mut ids = vec![root];
        for _ in 1..length {
            let parent = *ids.last().unwrap();
            ids.push(nodes.fresh_node(Some(parent), Some(0), NodeKind::Tree).unwrap());
        }
        ids
    }

    #[test]
    fn singleton_core_keeps_nothing() {
        let config = Config {
            singleton_core: true,
            ..Config::default()
        };
        let mut nodes = NodeDB::default();
        let ids = chain(&mut nodes, 3);
        assert_eq!(
            core_variables(&config, &inclusion(1), &nodes, &ids),
            vec![false; 3]
        );
    }

    #[test]
    fn deepest_leaf_is_non_core() {
        let config = Config::default();
        let mut nodes = NodeDB::default();
        let ids = chain(&mut nodes, 3);
        assert_eq!(
            core_variables(&config, &inclusion(2), &nodes, &ids),
            vec![true, true, false]
        );
    }

    #[test]
    fn deepest_with_bound_descendant_stays_core() {
        let config = Config::default();
        let mut nodes = NodeDB::default();
        let ids = chain(&mut nodes, 2);
        let graph = nodes
            .fresh_node(Some(ids[1]), Some(0), NodeKind::Graph)
            .unwrap();
        // The deepest tree node has a bound graph node beneath it.
        let bindings = vec![ids[0], ids[1], graph];
        assert_eq!(
            core_variables(&config, &inclusion(2), &nodes, &bindings),
            vec![true, true, true]
        );
    }

    #[test]
    fn wide_heads_keep_only_the_centre() {
        let config = Config::default();
        let mut nodes = NodeDB::default();
        let ids = chain(&mut nodes, 2);
        assert_eq!(
            core_variables(&config, &inclusion(3), &nodes, &ids),
            vec![true, false]
        );
    }
}
