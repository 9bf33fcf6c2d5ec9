use tableau_core::{
    config::Config,
    context::Context,
    structures::{
        concept::Concept,
        node::{BlockStatus, NodeId, NodeKind},
    },
};

/// A chain of `length` tree nodes below `parent`, each with the core concept `atom` and a pending existential.
fn blockable_chain(ctx: &mut Context, parent: NodeId, length: usize, atom: u32) -> Vec<NodeId> {
    let mut parent = parent;
    let mut chain = vec![];
    for _ in 0..length {
        let node = ctx
            .fresh_node(Some(parent), Some(0), NodeKind::Tree)
            .unwrap();
        ctx.add_concept(node, Concept::Atomic(atom), true);
        ctx.add_concept(
            node,
            Concept::AtLeast {
                count: 1,
                role: 0,
                filler: atom,
            },
            false,
        );
        chain.push(node);
        parent = node;
    }
    chain
}

mod pre_blocking {
    use super::*;

    #[test]
    fn the_oldest_copy_blocks() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 3, 7);

        ctx.compute_blocking(false).unwrap();

        assert!(!ctx.is_blocked(chain[0]));
        assert_eq!(ctx.block_status(chain[1]), BlockStatus::Directly(chain[0]));
        assert_eq!(ctx.block_status(chain[2]), BlockStatus::Indirectly(chain[1]));
    }

    #[test]
    fn roots_are_never_blocked() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        ctx.add_concept(root, Concept::Atomic(7), true);
        let other = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        ctx.add_concept(other, Concept::Atomic(7), true);

        ctx.compute_blocking(false).unwrap();

        assert!(!ctx.is_blocked(root));
        assert!(!ctx.is_blocked(other));
    }

    #[test]
    fn passes_are_incremental() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 3, 7);

        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.counters.pre_blocking_passes, 1);

        // Nothing changed, so nothing to do.
        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.counters.pre_blocking_passes, 1);

        ctx.add_concept(chain[0], Concept::Atomic(9), false);
        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.counters.pre_blocking_passes, 2);
    }

    #[test]
    fn a_label_change_unblocks() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 3, 7);

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        // A fresh core concept changes the digest of the blocked node.
        ctx.add_concept(chain[1], Concept::Atomic(9), true);
        ctx.compute_blocking(false).unwrap();

        assert!(!ctx.is_blocked(chain[1]));
        // The grandchild still matches the head of the chain.
        assert_eq!(ctx.block_status(chain[2]), BlockStatus::Directly(chain[0]));
    }

    #[test]
    fn the_watermark_tracks_the_smallest_touched_node() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 3, 7);
        assert_eq!(ctx.blocking.first_changed(), Some(root));

        // A pass settles everything it saw.
        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.blocking.first_changed(), None);

        ctx.add_concept(chain[2], Concept::Atomic(9), false);
        assert_eq!(ctx.blocking.first_changed(), Some(chain[2]));

        // The watermark only ever moves down the creation order.
        ctx.add_concept(chain[0], Concept::Atomic(9), false);
        assert_eq!(ctx.blocking.first_changed(), Some(chain[0]));
        ctx.add_concept(chain[1], Concept::Atomic(8), false);
        assert_eq!(ctx.blocking.first_changed(), Some(chain[0]));

        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.blocking.first_changed(), None);
    }

    #[test]
    fn a_reasserted_concept_upgraded_to_core_unblocks() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 2, 7);
        ctx.add_concept(chain[0], Concept::Atomic(9), false);

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        // Re-asserting the concept with the core flag set changes the blocker's digest.
        ctx.add_concept(chain[0], Concept::Atomic(9), true);
        assert!(ctx.node_db.node(chain[0]).has_core_concept(Concept::Atomic(9)));

        ctx.compute_blocking(false).unwrap();
        assert!(!ctx.is_blocked(chain[1]));
    }

    #[test]
    fn a_reassertion_never_downgrades_a_core_concept() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 2, 7);

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        ctx.add_concept(chain[0], Concept::Atomic(7), false);
        assert!(ctx.node_db.node(chain[0]).has_core_concept(Concept::Atomic(7)));

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));
    }

    #[test]
    fn a_destroyed_blocker_is_forgotten() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let left = blockable_chain(&mut ctx, root, 1, 7);
        let right = blockable_chain(&mut ctx, root, 1, 7);

        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.block_status(right[0]), BlockStatus::Directly(left[0]));

        // Destruction runs from the top of the creation order.
        ctx.destroy_node(right[0]).unwrap();
        ctx.destroy_node(left[0]).unwrap();
        ctx.compute_blocking(false).unwrap();

        let fresh = blockable_chain(&mut ctx, root, 1, 7);
        ctx.compute_blocking(false).unwrap();
        assert!(!ctx.is_blocked(fresh[0]));
    }

    #[test]
    fn merged_nodes_stop_blocking() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let left = blockable_chain(&mut ctx, root, 1, 7);
        let right = blockable_chain(&mut ctx, root, 1, 7);

        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.block_status(right[0]), BlockStatus::Directly(left[0]));

        ctx.mark_merged(left[0], root);
        ctx.compute_blocking(false).unwrap();

        assert!(!ctx.is_blocked(right[0]));
        assert!(ctx.sanity_check().is_ok());
    }
}

mod validation {
    use super::*;
    use tableau_core::structures::clause::{Clause, HeadAlternative, PatternConcept};

    /// Every node with concept 7 must have a parent with concept 5.
    fn parent_condition() -> Vec<Clause> {
        vec![Clause::uncentred(
            vec![7],
            vec![HeadAlternative {
                conditions: vec![PatternConcept::ParentConcept(5)],
            }],
        )]
    }

    #[test]
    fn an_unjustified_block_is_dissolved() {
        let mut ctx = Context::from_config(Config::default(), parent_condition());
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 2, 7);

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        // The blocked node's parent lacks concept 5, so unravelling would not satisfy the clause.
        ctx.compute_blocking(true).unwrap();
        assert_eq!(ctx.counters.invalid_blocks, 1);
        assert!(!ctx.is_blocked(chain[1]));

        // Nothing changed since, so the follow-up pre-blocking pass does not re-try the refuted candidate.
        ctx.compute_blocking(false).unwrap();
        assert!(!ctx.is_blocked(chain[1]));
    }

    #[test]
    fn a_justified_block_survives() {
        let mut ctx = Context::from_config(Config::default(), parent_condition());
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 2, 7);
        for node in &chain {
            ctx.add_concept(*node, Concept::Atomic(5), false);
        }

        ctx.compute_blocking(false).unwrap();
        assert_eq!(ctx.block_status(chain[1]), BlockStatus::Directly(chain[0]));

        ctx.compute_blocking(true).unwrap();
        assert_eq!(ctx.counters.invalid_blocks, 0);
        assert_eq!(ctx.block_status(chain[1]), BlockStatus::Directly(chain[0]));
    }

    #[test]
    fn validation_is_idempotent() {
        let mut ctx = Context::from_config(Config::default(), parent_condition());
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let chain = blockable_chain(&mut ctx, root, 4, 7);
        for node in &chain {
            ctx.add_concept(*node, Concept::Atomic(5), false);
        }

        ctx.compute_blocking(false).unwrap();
        ctx.compute_blocking(true).unwrap();
        let statuses: Vec<_> = chain.iter().map(|node| ctx.block_status(*node)).collect();

        ctx.compute_blocking(true).unwrap();
        let again: Vec<_> = chain.iter().map(|node| ctx.block_status(*node)).collect();
        assert_eq!(statuses, again);
    }

    #[test]
    fn callbacks_bracket_validation() {
        use std::{cell::RefCell, rc::Rc};

        let mut ctx = Context::from_config(Config::default(), vec![]);
        let trace = Rc::new(RefCell::new(vec![]));

        let started = trace.clone();
        ctx.set_callback_validation_started(Box::new(move || started.borrow_mut().push("started")));
        let finished = trace.clone();
        ctx.set_callback_validation_finished(Box::new(move || {
            finished.borrow_mut().push("finished")
        }));

        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let _chain = blockable_chain(&mut ctx, root, 2, 7);

        ctx.compute_blocking(false).unwrap();
        assert!(trace.borrow().is_empty());

        ctx.compute_blocking(true).unwrap();
        assert_eq!(*trace.borrow(), vec!["started", "finished"]);
    }
}

mod signatures {
    use super::*;

    #[test]
    fn proven_signatures_block_across_branches() {
        let config = Config {
            use_signature_cache: true,
            ..Config::default()
        };
        let mut ctx = Context::from_config(config, vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let _chain = blockable_chain(&mut ctx, root, 2, 7);

        ctx.compute_blocking(false).unwrap();
        ctx.compute_blocking(true).unwrap();
        ctx.model_found();

        // A sibling branch: per-branch state is gone, proven signatures are not.
        ctx.clear();
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let fresh = blockable_chain(&mut ctx, root, 1, 7);
        ctx.compute_blocking(false).unwrap();

        assert_eq!(ctx.block_status(fresh[0]), BlockStatus::Signature);
    }

    #[test]
    fn without_the_cache_nothing_persists() {
        let mut ctx = Context::from_config(Config::default(), vec![]);
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let _chain = blockable_chain(&mut ctx, root, 2, 7);

        ctx.compute_blocking(false).unwrap();
        ctx.compute_blocking(true).unwrap();
        ctx.model_found();

        ctx.clear();
        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let fresh = blockable_chain(&mut ctx, root, 1, 7);
        ctx.compute_blocking(false).unwrap();

        assert!(!ctx.is_blocked(fresh[0]));
    }
}
