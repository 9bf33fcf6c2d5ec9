use tableau_core::{
    config::{Config, ValidatorVariant},
    context::Context,
    structures::{
        clause::{Clause, HeadAlternative, PatternConcept},
        concept::Concept,
        node::{NodeId, NodeKind},
    },
};

use rand::{Rng, SeedableRng, rngs::StdRng};

/// A small clause set over atoms 0..4, mixing parent and self conditions.
fn clause_set() -> Vec<Clause> {
    let mut clauses = vec![];
    for atom in 0..4u32 {
        clauses.push(Clause::uncentred(
            vec![atom],
            vec![
                HeadAlternative {
                    conditions: vec![PatternConcept::ParentConcept((atom + 1) % 4)],
                },
                HeadAlternative {
                    conditions: vec![PatternConcept::Concept(Concept::Atomic((atom + 2) % 4))],
                },
            ],
        ));
    }
    clauses.push(Clause::uncentred(
        vec![0, 1],
        vec![HeadAlternative {
            conditions: vec![PatternConcept::ParentRole(0)],
        }],
    ));
    clauses
}

/// Grow a random tree under a fresh root, with labels drawn from atoms 0..4.
///
/// The rng drives every choice, so two contexts fed the same seed see identical mutations.
fn grow_random_model(ctx: &mut Context, rng: &mut StdRng, size: usize) -> Vec<NodeId> {
    let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
    let mut nodes = vec![root];

    for _ in 0..size {
        let parent = nodes[rng.gen_range(0..nodes.len())];
        let role = rng.gen_range(0..2u32);
        let node = ctx
            .fresh_node(Some(parent), Some(role), NodeKind::Tree)
            .unwrap();

        for _ in 0..rng.gen_range(1..=3) {
            let atom = rng.gen_range(0..4u32);
            ctx.add_concept(node, Concept::Atomic(atom), rng.gen_bool(0.7));
        }
        if rng.gen_bool(0.8) {
            ctx.add_concept(
                node,
                Concept::AtLeast {
                    count: 1,
                    role,
                    filler: rng.gen_range(0..4u32),
                },
                false,
            );
        }
        nodes.push(node);
    }
    nodes
}

mod agreement {
    use super::*;

    /// Both validator variants must assign identical block statuses to identical models.
    #[test]
    fn variants_agree_on_random_models() {
        for seed in 0..16u64 {
            let constraints = Config {
                validator: ValidatorVariant::Constraints,
                ..Config::default()
            };
            let rules = Config {
                validator: ValidatorVariant::Rules,
                ..Config::default()
            };

            let mut ctx_constraints = Context::from_config(constraints, clause_set());
            let mut ctx_rules = Context::from_config(rules, clause_set());

            let mut rng = StdRng::seed_from_u64(seed);
            let nodes = grow_random_model(&mut ctx_constraints, &mut rng, 30);
            let mut rng = StdRng::seed_from_u64(seed);
            let same_nodes = grow_random_model(&mut ctx_rules, &mut rng, 30);
            assert_eq!(nodes, same_nodes);

            ctx_constraints.compute_blocking(false).unwrap();
            ctx_rules.compute_blocking(false).unwrap();
            ctx_constraints.compute_blocking(true).unwrap();
            ctx_rules.compute_blocking(true).unwrap();

            for node in &nodes {
                assert_eq!(
                    ctx_constraints.block_status(*node),
                    ctx_rules.block_status(*node),
                    "divergence at node {node} with seed {seed}",
                );
            }
            assert_eq!(
                ctx_constraints.counters.invalid_blocks,
                ctx_rules.counters.invalid_blocks
            );
        }
    }

    /// Agreement must also hold after incremental mutation between passes.
    #[test]
    fn variants_agree_after_mutation() {
        let constraints = Config {
            validator: ValidatorVariant::Constraints,
            ..Config::default()
        };
        let rules = Config {
            validator: ValidatorVariant::Rules,
            ..Config::default()
        };

        let mut ctx_constraints = Context::from_config(constraints, clause_set());
        let mut ctx_rules = Context::from_config(rules, clause_set());

        let mut rng = StdRng::seed_from_u64(99);
        let nodes = grow_random_model(&mut ctx_constraints, &mut rng, 20);
        let mut rng = StdRng::seed_from_u64(99);
        grow_random_model(&mut ctx_rules, &mut rng, 20);

        ctx_constraints.compute_blocking(true).unwrap();
        ctx_rules.compute_blocking(true).unwrap();

        let mut rng = StdRng::seed_from_u64(100);
        for _ in 0..10 {
            let node = nodes[rng.gen_range(1..nodes.len())];
            let atom = rng.gen_range(0..4u32);
            let core = rng.gen_bool(0.5);
            ctx_constraints.add_concept(node, Concept::Atomic(atom), core);
            ctx_rules.add_concept(node, Concept::Atomic(atom), core);
        }

        ctx_constraints.compute_blocking(false).unwrap();
        ctx_rules.compute_blocking(false).unwrap();
        ctx_constraints.compute_blocking(true).unwrap();
        ctx_rules.compute_blocking(true).unwrap();

        for node in &nodes {
            assert_eq!(
                ctx_constraints.block_status(*node),
                ctx_rules.block_status(*node),
            );
        }
    }
}

mod configuration {
    use super::*;

    /// With the singleton core only core concepts may witness a premise.
    #[test]
    fn singleton_core_narrows_premise_matching() {
        let clause = vec![Clause::uncentred(
            vec![7],
            vec![HeadAlternative {
                conditions: vec![PatternConcept::ParentConcept(5)],
            }],
        )];
        let config = Config {
            singleton_core: true,
            ..Config::default()
        };
        let mut ctx = Context::from_config(config, clause);

        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let mut parent = root;
        let mut chain = vec![];
        for _ in 0..2 {
            let node = ctx
                .fresh_node(Some(parent), Some(0), NodeKind::Tree)
                .unwrap();
            // Concept 7 is not core, so the clause's premise never fires during validation.
            ctx.add_concept(node, Concept::Atomic(7), false);
            ctx.add_concept(node, Concept::Atomic(3), true);
            ctx.add_concept(
                node,
                Concept::AtLeast {
                    count: 1,
                    role: 0,
                    filler: 7,
                },
                false,
            );
            chain.push(node);
            parent = node;
        }

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        ctx.compute_blocking(true).unwrap();
        assert_eq!(ctx.counters.invalid_blocks, 0);
        assert!(ctx.is_blocked(chain[1]));
    }

    /// A condition whose premise the blocker's label lacks never applies.
    #[test]
    fn unwitnessed_premises_never_apply() {
        // The first clause has no satisfiable head, so applying it would refute any block.
        let clauses = vec![
            Clause::uncentred(vec![8], vec![]),
            Clause::uncentred(vec![7], vec![HeadAlternative { conditions: vec![] }]),
        ];
        let config = Config {
            validator: ValidatorVariant::Constraints,
            ..Config::default()
        };
        let mut ctx = Context::from_config(config, clauses);

        let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
        let mut parent = root;
        let mut chain = vec![];
        for _ in 0..2 {
            let node = ctx
                .fresh_node(Some(parent), Some(0), NodeKind::Tree)
                .unwrap();
            ctx.add_concept(node, Concept::Atomic(7), true);
            ctx.add_concept(
                node,
                Concept::AtLeast {
                    count: 1,
                    role: 0,
                    filler: 7,
                },
                false,
            );
            chain.push(node);
            parent = node;
        }

        ctx.compute_blocking(false).unwrap();
        assert!(ctx.is_blocked(chain[1]));

        // Concept 8 is nowhere in the model, so only the trivial clause over 7 is consulted.
        ctx.compute_blocking(true).unwrap();
        assert_eq!(ctx.counters.invalid_blocks, 0);
        assert!(ctx.is_blocked(chain[1]));
    }

    /// Without inverse roles, conditions looking back across the tree edge are vacuous.
    #[test]
    fn inverse_conditions_are_vacuous_without_inverses() {
        let clause = || {
            vec![Clause::uncentred(
                vec![7],
                vec![HeadAlternative {
                    conditions: vec![PatternConcept::InverseParentRole(0)],
                }],
            )]
        };

        let build = |config: Config| {
            let mut ctx = Context::from_config(config, clause());
            let root = ctx.fresh_node(None, None, NodeKind::Root).unwrap();
            let mut parent = root;
            let mut chain = vec![];
            for _ in 0..2 {
                let node = ctx
                    .fresh_node(Some(parent), Some(0), NodeKind::Tree)
                    .unwrap();
                ctx.add_concept(node, Concept::Atomic(7), true);
                ctx.add_concept(
                    node,
                    Concept::AtLeast {
                        count: 1,
                        role: 0,
                        filler: 7,
                    },
                    false,
                );
                chain.push(node);
                parent = node;
            }
            ctx.compute_blocking(false).unwrap();
            ctx.compute_blocking(true).unwrap();
            (ctx, chain)
        };

        // With inverses the condition needs an actual back edge, which is absent.
        let (ctx, chain) = build(Config::default());
        assert!(!ctx.is_blocked(chain[1]));

        let (ctx, chain) = build(Config {
            has_inverses: false,
            ..Config::default()
        });
        assert!(ctx.is_blocked(chain[1]));
    }
}
