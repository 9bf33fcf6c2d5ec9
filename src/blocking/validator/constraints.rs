/*!
The constraint-based validator.

At initialization the concept-inclusion clauses are compiled into valid-block conditions, keyed by their premise: unary conditions by a single atomic concept, n-ary conditions by a canonicalized set.
Validation walks the blocker's label and looks unary conditions up by atom, so clauses whose premise the blocker cannot witness are never touched.
N-ary premises are scanned and re-tested against the label, as multi-atom keys admit no single-atom lookup.
*/

use std::collections::HashMap;

use crate::{
    blocking::validator::{alternative_satisfied, premise_holds},
    config::Config,
    db::node::NodeDB,
    structures::{
        clause::{Clause, ClauseKind, HeadAlternative},
        concept::{AtomicConcept, Concept},
        node::NodeId,
    },
};

/// Valid-block conditions, compiled from the clause list.
#[derive(Default)]
pub struct BlockConditions {
    /// Conditions with a single-concept premise.
    pub unary: HashMap<AtomicConcept, Vec<Vec<HeadAlternative>>>,

    /// Conditions with a premise of zero, two, or more concepts, keyed by the sorted premise.
    pub nary: HashMap<Box<[AtomicConcept]>, Vec<Vec<HeadAlternative>>>,
}

impl BlockConditions {
    /// Compile conditions from the concept-inclusion clauses of `clauses`.
    pub fn from_clauses(clauses: &[Clause]) -> Self {
        let mut conditions = BlockConditions::default();
        for clause in clauses {
            if clause.kind != ClauseKind::ConceptInclusion {
                continue;
            }
            match clause.premise.as_slice() {
                [atom] => {
                    conditions
                        .unary
                        .entry(*atom)
                        .or_default()
                        .push(clause.alternatives.clone());
                }
                premise => {
                    let mut key: Vec<AtomicConcept> = premise.into();
                    key.sort_unstable();
                    key.dedup();
                    conditions
                        .nary
                        .entry(key.into())
                        .or_default()
                        .push(clause.alternatives.clone());
                }
            }
        }
        conditions
    }
}

/// The constraint-based validator.
pub struct ConstraintValidator {
    conditions: BlockConditions,
    singleton_core: bool,
    has_inverses: bool,
}

impl ConstraintValidator {
    /// A validator over conditions compiled from `clauses`.
    pub fn from_clauses(config: &Config, clauses: &[Clause]) -> Self {
        ConstraintValidator {
            conditions: BlockConditions::from_clauses(clauses),
            singleton_core: config.singleton_core,
            has_inverses: config.has_inverses,
        }
    }

    /// Whether every applicable condition is satisfied by the blocker/blocked pattern.
    pub fn validate(&self, nodes: &NodeDB, blocker: NodeId, blocked: NodeId) -> bool {
        for atom in self.premise_atoms(nodes, blocker) {
            if let Some(condition_sets) = self.conditions.unary.get(&atom) {
                for alternatives in condition_sets {
                    if !self.some_alternative_satisfied(nodes, blocker, blocked, alternatives) {
                        return false;
                    }
                }
            }
        }
        for (premise, condition_sets) in &self.conditions.nary {
            if premise_holds(nodes, blocker, premise, self.singleton_core) {
                for alternatives in condition_sets {
                    if !self.some_alternative_satisfied(nodes, blocker, blocked, alternatives) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// The atoms of the blocker's label which may witness a premise.
    ///
    /// With the singleton core only core concepts count, matching [premise_holds].
    fn premise_atoms(&self, nodes: &NodeDB, blocker: NodeId) -> Vec<AtomicConcept> {
        let blocker = nodes.node(blocker);
        let atom_of = |concept: Concept| match concept {
            Concept::Atomic(atom) => Some(atom),
            Concept::AtLeast { .. } => None,
        };
        if self.singleton_core {
            blocker.core_concepts().filter_map(atom_of).collect()
        } else {
            blocker.concepts().filter_map(atom_of).collect()
        }
    }

    fn some_alternative_satisfied(
        &self,
        nodes: &NodeDB,
        blocker: NodeId,
        blocked: NodeId,
        alternatives: &[HeadAlternative],
    ) -> bool {
        alternatives.iter().any(|alternative| {
            alternative_satisfied(nodes, blocker, blocked, alternative, self.has_inverses)
        })
    }
}
