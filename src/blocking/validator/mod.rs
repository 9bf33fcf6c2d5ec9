/*!
Block validators: the *semantic* side of blocking.

Pre-blocking establishes tentative blocks on digest equality and pairwise compatibility alone.
A validator decides whether a tentative block satisfies the soundness side-conditions of the calculus: would unravelling the blocked subtree under its blocker really yield a model?

Two operationally different, semantically equivalent strategies exist, selected once per run:

- [Constraints](constraints) --- evaluates pre-compiled permitted label-combination conditions against the blocker/blocked pattern.
- [Rules](rules) --- walks the clause list and asks whether any concept-inclusion clause could fire on the blocked copy without equally firing on the blocker.

Both must agree on all valid inputs.
The equivalence is a correctness property, checked by test, not an implementation convenience.

A validator memoizes its verdict per node through two private flags on the node, reset when a different candidate is about to be tried ([blocker_changed](BlockingValidator::blocker_changed)) and cleared wholesale after a full validation pass.
*/

pub mod constraints;
pub mod rules;

use crate::{
    config::{Config, ValidatorVariant},
    db::node::NodeDB,
    misc::log::targets::{self},
    structures::{
        clause::{Clause, HeadAlternative, PatternConcept},
        concept::{AtomicConcept, Concept},
        node::{BlockStatus, NodeId},
    },
};

use constraints::ConstraintValidator;
use rules::RuleValidator;

/// A block validator, one variant active per run.
pub enum BlockingValidator {
    Constraints(ConstraintValidator),
    Rules(RuleValidator),
}

impl BlockingValidator {
    /// The validator named by the configuration, compiled from the given clauses.
    pub fn from_config(config: &Config, clauses: Vec<Clause>) -> Self {
        match config.validator {
            ValidatorVariant::Constraints => {
                BlockingValidator::Constraints(ConstraintValidator::from_clauses(config, &clauses))
            }
            ValidatorVariant::Rules => BlockingValidator::Rules(RuleValidator::new(config, clauses)),
        }
    }

    /// Whether the block currently assigned to `node` satisfies the calculus's side-conditions.
    ///
    /// Only direct blocks carry side-conditions.
    /// Signature blocks were proven safe by a found model, and the verdict for anything else is vacuous.
    pub fn is_block_valid(&self, nodes: &mut NodeDB, node: NodeId) -> bool {
        let entry = nodes.node(node);
        if entry.validation_checked {
            return !entry.validation_violated;
        }

        let valid = match entry.block {
            BlockStatus::Directly(blocker) => match self {
                BlockingValidator::Constraints(validator) => {
                    validator.validate(nodes, blocker, node)
                }
                BlockingValidator::Rules(validator) => validator.validate(nodes, blocker, node),
            },
            BlockStatus::Signature | BlockStatus::Indirectly(_) | BlockStatus::Unblocked => true,
        };

        let entry = nodes.node_mut(node);
        entry.validation_checked = true;
        entry.validation_violated = !valid;
        if !valid {
            log::trace!(target: targets::VALIDATION, "Invalid block on node {node}");
        }
        valid
    }

    /// A different candidate is about to be tried for `node` --- drop the memoized verdict.
    pub fn blocker_changed(&self, nodes: &mut NodeDB, node: NodeId) {
        let entry = nodes.node_mut(node);
        entry.validation_checked = false;
        entry.validation_violated = false;
    }

    /// Clear the per-node memo after a full validation pass.
    pub fn clear_memo(&self, nodes: &mut NodeDB, node: NodeId) {
        let entry = nodes.node_mut(node);
        entry.validation_checked = false;
        entry.validation_violated = false;
    }
}

/// Whether every premise concept holds at `blocker`.
///
/// With the singleton core, only core concepts count as held.
pub(crate) fn premise_holds(
    nodes: &NodeDB,
    blocker: NodeId,
    premise: &[AtomicConcept],
    singleton_core: bool,
) -> bool {
    let blocker = nodes.node(blocker);
    premise.iter().all(|atom| {
        let concept = Concept::Atomic(*atom);
        if singleton_core {
            blocker.has_core_concept(concept)
        } else {
            blocker.has_concept(concept)
        }
    })
}

/// Whether one head alternative is satisfied by the blocker/blocked pattern.
pub(crate) fn alternative_satisfied(
    nodes: &NodeDB,
    blocker: NodeId,
    blocked: NodeId,
    alternative: &HeadAlternative,
    has_inverses: bool,
) -> bool {
    let parent = nodes.node(blocked).parent;
    alternative.conditions.iter().all(|condition| {
        match condition {
            PatternConcept::Concept(concept) => nodes.node(blocker).has_concept(*concept),
            PatternConcept::ParentConcept(atom) => parent
                .is_some_and(|parent| nodes.node(parent).has_concept(Concept::Atomic(*atom))),
            PatternConcept::ParentRole(role) => {
                parent.is_some_and(|parent| nodes.has_role_edge(*role, parent, blocked))
            }
            PatternConcept::InverseParentRole(role) => {
                // Without inverses no condition can look back across the tree edge.
                !has_inverses
                    || parent.is_some_and(|parent| nodes.has_role_edge(*role, blocked, parent))
            }
        }
    })
}
