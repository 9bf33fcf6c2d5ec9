/*!
The rule-applicability validator.

No compilation: validation walks the clause list directly and asks, clause by clause, whether the clause could fire on the blocked copy of the blocker without some head alternative already being satisfied in the blocked node's context.
Operationally different from the [constraint-based validator](super::constraints), semantically the same.
*/

use crate::{
    blocking::validator::{alternative_satisfied, premise_holds},
    config::Config,
    db::node::NodeDB,
    structures::{
        clause::{Clause, ClauseKind},
        node::NodeId,
    },
};

/// The rule-applicability validator.
pub struct RuleValidator {
    clauses: Vec<Clause>,
    singleton_core: bool,
    has_inverses: bool,
}

impl RuleValidator {
    /// A validator over the given clause list.
    pub fn new(config: &Config, clauses: Vec<Clause>) -> Self {
        RuleValidator {
            clauses,
            singleton_core: config.singleton_core,
            has_inverses: config.has_inverses,
        }
    }

    /// Whether no clause could fire on the blocked copy without equally firing on the blocker.
    pub fn validate(&self, nodes: &NodeDB, blocker: NodeId, blocked: NodeId) -> bool {
        for clause in &self.clauses {
            if clause.kind != ClauseKind::ConceptInclusion {
                continue;
            }
            if !premise_holds(nodes, blocker, &clause.premise, self.singleton_core) {
                continue;
            }
            let satisfied = clause.alternatives.iter().any(|alternative| {
                alternative_satisfied(nodes, blocker, blocked, alternative, self.has_inverses)
            });
            if !satisfied {
                return false;
            }
        }
        true
    }
}
