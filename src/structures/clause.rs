/*!
The compiled shape of a clause, as far as blocking needs to see it.

Clause *evaluation* is the business of the surrounding calculus.
This core consumes two projections of a compiled clause:

- The [validators](crate::blocking::validator) read a clause as: whenever every premise concept holds at a node, some head alternative must be satisfied in the node's context.
- [Core-variable classification](crate::blocking::core_variables) reads the kind, the head length, and whether the head is centred on the clause's centre variable.

Conditions on the head are expressed as [PatternConcept]s, evaluated against the blocker/blocked pattern --- the blocker, the blocked node, and the blocked node's parent.
*/

use crate::structures::concept::{AtomicConcept, Concept, Role};

/// The kind of a clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClauseKind {
    /// A concept inclusion --- the only kind relevant to block validity and core variables.
    ConceptInclusion,

    /// Any other kind (role inclusions, description-graph clauses, ...).
    Other,
}

/// A condition appearing in a head alternative, evaluated against the blocker/blocked pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternConcept {
    /// The concept holds at the blocker itself.
    Concept(Concept),

    /// The atomic concept holds at the blocked node's parent.
    ParentConcept(AtomicConcept),

    /// A role edge runs from the blocked node's parent to the blocked node.
    ParentRole(Role),

    /// A role edge runs from the blocked node back to its parent.
    ///
    /// Vacuous unless the ontology uses inverse roles.
    InverseParentRole(Role),
}

/// One way of satisfying the head of a clause: a conjunction of pattern conditions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadAlternative {
    pub conditions: Vec<PatternConcept>,
}

/// A compiled clause.
#[derive(Clone, Debug)]
pub struct Clause {
    /// The kind of the clause.
    pub kind: ClauseKind,

    /// Body concepts at the centre variable --- all must hold for the clause to be applicable.
    pub premise: Vec<AtomicConcept>,

    /// The disjunctive head choices.
    pub alternatives: Vec<HeadAlternative>,

    /// Whether the first head atom is unary on the centre variable.
    ///
    /// For such clauses the obligation is re-derivable at any node, and no bound variable needs to be retained.
    pub head_centred: bool,
}

impl Clause {
    /// A concept-inclusion clause with a head centred on the clause's centre variable.
    pub fn centred(premise: Vec<AtomicConcept>, alternatives: Vec<HeadAlternative>) -> Self {
        Clause {
            kind: ClauseKind::ConceptInclusion,
            premise,
            alternatives,
            head_centred: true,
        }
    }

    /// A concept-inclusion clause whose head mentions nodes other than the centre variable.
    pub fn uncentred(premise: Vec<AtomicConcept>, alternatives: Vec<HeadAlternative>) -> Self {
        Clause {
            kind: ClauseKind::ConceptInclusion,
            premise,
            alternatives,
            head_centred: false,
        }
    }
}
