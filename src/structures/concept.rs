/*!
(The internal representation of) concepts and roles.

Atomic concepts and roles are interned as `u32`s by whatever parses and normalizes the ontology.
This representation allows them to be used as indicies or hashed cheaply, without taking too much space.

A node label is a set of [Concept]s, each flagged as core or non-core.
Only core concepts contribute to the blocking-relevant label.
*/

/// An atomic concept, interned by the ontology front-end.
pub type AtomicConcept = u32;

/// A role (aka. a 'property'), interned by the ontology front-end.
pub type Role = u32;

/// A concept as it appears in a node label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Concept {
    /// An atomic concept.
    Atomic(AtomicConcept),

    /// An at-least cardinality restriction --- with `count` 1, an existential.
    AtLeast {
        count: u32,
        role: Role,
        filler: AtomicConcept,
    },
}

impl Concept {
    /// Whether the concept is an existential or cardinality restriction.
    ///
    /// Existential disjuncts are tried after atomic disjuncts, and existential label members are the obligations blocking suspends.
    pub fn is_existential(&self) -> bool {
        matches!(self, Concept::AtLeast { .. })
    }

    /// A cheap, deterministic hash of the concept, used when folding a label into a blocking digest.
    pub fn digest(&self) -> u32 {
        match self {
            Concept::Atomic(a) => a.wrapping_mul(0x9E37_79B9),
            Concept::AtLeast {
                count,
                role,
                filler,
            } => count
                .wrapping_mul(0x85EB_CA6B)
                .wrapping_add(role.wrapping_mul(0xC2B2_AE35))
                .wrapping_add(filler.wrapping_mul(0x27D4_EB2F)),
        }
    }
}
