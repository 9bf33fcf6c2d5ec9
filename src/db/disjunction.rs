/*!
A database of interned disjunctions.

Structurally identical disjunctive clause heads are represented once: interning maps each exact ordered sequence of disjuncts to a [DisjunctionKey], so clause heads can be compared by token and share their adaptively learned ordering state.

Disjunctions persist for the lifetime of the search.
The database is cleared only with the whole context, never on backtrack.
*/

use std::collections::HashMap;

use crate::structures::{
    concept::Concept,
    disjunction::{Disjunction, DisjunctionKey},
};

/// The disjunction database.
#[derive(Default)]
pub struct DisjunctionDB {
    /// The disjunctions, addressed by key.
    disjunctions: Vec<Disjunction>,

    /// From exact disjunct sequence to the interned key.
    index: HashMap<Box<[Concept]>, DisjunctionKey>,
}

impl DisjunctionDB {
    /// A count of interned disjunctions.
    pub fn count(&self) -> usize {
        self.disjunctions.len()
    }

    /// The key of the disjunction over exactly `disjuncts`, interning it if fresh.
    pub fn intern(&mut self, disjuncts: &[Concept]) -> DisjunctionKey {
        if let Some(key) = self.index.get(disjuncts) {
            return *key;
        }
        let key = self.disjunctions.len() as DisjunctionKey;
        let disjuncts: Box<[Concept]> = disjuncts.into();
        self.disjunctions.push(Disjunction::new(disjuncts.clone()));
        self.index.insert(disjuncts, key);
        key
    }

    /// The disjunction at `key`.
    ///
    /// # Panics
    /// If the key was not issued by [intern](Self::intern).
    pub fn disjunction(&self, key: DisjunctionKey) -> &Disjunction {
        &self.disjunctions[key as usize]
    }

    /// The disjunction at `key`, mutably.
    pub fn disjunction_mut(&mut self, key: DisjunctionKey) -> &mut Disjunction {
        &mut self.disjunctions[key as usize]
    }
}
