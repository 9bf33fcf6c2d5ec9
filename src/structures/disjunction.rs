/*!
An interned disjunctive clause head, with an adaptively reordered sequence of disjunct indices.

Each distinct sequence of disjuncts is represented once, interned through the [disjunction database](crate::db::disjunction), so structurally identical clause heads share their ordering state.
A disjunction is long-lived: its counters belong to the whole search, not to a branch, and are never reset on backtrack.

# Ordering

The order holds disjunct indices partitioned so atomic disjuncts precede existential disjuncts --- experience shows it is usually better to try atomics first.
Within a partition, indices are kept in ascending order of backtracking count, so the historically cheapest disjunct is tried first.

On each recorded backtrack the charged disjunct's counter is incremented and the disjunct bubbles right within its partition until its position is stable.
A disjunct which reaches the start of its partition is marked as having been the best choice, and one which reaches the end as having been the worst.
Once any disjunct has been both, the order is frozen permanently: the heuristic has revealed enough structure, and further reordering would thrash between extremes.
*/

use crate::misc::log::targets::{self};
use crate::structures::concept::Concept;

/// A token identifying an interned [Disjunction] in the [disjunction database](crate::db::disjunction).
pub type DisjunctionKey = u32;

/// A disjunct index together with its backtracking history.
#[derive(Clone, Copy, Debug)]
struct DisjunctIndex {
    /// The index of the disjunct in the disjunction.
    index: usize,

    /// How often backtracking has been blamed on this disjunct.
    backtracks: usize,

    /// The disjunct has, at some point, reached the start of its partition.
    been_best: bool,

    /// The disjunct has, at some point, reached the end of its partition.
    been_worst: bool,
}

/// An interned disjunctive clause head.
pub struct Disjunction {
    /// The disjuncts, in their original order --- indices refer to this sequence.
    disjuncts: Box<[Concept]>,

    /// Disjunct indices in the adaptively maintained try-order.
    order: Vec<DisjunctIndex>,

    /// The position at which the existential partition begins.
    first_existential: usize,

    /// Reordering has been stopped permanently.
    frozen: bool,
}

impl Disjunction {
    /// A fresh disjunction over the given disjuncts, atomics placed before existentials.
    pub(crate) fn new(disjuncts: Box<[Concept]>) -> Self {
        let existential_count = disjuncts.iter().filter(|d| d.is_existential()).count();
        let first_existential = disjuncts.len() - existential_count;

        let mut order = vec![
            DisjunctIndex {
                index: 0,
                backtracks: 0,
                been_best: false,
                been_worst: false,
            };
            disjuncts.len()
        ];
        let mut next_atomic = 0;
        let mut next_existential = first_existential;
        for (index, disjunct) in disjuncts.iter().enumerate() {
            if disjunct.is_existential() {
                order[next_existential].index = index;
                next_existential += 1;
            } else {
                order[next_atomic].index = index;
                next_atomic += 1;
            }
        }

        Disjunction {
            disjuncts,
            order,
            first_existential,
            frozen: false,
        }
    }

    /// The disjuncts, in their original order.
    pub fn disjuncts(&self) -> &[Concept] {
        &self.disjuncts
    }

    /// A count of disjuncts.
    pub fn len(&self) -> usize {
        self.disjuncts.len()
    }

    /// Whether the disjunction is empty.
    pub fn is_empty(&self) -> bool {
        self.disjuncts.is_empty()
    }

    /// Whether reordering has been stopped permanently.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether this disjunction is over exactly the given disjuncts, in the given order.
    pub fn is_over(&self, disjuncts: &[Concept]) -> bool {
        *self.disjuncts == *disjuncts
    }

    /// Disjunct indices in the current try-order: atomics first, each partition cheapest-first.
    pub fn sorted_disjunct_indexes(&self) -> Vec<usize> {
        self.order.iter().map(|entry| entry.index).collect()
    }

    /// Charge a backtrack to the given disjunct and rebalance its partition.
    ///
    /// If some disjunct has been both the best and the worst choice the order freezes instead, and the charge is dropped.
    pub fn record_backtrack(&mut self, disjunct_index: usize) {
        if self.frozen {
            return;
        }
        for position in 0..self.order.len() {
            let entry = self.order[position];
            if entry.been_best && entry.been_worst {
                self.frozen = true;
                log::info!(
                    target: targets::DISJUNCTION,
                    "Order frozen for a disjunction of length {}",
                    self.disjuncts.len()
                );
                return;
            }

            if entry.index == disjunct_index {
                self.order[position].backtracks += 1;

                let (partition_start, partition_end) = if position < self.first_existential {
                    (0, self.first_existential)
                } else {
                    (self.first_existential, self.order.len())
                };

                let mut current = position;
                let mut next = current + 1;
                while next < partition_end
                    && self.order[current].backtracks > self.order[next].backtracks
                {
                    self.order.swap(current, next);
                    if current == partition_start {
                        self.order[current].been_best = true;
                    }
                    current = next;
                    next += 1;
                }
                if next == partition_end {
                    self.order[current].been_worst = true;
                }
                return;
            }
        }
    }
}
