/*!
The databases a context holds.

- The [node database](node) --- the arena of nodes, traversed in creation order.
- The [blocker equivalence cache](blockers) --- equivalence classes of candidate blockers, grouped by blocking digest.
- The [signature cache](signature) --- blocking signatures proven safe in a found model, shared across search branches.
- The [disjunction database](disjunction) --- interned disjunctive clause heads.
*/

pub mod blockers;
pub mod disjunction;
pub mod node;
pub mod signature;
