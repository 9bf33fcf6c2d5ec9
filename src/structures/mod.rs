/*!
Structures used to represent the fragment of a tableau this core operates on.

- [concept] --- atomic concepts, roles, and the concepts appearing in node labels.
- [node] --- nodes of the model graph, their status, and their block status.
- [clause] --- the compiled shape of a clause, as far as blocking needs to see it.
- [disjunction] --- interned disjunctive clause heads with an adaptively reordered sequence of disjunct indices.
*/

pub mod clause;
pub mod concept;
pub mod disjunction;
pub mod node;
