/*!
The blocking algorithms.

- [checker] --- the direct blocking oracle: digests, compatibility, dirty flags.
- [strategy] --- anywhere validated blocking: cheap incremental pre-blocking, exhaustive validation, and the mutation-notification surface.
- [validator] --- the semantic side-conditions a tentative block must satisfy.
- [core_variables] --- which bound variables of a compiled clause must be retained.
*/

pub mod checker;
pub mod core_variables;
pub mod strategy;
pub mod validator;
