/*!
The context --- to which the model graph belongs and within which blocking is computed, etc.

Strictly, a [GenericContext] and a [Context].

The generic context is generic over the direct blocking checker.
For the moment only [CoreBlockingChecker](crate::blocking::checker::CoreBlockingChecker) is used, but this helps distinguish generic context methods against those intended for a particular checker.
In particular, [from_config](Context::from_config) is implemented for a context rather than a generic context to avoid requiring a checker to be supplied alongside a config.

The context is the single mutation surface of the model graph.
Every mutation method updates the node database *and* forwards the matching notification to the blocking strategy, so the strategy's caches and watermarks never drift from the graph.

# Example
```rust
# use tableau_core::config::Config;
# use tableau_core::context::Context;
# use tableau_core::structures::concept::Concept;
# use tableau_core::structures::node::NodeKind;
let mut the_context = Context::from_config(Config::default(), vec![]);

let root = the_context.fresh_node(None, None, NodeKind::Root).unwrap();
let child = the_context.fresh_node(Some(root), Some(0), NodeKind::Tree).unwrap();

the_context.add_concept(child, Concept::Atomic(0), true);
the_context.compute_blocking(false).unwrap();

assert!(!the_context.is_blocked(child));
```
*/

pub mod callbacks;
mod counters;
pub use counters::Counters;
mod generic;
pub use generic::GenericContext;
mod specific;
pub use specific::Context;
