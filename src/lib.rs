//! A library implementing the blocking core of a tableau-based description logic calculus.
//!
//! tableau_core maintains the blocking state of a tableau model graph: which nodes are blocked, by whom, and whether those blocks would survive scrutiny, using anywhere blocking with core labels and exhaustive block validation.
//! Alongside blocking, the library keeps the adaptively reordered disjunctions used by the surrounding calculus to pick cheap disjuncts first.
//!
//! The expansion calculus itself --- rule application, clashes, backtracking --- lives outside the library.
//! tableau_core is the part such a calculus leans on for termination: it decides when a subtree need not be expanded because an older node already witnesses its obligations.
//!
//! # Orientation
//!
//! The library is designed around the core structure of a [context].
//!
//! Contexts are built with a configuration and the compiled clauses of an ontology.
//! The external calculus drives the model graph through the context: creating nodes, asserting concepts and roles, and asking for blocking to be recomputed at its preferred cadence.
//!
//! Internally, and at a high-level, blocking is viewed in terms of manipulation of, and relationships between, a handful of databases:
//! - The model graph is stored in a [node database](crate::db::node).
//! - Candidate blockers are grouped by blocking signature in a [blocker equivalence cache](crate::db::blockers).
//! - Interned disjunctive clause heads, with their learned orderings, are stored in a [disjunction database](crate::db::disjunction).
//!
//! Mutations to the graph lower watermarks in the [blocking strategy](crate::blocking::strategy), which in turn bound the work of the next blocking pass, whose outcome feeds back into which nodes the calculus expands.
//!
//! Useful starting points, then, may be:
//! - The [strategy](crate::blocking::strategy) to inspect the dynamics of pre-blocking and validation.
//! - The [database module](crate::db) to inspect the data considered during a search.
//! - The [structures] to familiarise yourself with the abstract elements of a search and their representation (nodes, concepts, clauses, etc.)
//! - The [configuration](crate::config) to see what features are supported.
//!
//! # Examples
//!
//! + Block a repeating chain of tree nodes.
//!
//! ```rust
//! # use tableau_core::config::Config;
//! # use tableau_core::context::Context;
//! # use tableau_core::structures::concept::Concept;
//! # use tableau_core::structures::node::NodeKind;
//! let mut the_context = Context::from_config(Config::default(), vec![]);
//!
//! let root = the_context.fresh_node(None, None, NodeKind::Root).unwrap();
//! let mut parent = root;
//! let mut nodes = vec![];
//! for _ in 0..3 {
//!     let node = the_context.fresh_node(Some(parent), Some(0), NodeKind::Tree).unwrap();
//!     the_context.add_concept(node, Concept::Atomic(7), true);
//!     // The pending existential is what makes blocking worth computing.
//!     the_context.add_concept(node, Concept::AtLeast { count: 1, role: 0, filler: 7 }, false);
//!     nodes.push(node);
//!     parent = node;
//! }
//!
//! the_context.compute_blocking(false).unwrap();
//!
//! // The oldest copy of the label is the blocker of the next.
//! assert!(!the_context.is_blocked(nodes[0]));
//! assert!(the_context.is_blocked(nodes[1]));
//! assert_eq!(the_context.blocker_of(nodes[1]), Some(nodes[0]));
//! ```
//!
//! # Logs
//!
//! To help diagnose issues (somewhat) detailed calls to [log!](log) are made, and a variety of targets are defined in order to help narrow output to relevant parts of the library.
//! As logging is only built on request, and further can be requested by level, logs are verbose.
//!
//! The targets are listed in [misc::log].
//!
//! For example, when used with [env_logger](https://docs.rs/env_logger/latest/env_logger/):
//! - Logs related to [the blocker equivalence cache](crate::db::blockers) can be filtered with `RUST_LOG=cache …` or,
//! - Logs of validation outcomes without per-node information can be found with `RUST_LOG=validation=info …`

pub mod blocking;
pub mod config;
pub mod context;
pub mod structures;
pub mod types;

pub mod generic;

pub mod db;

pub mod misc;
