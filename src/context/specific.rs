use crate::{blocking::checker::CoreBlockingChecker, config::Config, structures::clause::Clause};

use super::GenericContext;

/// A context which uses [CoreBlockingChecker] as its direct blocking checker.
pub type Context = GenericContext<CoreBlockingChecker>;

impl Context {
    /// Creates a context from some given configuration and compiled clauses.
    pub fn from_config(config: Config, clauses: Vec<Clause>) -> Self {
        Self::with_checker(CoreBlockingChecker::default(), config, clauses)
    }
}
