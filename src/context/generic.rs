use crate::{
    blocking::{
        checker::DirectBlockingChecker, core_variables, strategy::AnywhereValidatedBlocking,
        validator::BlockingValidator,
    },
    config::Config,
    db::{disjunction::DisjunctionDB, node::NodeDB},
    structures::{
        clause::Clause,
        concept::{Concept, Role},
        disjunction::DisjunctionKey,
        node::{BlockStatus, NodeId, NodeKind},
    },
    types::err::{self},
};

use super::{Counters, callbacks::CallbackValidation};

/// A generic context, parameterised to a direct blocking checker.
///
/// # Example
///
/// ```rust
/// # use tableau_core::blocking::checker::CoreBlockingChecker;
/// # use tableau_core::config::Config;
/// # use tableau_core::context::GenericContext;
/// let context = GenericContext::<CoreBlockingChecker>::with_checker(
///     CoreBlockingChecker::default(),
///     Config::default(),
///     vec![],
/// );
/// ```
pub struct GenericContext<C: DirectBlockingChecker> {
    /// The configuration of a context.
    pub config: Config,

    /// Counters related to a context/search.
    pub counters: Counters,

    /// The node database.
    /// See [db::node](crate::db::node) for details.
    pub node_db: NodeDB,

    /// The blocking strategy, holding the blocker equivalence cache and validator.
    /// See [blocking::strategy](crate::blocking::strategy) for details.
    pub blocking: AnywhereValidatedBlocking<C>,

    /// The disjunction database.
    /// See [db::disjunction](crate::db::disjunction) for details.
    pub disjunction_db: DisjunctionDB,

    /// The compiled clauses, shared by validation and core-variable computation.
    pub clauses: Vec<Clause>,

    /// Called when a full validation pass begins.
    pub(super) callback_validation_started: Option<Box<CallbackValidation>>,

    /// Called when a full validation pass ends.
    pub(super) callback_validation_finished: Option<Box<CallbackValidation>>,
}

impl<C: DirectBlockingChecker> GenericContext<C> {
    /// A context from a checker, a configuration, and the compiled clauses.
    pub fn with_checker(checker: C, config: Config, clauses: Vec<Clause>) -> Self {
        let validator = BlockingValidator::from_config(&config, clauses.clone());
        let blocking = AnywhereValidatedBlocking::new(checker, validator, &config);
        GenericContext {
            config,
            counters: Counters::default(),
            node_db: NodeDB::default(),
            blocking,
            disjunction_db: DisjunctionDB::default(),
            clauses,
            callback_validation_started: None,
            callback_validation_finished: None,
        }
    }

    /*
    Node mutation.

    Each method pairs the database update with the matching strategy notification.
    */

    /// A fresh node --- on Ok the node is part of the model graph and known to the blocking strategy.
    pub fn fresh_node(
        &mut self,
        parent: Option<NodeId>,
        parent_role: Option<Role>,
        kind: NodeKind,
    ) -> Result<NodeId, err::ErrorKind> {
        let node = self.node_db.fresh_node(parent, parent_role, kind)?;
        self.counters.nodes_created += 1;
        self.blocking.node_initialized(node);
        if let (Some(parent), Some(role)) = (parent, parent_role) {
            // The tree edge counts as a core role assertion for blocking purposes.
            self.blocking.role_assertion_changed(role, parent, node, true);
        }
        Ok(node)
    }

    /// Add `concept` to the label of `node` with the given core flag.
    ///
    /// Re-asserting a present concept with `core` set upgrades the existing assertion, with the matching notification.
    pub fn add_concept(&mut self, node: NodeId, concept: Concept, core: bool) {
        if self.node_db.add_concept(node, concept, core) {
            if concept.is_existential() {
                let entry = self.node_db.node_mut(node);
                entry.unprocessed_existentials += 1;
            }
            self.blocking.concept_assertion_added(node, concept, core);
        } else if core {
            self.set_concept_core(node, concept);
        }
    }

    /// Remove `concept` from the label of `node`.
    pub fn remove_concept(&mut self, node: NodeId, concept: Concept) {
        let core = self
            .node_db
            .node(node)
            .label
            .get(&concept)
            .copied()
            .unwrap_or(false);
        if self.node_db.remove_concept(node, concept) {
            if concept.is_existential() {
                let entry = self.node_db.node_mut(node);
                entry.unprocessed_existentials = entry.unprocessed_existentials.saturating_sub(1);
            }
            self.blocking.concept_assertion_removed(node, concept, core);
        }
    }

    /// Flag an asserted concept at `node` as core.
    pub fn set_concept_core(&mut self, node: NodeId, concept: Concept) {
        if self.node_db.set_concept_core(node, concept) {
            self.blocking.concept_core_set(node, concept);
        }
    }

    /// Note an existential at `node` as processed.
    pub fn existential_processed(&mut self, node: NodeId) {
        let entry = self.node_db.node_mut(node);
        entry.unprocessed_existentials = entry.unprocessed_existentials.saturating_sub(1);
    }

    /// Overwrite the count of unprocessed existentials at `node`.
    ///
    /// For drivers which track obligations themselves rather than through the label.
    /// A node with pending existentials is re-examined at the next pre-blocking pass.
    pub fn set_unprocessed_existentials(&mut self, node: NodeId, count: usize) {
        self.node_db.node_mut(node).unprocessed_existentials = count;
        self.blocking.node_status_changed(node);
    }

    /// Record a role assertion from `from` to `to`.
    pub fn add_role_assertion(&mut self, role: Role, from: NodeId, to: NodeId, core: bool) {
        if self.node_db.add_role_assertion(role, from, to) {
            self.blocking.role_assertion_changed(role, from, to, core);
        }
    }

    /// Retract a role assertion.
    pub fn remove_role_assertion(&mut self, role: Role, from: NodeId, to: NodeId, core: bool) {
        if self.node_db.remove_role_assertion(role, from, to) {
            self.blocking.role_assertion_changed(role, from, to, core);
        }
    }

    /// Flag `node` as merged into `into`.
    ///
    /// The node leaves the blocker equivalence cache at the next pre-blocking pass.
    pub fn mark_merged(&mut self, node: NodeId, into: NodeId) {
        self.node_db.node_mut(node).merged = true;
        self.blocking.node_status_changed(node);
        self.blocking.node_status_changed(into);
    }

    /// Flag `node` as pruned.
    pub fn mark_pruned(&mut self, node: NodeId) {
        self.node_db.node_mut(node).pruned = true;
        self.blocking.node_status_changed(node);
    }

    /// Destroy `node` --- on Ok the id is dead and forgotten by the strategy.
    pub fn destroy_node(&mut self, node: NodeId) -> Result<(), err::ErrorKind> {
        self.blocking.node_destroyed(node)?;
        self.node_db.destroy(node);
        self.counters.nodes_destroyed += 1;
        Ok(())
    }

    /*
    Blocking.
    */

    /// Recompute blocking: a full validation pass when `final_chance`, a pre-blocking pass otherwise.
    pub fn compute_blocking(&mut self, final_chance: bool) -> Result<(), err::ErrorKind> {
        if final_chance {
            self.check_callback_validation_started();
        }
        let result =
            self.blocking
                .compute_blocking(&mut self.node_db, &mut self.counters, final_chance);
        if final_chance {
            self.check_callback_validation_finished();
        }
        result
    }

    /// Note a complete model: harvest safe blocking signatures, if the signature cache is enabled.
    pub fn model_found(&mut self) {
        self.blocking.model_found(&self.node_db);
    }

    /// Whether `node` is currently blocked, directly or otherwise.
    pub fn is_blocked(&self, node: NodeId) -> bool {
        self.node_db.node(node).block.is_blocked()
    }

    /// The witness of the block on `node`, if the block has one.
    pub fn blocker_of(&self, node: NodeId) -> Option<NodeId> {
        self.node_db.node(node).block.witness()
    }

    /// The current block status of `node`.
    pub fn block_status(&self, node: NodeId) -> BlockStatus {
        self.node_db.node(node).block
    }

    /// Which bound variables of `clause` should derive core concepts, given `bindings`.
    pub fn core_variables(&self, clause: &Clause, bindings: &[NodeId]) -> Vec<bool> {
        core_variables::core_variables(&self.config, clause, &self.node_db, bindings)
    }

    /*
    Disjunctions.
    */

    /// The key of the disjunction over exactly `disjuncts`, interning it if fresh.
    pub fn intern_disjunction(&mut self, disjuncts: &[Concept]) -> DisjunctionKey {
        let before = self.disjunction_db.count();
        let key = self.disjunction_db.intern(disjuncts);
        if self.disjunction_db.count() > before {
            self.counters.disjunctions_interned += 1;
        }
        key
    }

    /// Record a backtrack out of the disjunct at `disjunct_index` of the disjunction at `key`.
    pub fn record_backtrack(&mut self, key: DisjunctionKey, disjunct_index: usize) {
        self.counters.disjunct_backtracks += 1;
        self.disjunction_db
            .disjunction_mut(key)
            .record_backtrack(disjunct_index);
    }

    /*
    Housekeeping.
    */

    /// Assert the internal consistency of the blocker equivalence cache.
    pub fn sanity_check(&self) -> Result<(), err::ErrorKind> {
        self.blocking.cache.sanity_check(&self.node_db)?;
        Ok(())
    }

    /// Forget all per-branch state.
    ///
    /// The disjunction database and the signature cache persist: both hold knowledge learned across branches.
    pub fn clear(&mut self) {
        self.node_db = NodeDB::default();
        self.blocking.clear();
    }
}
