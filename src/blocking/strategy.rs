/*!
Anywhere validated blocking.

The strategy owns the [blocker equivalence cache](crate::db::blockers) and maintains two monotonically decreasing watermarks over the creation order:

- `first_changed` --- the smallest node known to be affected since the last pre-blocking pass.
- `last_validated_unchanged` --- the smallest node still unvalidated since the last full validation.

Every mutation notification lowers a watermark; every pass resumes from one rather than rescanning the whole model.
The watermarks are updated only through [update_node_change](AnywhereValidatedBlocking::update_node_change) and [validation_info_changed](AnywhereValidatedBlocking::validation_info_changed), to keep the monotonicity (`first_changed = min(first_changed, node)`) in one place.

# Pre-blocking

Cheap, incremental, syntactic --- called frequently during expansion.
A no-op while nothing is marked changed.
Otherwise every node from the watermark is first dropped from the cache (its eligibility may be stale), then rescanned in creation order: roots are never blocked, a node below a blocked parent is indirectly blocked, a signature hit blocks outright, and otherwise candidates from the cache are consulted.
A node whose validation-relevant state is stable prefers its previous blocker, and failing that only freshly changed candidates --- unchanged ones were already ruled out or confirmed by the last validation.

# Validation

Expensive, exhaustive, semantic --- called once a candidate model is to be accepted.
The cache is rebuilt from the earliest unvalidated node, and every top-level block whose relevant quadruple (node, parent, blocker, blocker's parent) changed is re-validated, resuming from the current blocker's position in the candidate list.
A node left with no valid blocker is not an error: it is recorded in the changed watermark, and the next pre-blocking pass re-processes everything from there.
*/

use crate::{
    blocking::{checker::DirectBlockingChecker, validator::BlockingValidator},
    config::Config,
    context::Counters,
    db::{blockers::BlockersCache, node::NodeDB, signature::BlockingSignatureCache},
    misc::log::targets::{self},
    structures::{
        concept::{Concept, Role},
        node::{BlockStatus, NodeId},
    },
    types::err::{self},
};

/// The anywhere validated blocking strategy.
pub struct AnywhereValidatedBlocking<C: DirectBlockingChecker> {
    /// The direct blocking oracle.
    pub checker: C,

    /// The blocker equivalence cache.
    pub cache: BlockersCache,

    /// The block validator, one variant per run.
    pub validator: BlockingValidator,

    /// Signatures proven safe in a found model, shared across branches.
    pub signature_cache: Option<BlockingSignatureCache>,

    /// The smallest node affected since the last pre-blocking pass.
    first_changed: Option<NodeId>,

    /// The smallest node still unvalidated since the last full validation.
    last_validated_unchanged: Option<NodeId>,
}

impl<C: DirectBlockingChecker> AnywhereValidatedBlocking<C> {
    pub fn new(checker: C, validator: BlockingValidator, config: &Config) -> Self {
        AnywhereValidatedBlocking {
            checker,
            cache: BlockersCache::new(&config.cache),
            validator,
            signature_cache: config
                .use_signature_cache
                .then(BlockingSignatureCache::default),
            first_changed: None,
            last_validated_unchanged: None,
        }
    }

    /// Forget all per-branch state.
    ///
    /// The signature cache is deliberately retained: its contents were proven safe by a found model and carry over to sibling branches.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.checker.clear();
        self.first_changed = None;
        self.last_validated_unchanged = None;
    }

    /// The pre-blocking watermark, if anything is dirty.
    pub fn first_changed(&self) -> Option<NodeId> {
        self.first_changed
    }

    /// Whether validated blocks may be treated as permanent.
    ///
    /// Anywhere validated blocking treats every assertion as permanent.
    pub fn is_permanent_assertion(&self) -> bool {
        true
    }

    /// Recompute blocking: a full validation pass when `final_chance`, a pre-blocking pass otherwise.
    pub fn compute_blocking(
        &mut self,
        nodes: &mut NodeDB,
        counters: &mut Counters,
        final_chance: bool,
    ) -> Result<(), err::ErrorKind> {
        if final_chance {
            self.validate_blocks(nodes, counters)
        } else {
            self.compute_pre_blocking(nodes, counters)
        }
    }

    /// The cheap, incremental pass: a no-op while nothing is marked changed.
    pub fn compute_pre_blocking(
        &mut self,
        nodes: &mut NodeDB,
        counters: &mut Counters,
    ) -> Result<(), err::ErrorKind> {
        let Some(first_changed) = self.first_changed else {
            return Ok(());
        };
        counters.pre_blocking_passes += 1;

        let ids: Vec<NodeId> = nodes.ids_from(first_changed).collect();

        // Eligibility as a representative or blocker may be stale for anything at or past the watermark.
        for node in &ids {
            self.cache.remove(*node)?;
        }

        let check_signatures = self
            .signature_cache
            .as_ref()
            .is_some_and(|cache| !cache.is_empty());

        for &node in &ids {
            if nodes.node(node).is_active() {
                let entry = nodes.node(node);
                let stale = entry.unprocessed_existentials > 0
                    && self.checker.can_be_blocked(nodes, node)
                    && (self.checker.has_blocking_info_changed(node)
                        || !entry.block.is_directly_blocked()
                        || matches!(entry.block, BlockStatus::Directly(blocker) if blocker >= first_changed));

                if stale {
                    match nodes.node(node).parent {
                        None => nodes.node_mut(node).block = BlockStatus::Unblocked,

                        Some(parent) if nodes.node(parent).block.is_blocked() => {
                            nodes.node_mut(node).block = BlockStatus::Indirectly(parent);
                        }

                        Some(parent) => {
                            let signature_hit = check_signatures
                                && self.signature_cache.as_ref().is_some_and(|cache| {
                                    cache.contains(&self.checker.signature(nodes, node))
                                });
                            if signature_hit {
                                nodes.node_mut(node).block = BlockStatus::Signature;
                            } else {
                                let candidates =
                                    self.cache.possible_blockers(&self.checker, nodes, node)?;
                                let previous = match nodes.node(node).block {
                                    BlockStatus::Directly(blocker) => Some(blocker),
                                    _ => None,
                                };
                                let blocker =
                                    self.select_blocker(nodes, node, parent, previous, &candidates);
                                nodes.node_mut(node).block =
                                    blocker.map_or(BlockStatus::Unblocked, BlockStatus::Directly);
                            }
                        }
                    }
                }

                let entry = nodes.node(node);
                if !entry.block.is_blocked() && self.checker.can_be_blocker(nodes, node) {
                    self.cache.add(&self.checker, nodes, node)?;
                }
            }
            self.checker.clear_blocking_info_changed(node);
        }

        self.first_changed = None;
        Ok(())
    }

    /// The blocker to assign during pre-blocking, if any.
    ///
    /// Any candidate is provisionally acceptable while the node or its parent is unvalidated.
    /// Otherwise the previous blocker is kept whenever provably still safe, and failing that only a freshly changed candidate can yield a newly valid block.
    fn select_blocker(
        &self,
        nodes: &NodeDB,
        node: NodeId,
        parent: NodeId,
        previous: Option<NodeId>,
        candidates: &[NodeId],
    ) -> Option<NodeId> {
        if candidates.is_empty() {
            return None;
        }

        if self.checker.has_changed_since_validation(Some(node))
            || self.checker.has_changed_since_validation(Some(parent))
        {
            // Even if every candidate was invalid at the last validation, the node changed, so any is worth another try.
            return candidates.first().copied();
        }

        if let Some(previous) = previous {
            // A previous blocker still in the cache has not been modified, as a modification would have changed its digest.
            if candidates.contains(&previous)
                && !self.checker.has_changed_since_validation(Some(previous))
                && !self
                    .checker
                    .has_changed_since_validation(nodes.node(previous).parent)
            {
                return Some(previous);
            }
        }

        candidates.iter().copied().find(|candidate| {
            self.checker.has_changed_since_validation(Some(*candidate))
                || self
                    .checker
                    .has_changed_since_validation(nodes.node(*candidate).parent)
        })
    }

    /// The exhaustive pass: re-validate every top-level block whose relevant quadruple changed.
    pub fn validate_blocks(
        &mut self,
        nodes: &mut NodeDB,
        counters: &mut Counters,
    ) -> Result<(), err::ErrorKind> {
        counters.model_validations += 1;
        let mut checked_blocks: usize = 0;
        let mut invalid_blocks: usize = 0;
        let mut first_invalid: Option<NodeId> = None;

        let start = match self.last_validated_unchanged {
            Some(node) => node,
            None => match nodes.first_node() {
                Some(node) => node,
                None => return Ok(()),
            },
        };
        let ids: Vec<NodeId> = nodes.ids_from(start).collect();

        for node in &ids {
            self.cache.remove(*node)?;
        }

        for &node in &ids {
            if nodes.node(node).is_active() {
                if nodes.node(node).block.is_blocked() {
                    checked_blocks += 1;
                    let entry = nodes.node(node);
                    let top_level = entry.block.is_directly_blocked()
                        || entry
                            .parent
                            .is_some_and(|parent| !nodes.node(parent).block.is_blocked());

                    // Signature blocks were proven safe by a found model and are not re-validated.
                    let witness = match entry.block {
                        BlockStatus::Directly(blocker) | BlockStatus::Indirectly(blocker) => {
                            Some(blocker)
                        }
                        BlockStatus::Signature | BlockStatus::Unblocked => None,
                    };

                    if top_level {
                        if let Some(witness) = witness {
                            let changed = self.checker.has_changed_since_validation(Some(node))
                                || self
                                    .checker
                                    .has_changed_since_validation(nodes.node(node).parent)
                                || self.checker.has_changed_since_validation(Some(witness))
                                || self
                                    .checker
                                    .has_changed_since_validation(nodes.node(witness).parent);

                            if changed {
                                let valid = self.revalidate_block(nodes, node)?;
                                if valid.is_none() {
                                    invalid_blocks += 1;
                                    if first_invalid.is_none() {
                                        first_invalid = Some(node);
                                    }
                                }
                                nodes.node_mut(node).block =
                                    valid.map_or(BlockStatus::Unblocked, BlockStatus::Directly);
                            }
                        }
                    }
                }

                self.last_validated_unchanged = Some(node);
                let entry = nodes.node(node);
                if !entry.block.is_blocked() && self.checker.can_be_blocker(nodes, node) {
                    self.cache.add(&self.checker, nodes, node)?;
                }
            }
        }

        for &node in &ids {
            if nodes.node(node).is_active() {
                self.checker.set_changed_since_validation(node, false);
                self.validator.clear_memo(nodes, node);
            }
        }

        // Pre-blocking will be asked to check from the first invalid block onwards, if any.
        self.first_changed = first_invalid;
        log::info!(
            target: targets::VALIDATION,
            "Checked {checked_blocks} blocked nodes of which {invalid_blocks} were invalid"
        );
        counters.checked_blocks += checked_blocks;
        counters.invalid_blocks += invalid_blocks;
        Ok(())
    }

    /// Try candidates for `node` in id order, resuming from the current blocker's position when it is still a member.
    ///
    /// Smaller untouched candidates are never re-tried: unchanged candidates were already proven invalid or are unreachable.
    fn revalidate_block(
        &mut self,
        nodes: &mut NodeDB,
        node: NodeId,
    ) -> Result<Option<NodeId>, err::ErrorKind> {
        let candidates = self.cache.possible_blockers(&self.checker, nodes, node)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let current = match nodes.node(node).block {
            BlockStatus::Directly(blocker) => Some(blocker),
            _ => None,
        };
        let mut index = match current
            .and_then(|blocker| candidates.iter().position(|candidate| *candidate == blocker))
        {
            Some(position) => position,
            None => {
                // A completely fresh candidate is about to be tried.
                self.validator.blocker_changed(nodes, node);
                0
            }
        };

        while index < candidates.len() {
            let candidate = candidates[index];
            nodes.node_mut(node).block = BlockStatus::Directly(candidate);
            if self.validator.is_block_valid(nodes, node) {
                return Ok(Some(candidate));
            }
            self.validator.blocker_changed(nodes, node);
            index += 1;
        }
        Ok(None)
    }

    /*
    Notifications.

    The caller must notify the strategy of every state change, including those caused by backtracking.
    There is no snapshot or rollback: missing notifications silently desynchronize the cache and validator from the model.
    */

    /// Lower the pre-blocking watermark to `node`.
    fn update_node_change(&mut self, node: NodeId) {
        self.first_changed = Some(match self.first_changed {
            None => node,
            Some(first) => first.min(node),
        });
    }

    /// Lower the validation watermark to `node` and flag it changed.
    fn validation_info_changed(&mut self, node: NodeId) {
        if let Some(last) = self.last_validated_unchanged {
            if node < last {
                self.last_validated_unchanged = Some(node);
            }
        }
        self.checker.set_changed_since_validation(node, true);
    }

    /// A concept assertion was added to `node`.
    pub fn concept_assertion_added(&mut self, node: NodeId, concept: Concept, core: bool) {
        if self.checker.concept_assertion_changed(node, concept, core)
            || self.last_validated_unchanged.is_some()
        {
            self.update_node_change(node);
        }
        self.validation_info_changed(node);
    }

    /// A concept assertion was removed from `node`.
    pub fn concept_assertion_removed(&mut self, node: NodeId, concept: Concept, core: bool) {
        if self.checker.concept_assertion_changed(node, concept, core)
            || self.last_validated_unchanged.is_some()
        {
            self.update_node_change(node);
        }
        self.validation_info_changed(node);
    }

    /// An asserted concept at `node` was flagged core.
    pub fn concept_core_set(&mut self, node: NodeId, concept: Concept) {
        if self.checker.concept_assertion_changed(node, concept, true)
            || self.last_validated_unchanged.is_some()
        {
            self.update_node_change(node);
        }
        self.validation_info_changed(node);
    }

    /// A role assertion between `from` and `to` was added or removed.
    pub fn role_assertion_changed(&mut self, _role: Role, from: NodeId, to: NodeId, core: bool) {
        let digest_relevant = self.checker.role_assertion_changed(from, to, core);
        if digest_relevant || self.last_validated_unchanged.is_some() {
            self.update_node_change(from);
            self.update_node_change(to);
        }
        self.validation_info_changed(from);
        self.validation_info_changed(to);
    }

    /// The status of `node` changed (merged, pruned, or restored).
    pub fn node_status_changed(&mut self, node: NodeId) {
        self.update_node_change(node);
    }

    /// A fresh node was created.
    pub fn node_initialized(&mut self, node: NodeId) {
        self.checker.node_initialized(node);
        self.cache.node_initialized(node);
        self.update_node_change(node);
    }

    /// `node` was destroyed.
    ///
    /// Destruction proceeds from the top of the creation order during backtracking, so a changed watermark at or past the node points at nothing live and is cleared outright.
    pub fn node_destroyed(&mut self, node: NodeId) -> Result<(), err::ErrorKind> {
        self.cache.remove(node)?;
        self.checker.node_destroyed(node);
        if self.first_changed.is_some_and(|first| first >= node) {
            self.first_changed = None;
        }
        if self.last_validated_unchanged.is_some_and(|last| node < last) {
            self.last_validated_unchanged = Some(node);
        }
        Ok(())
    }

    /// A complete model was found: harvest the signature of every active, unblocked, blockable node.
    pub fn model_found(&mut self, nodes: &NodeDB) {
        let Some(cache) = self.signature_cache.as_mut() else {
            return;
        };
        // Blocking is settled in a found model, so no status updates are needed.
        debug_assert!(self.first_changed.is_none());
        for node in nodes.ids_from(0) {
            if !nodes.node(node).block.is_blocked() && self.checker.can_be_blocker(nodes, node) {
                cache.add(self.checker.signature(nodes, node));
            }
        }
        log::info!(
            target: targets::BLOCKING,
            "Signature cache holds {} signatures",
            cache.len()
        );
    }
}
