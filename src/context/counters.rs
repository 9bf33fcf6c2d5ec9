/// Counters over the search, roughly grouped by shared concerns.
#[derive(Clone, Debug, Default)]
pub struct Counters {
    /// A count of pre-blocking passes which did some work.
    pub pre_blocking_passes: usize,

    /// A count of full validation passes.
    pub model_validations: usize,

    /// A count of blocked nodes examined during validation passes.
    pub checked_blocks: usize,

    /// A count of blocks found invalid during validation passes.
    pub invalid_blocks: usize,

    /// A count of nodes created.
    pub nodes_created: usize,

    /// A count of nodes destroyed.
    pub nodes_destroyed: usize,

    /// A count of disjunctions interned.
    pub disjunctions_interned: usize,

    /// A count of backtracks recorded against disjuncts.
    pub disjunct_backtracks: usize,
}
