/*!
Configuration of a context.

Primary configuration is per context.
Some structures are built from parts of the configuration --- notably the blocker equivalence cache sizes its table from a [BlockersCacheConfig].
*/

/// Which block validator to use.
///
/// Selected once, when a context is created.
/// Both variants must agree on every valid input --- the choice is operational, not semantic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidatorVariant {
    /// Evaluate pre-compiled permitted label-combination conditions against the blocker/blocked pattern.
    #[default]
    Constraints,

    /// Ask whether any concept-inclusion clause could fire on the blocked copy without equally firing on the blocker.
    Rules,
}

/// Configuration for the blocker equivalence cache.
#[derive(Clone)]
pub struct BlockersCacheConfig {
    /// The initial number of buckets.
    ///
    /// Rounded up to a power of two, as bucket indicies are obtained by masking a mixed digest.
    pub initial_buckets: usize,

    /// Occupancy (in percent of buckets) at which the table doubles.
    pub load_factor_percent: usize,
}

impl Default for BlockersCacheConfig {
    fn default() -> Self {
        BlockersCacheConfig {
            initial_buckets: 1024,
            load_factor_percent: 75,
        }
    }
}

/// The primary configuration structure.
#[derive(Clone)]
pub struct Config {
    /// Configuration of the blocker equivalence cache.
    pub cache: BlockersCacheConfig,

    /// Which block validator to use.
    pub validator: ValidatorVariant,

    /// Restrict blocking-relevant labels to the singleton core.
    ///
    /// With the singleton core every bound variable of a clause is discardable, and premise matching during validation is limited to core concepts.
    pub singleton_core: bool,

    /// Whether the ontology uses inverse roles.
    ///
    /// Without inverses, conditions on the edge from a blocked node back to its parent are vacuous.
    pub has_inverses: bool,

    /// Keep a persistent cache of blocking signatures proven safe in a found model.
    ///
    /// The signature cache survives [clear](crate::context::GenericContext::clear), as it is shared across independent search branches.
    pub use_signature_cache: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cache: BlockersCacheConfig::default(),
            validator: ValidatorVariant::default(),
            singleton_core: false,
            has_inverses: true,
            use_signature_cache: false,
        }
    }
}
