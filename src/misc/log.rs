/*!
Miscelanous items related to [logging](log).

Calls to the log macro are made throughout the library.
These are intended to provide useful information for extending the library and/or fixing issues.

Note, no log implementation is provided.
For more details, see [log].
*/

/// Targets to be used within a [log]! macro.
pub mod targets {
    /// Logs related to the [blocker equivalence cache](crate::db::blockers).
    pub const CACHE: &str = "cache";

    /// Logs related to [pre-blocking](crate::blocking::strategy).
    pub const BLOCKING: &str = "blocking";

    /// Logs related to [block validation](crate::blocking::validator).
    pub const VALIDATION: &str = "validation";

    /// Logs related to [disjunct ordering](crate::structures::disjunction).
    pub const DISJUNCTION: &str = "disjunction";

    /// Logs related to the [node database](crate::db::node).
    pub const NODE_DB: &str = "node_db";
}
