//! Generic structures, not tied to the domain.

pub mod chained;
