//! Items which do not belong to any specific module.

pub mod log;
