//! Error types used in the library.
//!
//! - Most of these are very unlikely to occur during use.
//! - The cache errors indicate a breach of the notification contract by the caller --- a mutation to the node graph was made without telling the blocking strategy.
//!   These are never tolerated, as masking them would corrupt later blocking decisions.
//! - A node with no valid blocker after validation is *not* an error.
//!   It is an expected control state, recorded in the changed watermark and handled by the next pre-blocking pass.
//!
//! Names of the error enums --- for the most part --- overlap with corresponding structs.
//  As such, throughout the library err::{self} is often used to prefix use of the types with `err::`.

use crate::structures::node::NodeId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    BlockersCache(BlockersCacheError),
    NodeDB(NodeDBError),
}

/// Noted errors in the blocker equivalence cache.
///
/// Each of these indicates missing or out-of-order notifications from the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlockersCacheError {
    /// A node was added to the cache while already a member of some entry.
    AlreadyPresent(NodeId),

    /// The cargo of a node pointed to an entry the node is not a member of.
    MissingEntry(NodeId),

    /// An entry recorded by a cargo slot was not linked into its bucket chain.
    CorruptChain,

    /// A node was appended to an entry containing some node with an id at least as large.
    OrderViolation(NodeId),

    /// A node was found among its own candidate blockers.
    SelfCandidate(NodeId),

    /// A cache member failed the sanity check (inactive, blocked, merged, or pruned).
    UnsoundMember(NodeId),
}

impl From<BlockersCacheError> for ErrorKind {
    fn from(e: BlockersCacheError) -> Self {
        ErrorKind::BlockersCache(e)
    }
}

/// Noted errors in the node database.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NodeDBError {
    /// There are no more fresh node ids.
    NodesExhausted,

    /// A parent was named which is not in the database.
    MissingParent,
}

impl From<NodeDBError> for ErrorKind {
    fn from(e: NodeDBError) -> Self {
        ErrorKind::NodeDB(e)
    }
}
