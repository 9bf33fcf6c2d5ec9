/*!
The blocking signature cache: signatures proven safe in a found model.

When a complete model is found, every active, unblocked, blockable node witnessed its own obligations.
Its blocking signature is therefore safe to block by in any sibling search branch, without re-deriving the witness.

The cache persists across independent branches --- it is not part of per-branch state and is not reset by [clear](crate::context::GenericContext::clear).
*/

use std::collections::HashSet;

use crate::structures::concept::Concept;

/// A set of blocking signatures proven safe in a found model.
#[derive(Default)]
pub struct BlockingSignatureCache {
    signatures: HashSet<Box<[Concept]>>,
}

impl BlockingSignatureCache {
    /// A count of stored signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether no signature has been stored.
    ///
    /// Pre-blocking skips the signature check entirely while the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Whether the signature is stored.
    pub fn contains(&self, signature: &[Concept]) -> bool {
        self.signatures.contains(signature)
    }

    /// Store a signature.
    /// Returns false if the signature was already present.
    pub fn add(&mut self, signature: Box<[Concept]>) -> bool {
        self.signatures.insert(signature)
    }
}
