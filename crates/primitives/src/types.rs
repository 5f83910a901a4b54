//! Scalar type aliases shared across the workspace.

/// Height of a block on the source chain.
pub type BlockHeight = u64;
