//! Test fixtures shared across the workspace: a federation multisig, deterministic transaction
//! and block builders, and fake chain-index/block-store implementations.

pub mod chain;
pub mod multisig;
pub mod tx;
