//! This crate implements the block-observation core of the federation gateway: it watches the
//! source chain for value locked into the federation's multisig, converts matured lock
//! transactions into cross-chain deposit records, and keeps the downstream consumers (wallet
//! sync, withdrawal receiver, block-tip and matured-block senders) current, one block at a time.

// Used by the integration tests under `tests/`, not by the unit-test build of this library;
// keep the dev-dependency recognized under `deny(unused_crate_dependencies)`.
#[cfg(test)]
use fedgw_common as _;

pub mod block_observer;
pub mod broadcast;
pub mod deposit_extractor;
pub mod errors;
pub mod matured_blocks;
pub mod op_return;
pub mod sinks;
