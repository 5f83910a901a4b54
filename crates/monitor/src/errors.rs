//! Error types for the block-observation core.

use std::time::Duration;

use bitcoin::BlockHash;
use fedgw_primitives::types::BlockHeight;
use thiserror::Error;

/// Opaque error carried across a sink boundary.
pub type SinkErr = Box<dyn std::error::Error + Send + Sync>;

/// Fatal conditions hit while assembling a matured deposit batch.
///
/// Every variant here means the chain index and the block store disagree about history that is
/// already buried under the confirmation threshold. Skipping would permanently lose a deposit, so
/// these are surfaced, never swallowed.
#[derive(Debug, Error)]
pub enum MaturedBlocksErr {
    /// The chain index has no header at a height inside the matured range.
    #[error("chain index has no header at height {0}")]
    MissingHeader(BlockHeight),

    /// The block store has no block for a header the chain index reported.
    #[error("block store has no block {hash} for height {height}")]
    MissingBlock {
        /// The height the chain index reported the header at.
        height: BlockHeight,
        /// The hash of the missing block.
        hash: BlockHash,
    },

    /// The block store failed to answer at all, e.g. an undecodable block on disk.
    #[error("block store lookup failed: {0}")]
    Store(#[source] SinkErr),
}

/// Unified error type for a single block-processing pass of the observer.
///
/// Any of these aborts the remaining steps for the current block; the subscription driver logs it
/// and resumes with the next block.
#[derive(Debug, Error)]
pub enum ObserverErr {
    /// The wallet sync manager rejected the block.
    #[error("wallet sync failed: {0}")]
    WalletSync(#[source] SinkErr),

    /// The withdrawal receiver could not take the extracted withdrawals.
    #[error("withdrawal receiver failed: {0}")]
    WithdrawalReceiver(#[source] SinkErr),

    /// The block tip notification could not be delivered.
    #[error("block tip send failed: {0}")]
    BlockTipSend(#[source] SinkErr),

    /// The matured deposit batch could not be delivered.
    #[error("matured block send failed: {0}")]
    MaturedBlockSend(#[source] SinkErr),

    /// A cross-node sink did not answer within the configured bound.
    #[error("{sink} send timed out after {timeout:?}")]
    SinkTimeout {
        /// Which sink timed out.
        sink: &'static str,
        /// The configured bound that elapsed.
        timeout: Duration,
    },

    /// Assembling the matured deposit batch failed.
    #[error("matured blocks retrieval failed: {0}")]
    MaturedBlocks(#[from] MaturedBlocksErr),
}

/// Errors from the transaction broadcast tracker.
#[derive(Debug, Error)]
pub enum BroadcastErr {
    /// Fanning the transaction out to the connected peers failed.
    #[error("peer fan-out failed: {0}")]
    PeerFanout(#[source] SinkErr),
}
