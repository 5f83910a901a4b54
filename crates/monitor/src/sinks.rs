//! Trait seams for the external collaborators the block observer drives.
//!
//! Each of these is constructor-injected into the observer and independently fakeable in tests.
//! The async ones may be backed by blocking I/O, e.g. network sends to the federation's
//! counterpart service.

use async_trait::async_trait;
use bitcoin::Block;
use fedgw_primitives::{
    block::ChainedHeader, deposit::Deposit, types::BlockHeight, withdrawal::Withdrawal,
};

use crate::errors::SinkErr;

/// The wallet subsystem that tracks the federation's own UTXOs.
///
/// Receives every block unconditionally so balances reflect the best chain immediately, even for
/// unconfirmed blocks.
#[async_trait]
pub trait WalletSyncSink: Send + Sync {
    /// Feeds one raw block to the wallet bookkeeping.
    async fn process_block(&self, block: &Block) -> Result<(), SinkErr>;
}

/// Policy that recognizes value leaving the multisig toward the source chain.
///
/// The extraction logic itself is peripheral to this core; only the contract matters here.
pub trait WithdrawalExtractor: Send + Sync {
    /// Produces the (possibly empty) ordered list of withdrawals contained in the block.
    fn extract_withdrawals_from_block(
        &self,
        block: &Block,
        block_height: BlockHeight,
    ) -> Vec<Withdrawal>;
}

/// Consumer of extracted withdrawals.
#[async_trait]
pub trait WithdrawalReceiver: Send + Sync {
    /// Takes the withdrawals of one block. Invoked even when the list is empty so the receiver
    /// can observe "no withdrawals this block".
    async fn receive_withdrawals(&self, withdrawals: &[Withdrawal]) -> Result<(), SinkErr>;
}

/// Cross-node notification of the observer's current block tip.
#[async_trait]
pub trait BlockTipSender: Send + Sync {
    /// Announces the newly observed tip to the federation's counterpart service.
    async fn send_block_tip(&self, tip: &ChainedHeader) -> Result<(), SinkErr>;
}

/// Cross-node delivery of a matured deposit batch.
///
/// Delivery semantics are at-least-once: a batch whose send fails is reattempted on a later pass,
/// and the receiving side must tolerate duplicates.
#[async_trait]
pub trait MaturedBlockSender: Send + Sync {
    /// Dispatches one non-empty batch of matured deposits.
    async fn send_matured_block_deposits(&self, deposits: &[Deposit]) -> Result<(), SinkErr>;
}
