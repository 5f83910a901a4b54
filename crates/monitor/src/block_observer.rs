//! This module implements the top level [`BlockObserver`]. It reacts to each newly connected
//! source-chain block, keeps the chain-local consumers current unconditionally, and releases
//! matured deposit batches once the confirmation gate opens.

use std::sync::Arc;

use chain_notify::subscription::Subscription;
use fedgw_primitives::{
    block::ChainedBlock, settings::FederationGatewaySettings, types::BlockHeight,
};
use futures::StreamExt;
use tokio::{task::JoinHandle, time};
use tracing::{error, info, trace};

use crate::{
    errors::ObserverErr,
    matured_blocks::{ChainIndex, MaturedBlocksProvider},
    sinks::{
        BlockTipSender, MaturedBlockSender, WalletSyncSink, WithdrawalExtractor,
        WithdrawalReceiver,
    },
};

/// Orchestrates one processing pass per newly connected block.
///
/// The fixed step order matters: wallet sync and withdrawal visibility are chain-local concerns
/// that must stay current even for unconfirmed blocks, while deposit crediting triggers minting
/// on the target chain and is therefore held behind the confirmation buffer.
pub struct BlockObserver {
    chain: Arc<dyn ChainIndex>,
    settings: FederationGatewaySettings,
    wallet_sync: Arc<dyn WalletSyncSink>,
    withdrawal_extractor: Arc<dyn WithdrawalExtractor>,
    withdrawal_receiver: Arc<dyn WithdrawalReceiver>,
    block_tip_sender: Arc<dyn BlockTipSender>,
    matured_block_sender: Arc<dyn MaturedBlockSender>,
    matured_blocks: MaturedBlocksProvider,
    next_matured_height: BlockHeight,
}

impl std::fmt::Debug for BlockObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockObserver")
            .field("settings", &self.settings)
            .field("matured_blocks", &self.matured_blocks)
            .field("next_matured_height", &self.next_matured_height)
            .finish_non_exhaustive()
    }
}

impl BlockObserver {
    /// Wires the observer up with its collaborators.
    ///
    /// `start_height` seeds the maturity watermark: the first height whose deposits have not yet
    /// been delivered to the counterpart chain. On restart the operator seeds this from the last
    /// height the counterpart acknowledged; re-scanning already-sent heights is safe because
    /// matured-block delivery is at-least-once.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        chain: Arc<dyn ChainIndex>,
        settings: FederationGatewaySettings,
        wallet_sync: Arc<dyn WalletSyncSink>,
        withdrawal_extractor: Arc<dyn WithdrawalExtractor>,
        withdrawal_receiver: Arc<dyn WithdrawalReceiver>,
        block_tip_sender: Arc<dyn BlockTipSender>,
        matured_block_sender: Arc<dyn MaturedBlockSender>,
        matured_blocks: MaturedBlocksProvider,
        start_height: BlockHeight,
    ) -> Self {
        Self {
            chain,
            settings,
            wallet_sync,
            withdrawal_extractor,
            withdrawal_receiver,
            block_tip_sender,
            matured_block_sender,
            matured_blocks,
            next_matured_height: start_height,
        }
    }

    /// Processes one newly connected block, in fixed order:
    ///
    /// 1. forward the raw block to wallet sync;
    /// 2. extract withdrawals and hand them (even an empty list) to the withdrawal receiver;
    /// 3. announce the new block tip;
    /// 4. stop if the block has fewer confirmations than required for deposits;
    /// 5. otherwise collect the newly matured deposit batch and dispatch it if non-empty.
    ///
    /// Any error aborts the remaining steps for this block and propagates to the subscription
    /// driver; there is no internal retry.
    pub async fn on_new_block(&mut self, chained: ChainedBlock) -> Result<(), ObserverErr> {
        self.wallet_sync
            .process_block(&chained.block)
            .await
            .map_err(ObserverErr::WalletSync)?;

        let withdrawals = self
            .withdrawal_extractor
            .extract_withdrawals_from_block(&chained.block, chained.height);
        self.withdrawal_receiver
            .receive_withdrawals(&withdrawals)
            .await
            .map_err(ObserverErr::WithdrawalReceiver)?;

        let timeout = self.settings.sink_timeout();
        time::timeout(timeout, self.block_tip_sender.send_block_tip(&chained.header()))
            .await
            .map_err(|_| ObserverErr::SinkTimeout {
                sink: "block tip",
                timeout,
            })?
            .map_err(ObserverErr::BlockTipSend)?;

        let confirmations = chained.confirmations(self.chain.tip_height());
        if confirmations < self.settings.minimum_deposit_confirmations() {
            trace!(
                block_hash=%chained.hash,
                confirmations,
                "block below deposit confirmation threshold"
            );
            return Ok(());
        }

        let Some(batch) = self.matured_blocks.retrieve_deposits(self.next_matured_height)? else {
            return Ok(());
        };

        if !batch.deposits.is_empty() {
            info!(
                count = batch.deposits.len(),
                matured_to = batch.matured_to,
                "dispatching matured deposit batch"
            );
            time::timeout(
                timeout,
                self.matured_block_sender
                    .send_matured_block_deposits(&batch.deposits),
            )
            .await
            .map_err(|_| ObserverErr::SinkTimeout {
                sink: "matured block",
                timeout,
            })?
            .map_err(ObserverErr::MaturedBlockSend)?;
        }

        // Advance the watermark only after the batch is safely out the door. Advancing across an
        // empty batch loses nothing: those heights held no deposits.
        self.next_matured_height = batch.matured_to + 1;

        Ok(())
    }

    /// Spawns the sequential subscription driver.
    ///
    /// Blocks are processed strictly one at a time, in delivery order. A failed pass is logged
    /// and the driver moves on to the next block; the failed block's matured batch, if any, is
    /// reattempted on a later pass via the watermark.
    pub fn spawn(mut self, mut blocks: Subscription<ChainedBlock>) -> BlockObserverHandle {
        let thread_handle = tokio::task::spawn(async move {
            while let Some(chained) = blocks.next().await {
                let block_hash = chained.hash;
                if let Err(err) = self.on_new_block(chained).await {
                    error!(%block_hash, %err, "failed to process block");
                }
            }
        });

        BlockObserverHandle { thread_handle }
    }
}

/// Handle to a running observer loop.
///
/// Dropping the handle aborts the loop.
#[derive(Debug)]
pub struct BlockObserverHandle {
    thread_handle: JoinHandle<()>,
}

impl Drop for BlockObserverHandle {
    fn drop(&mut self) {
        self.thread_handle.abort();
    }
}
