//! Maturity gating: deciding which historical blocks are old enough to act upon, and collecting
//! their deposits.

use std::sync::Arc;

use bitcoin::{Block, BlockHash};
use fedgw_primitives::{
    block::ChainedHeader, deposit::Deposit, settings::FederationGatewaySettings,
    types::BlockHeight,
};
use tracing::trace;

use crate::{
    deposit_extractor::DepositExtractor,
    errors::{MaturedBlocksErr, SinkErr},
};

/// Read-only view of the best chain's header sequence.
///
/// Shared with other subsystems; the tip may advance between reads. Callers must never act on a
/// height beyond what they explicitly fetched.
pub trait ChainIndex: Send + Sync {
    /// The height of the current tip.
    fn tip_height(&self) -> BlockHeight;

    /// The header at the given height on the best chain, if the chain is that long.
    fn header_at(&self, height: BlockHeight) -> Option<ChainedHeader>;
}

/// Read-only access to fully materialized blocks.
pub trait BlockStore: Send + Sync {
    /// Looks a block up by hash. `Ok(None)` means the store has no such block; an `Err` means the
    /// lookup itself failed, e.g. the stored bytes would not decode.
    fn block_at(&self, hash: &BlockHash) -> Result<Option<Block>, SinkErr>;
}

/// Deposits drawn from every block that newly crossed the maturity threshold.
#[derive(Debug, Clone)]
pub struct MaturedBatch {
    /// The concatenated deposits, ordered by height and, within a block, by transaction order.
    pub deposits: Vec<Deposit>,

    /// The highest height included in this batch. Heights above it were not yet mature.
    pub matured_to: BlockHeight,
}

/// Determines which historical blocks have reached the configured confirmation depth and packages
/// their deposits into batches.
///
/// Stateless per call: the caller owns the watermark of heights already handled and passes the
/// next starting height explicitly. Repeated scans over the same range are safe because
/// extraction has no side effects.
pub struct MaturedBlocksProvider {
    chain: Arc<dyn ChainIndex>,
    store: Arc<dyn BlockStore>,
    extractor: DepositExtractor,
    minimum_deposit_confirmations: u64,
}

impl std::fmt::Debug for MaturedBlocksProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaturedBlocksProvider")
            .field("chain", &format!("{:?}", Arc::as_ptr(&self.chain)))
            .field("store", &format!("{:?}", Arc::as_ptr(&self.store)))
            .field("extractor", &self.extractor)
            .field(
                "minimum_deposit_confirmations",
                &self.minimum_deposit_confirmations,
            )
            .finish()
    }
}

impl MaturedBlocksProvider {
    /// Creates a provider over the given chain index and block store.
    pub fn new(
        chain: Arc<dyn ChainIndex>,
        store: Arc<dyn BlockStore>,
        extractor: DepositExtractor,
        settings: &FederationGatewaySettings,
    ) -> Self {
        Self {
            chain,
            store,
            extractor,
            // A block can never have fewer than 1 confirmation, so a configured 0 would put
            // `matured_to` past the tip. Floor it at 1.
            minimum_deposit_confirmations: settings.minimum_deposit_confirmations().max(1),
        }
    }

    /// Collects the deposits of every mature block at height `from` or above.
    ///
    /// A block at height `h` is mature when `tip - h + 1 >= minimum_deposit_confirmations`. The
    /// depth gate is checked per height before the block is loaded and scanned, so blocks that
    /// might still be reorganized away are never extracted from.
    ///
    /// Returns `Ok(None)` when no height at or above `from` is mature yet. A header or block
    /// missing inside the mature range is fatal: silently skipping it would permanently lose a
    /// deposit.
    pub fn retrieve_deposits(
        &self,
        from: BlockHeight,
    ) -> Result<Option<MaturedBatch>, MaturedBlocksErr> {
        let tip = self.chain.tip_height();
        let Some(matured_to) = tip
            .saturating_add(1)
            .checked_sub(self.minimum_deposit_confirmations)
        else {
            return Ok(None);
        };

        if matured_to < from {
            trace!(tip, from, matured_to, "no newly matured heights");
            return Ok(None);
        }

        let mut deposits = Vec::new();
        for height in from..=matured_to {
            let header = self
                .chain
                .header_at(height)
                .ok_or(MaturedBlocksErr::MissingHeader(height))?;
            let block = self
                .store
                .block_at(&header.hash)
                .map_err(MaturedBlocksErr::Store)?
                .ok_or(MaturedBlocksErr::MissingBlock {
                    height,
                    hash: header.hash,
                })?;

            deposits.extend(self.extractor.extract_deposits_from_block(&block, height));
        }

        trace!(from, matured_to, count = deposits.len(), "collected matured deposits");

        Ok(Some(MaturedBatch {
            deposits,
            matured_to,
        }))
    }
}
