//! This module contains the [`BlockFeed`] publisher that fans new chained blocks out to
//! subscribers.

use std::sync::Arc;

use fedgw_primitives::block::ChainedBlock;
use tokio::sync::{mpsc, Mutex};
use tracing::trace;

use crate::subscription::Subscription;

/// Publisher for newly connected source-chain blocks.
///
/// The block-notification feed of the underlying full node hands each accepted block to
/// [`BlockFeed::publish`] exactly once, already paired with its chain position. Each subscriber
/// receives every block published after it subscribed, in publish order. Subscribers whose
/// receiving half has been dropped are pruned on the next publish.
#[derive(Debug, Clone, Default)]
pub struct BlockFeed {
    subs: Arc<Mutex<Vec<mpsc::UnboundedSender<ChainedBlock>>>>,
}

impl BlockFeed {
    /// Creates a feed with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new [`Subscription`] that emits every [`ChainedBlock`] published after this call.
    pub async fn subscribe(&self) -> Subscription<ChainedBlock> {
        let (send, recv) = mpsc::unbounded_channel();

        trace!("subscribing to chained blocks");

        self.subs.lock().await.push(send);

        Subscription::from_receiver(recv)
    }

    /// Delivers a newly connected block to all live subscribers.
    ///
    /// A send failure means the receiver has been dropped; such subscribers are removed.
    pub async fn publish(&self, block: ChainedBlock) {
        trace!(block_hash=%block.hash, height=block.height, "publishing chained block");

        self.subs
            .lock()
            .await
            .retain(|sub| sub.send(block.clone()).is_ok());
    }

    /// Returns the number of active subscriptions created with [`BlockFeed::subscribe`].
    pub async fn num_subscriptions(&self) -> usize {
        self.subs.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        block::{Header, Version},
        hashes::Hash,
        Block, BlockHash, CompactTarget, TxMerkleNode,
    };
    use futures::StreamExt;

    use super::*;

    fn block_at(height: u64) -> ChainedBlock {
        let block = Block {
            header: Header {
                version: Version::TWO,
                prev_blockhash: BlockHash::all_zeros(),
                merkle_root: TxMerkleNode::all_zeros(),
                time: 0,
                bits: CompactTarget::from_consensus(0x207f_ffff),
                // Distinct nonce per height so fabricated blocks hash differently.
                nonce: height as u32,
            },
            txdata: vec![],
        };
        ChainedBlock::new(block, height)
    }

    #[tokio::test]
    async fn subscribers_see_blocks_in_publish_order() {
        let feed = BlockFeed::new();

        let mut first = feed.subscribe().await;
        let mut second = feed.subscribe().await;

        feed.publish(block_at(1)).await;
        feed.publish(block_at(2)).await;

        assert_eq!(first.next().await.map(|b| b.height), Some(1));
        assert_eq!(first.next().await.map(|b| b.height), Some(2));
        assert_eq!(second.next().await.map(|b| b.height), Some(1));
        assert_eq!(second.next().await.map(|b| b.height), Some(2));
    }

    #[tokio::test]
    async fn dropped_subscriptions_pruned_on_publish() {
        let feed = BlockFeed::new();

        let sub = feed.subscribe().await;
        assert_eq!(feed.num_subscriptions().await, 1);

        drop(sub);

        // Still registered until the next publish observes the closed channel.
        assert_eq!(feed.num_subscriptions().await, 1);

        feed.publish(block_at(1)).await;
        assert_eq!(feed.num_subscriptions().await, 0);
    }

    #[tokio::test]
    async fn late_subscribers_miss_earlier_blocks() {
        let feed = BlockFeed::new();

        feed.publish(block_at(1)).await;

        let mut sub = feed.subscribe().await;
        feed.publish(block_at(2)).await;

        assert_eq!(sub.next().await.map(|b| b.height), Some(2));
    }
}
