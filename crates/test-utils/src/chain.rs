//! An in-memory source chain for tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use bitcoin::{Block, BlockHash};
use fedgw_monitor::{
    errors::SinkErr,
    matured_blocks::{BlockStore, ChainIndex},
};
use fedgw_primitives::{
    block::{ChainedBlock, ChainedHeader},
    types::BlockHeight,
};

use crate::tx::build_block;

/// A fake best chain backed by plain maps.
///
/// Serves both as the header index and as the block store, so a single instance can be handed
/// to everything that walks the chain. Headers can exist without a stored block to exercise
/// the missing-block path.
#[derive(Debug, Default)]
pub struct FakeChain {
    headers: RwLock<BTreeMap<BlockHeight, ChainedHeader>>,
    blocks: RwLock<HashMap<BlockHash, Block>>,
}

impl FakeChain {
    /// An empty chain with no tip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `block` at `height`, returning its chained form.
    pub fn add_block(&self, block: Block, height: BlockHeight) -> ChainedBlock {
        let chained = ChainedBlock::new(block.clone(), height);
        self.headers
            .write()
            .unwrap()
            .insert(height, chained.header());
        self.blocks.write().unwrap().insert(chained.hash, block);
        chained
    }

    /// Fills every unoccupied height up to and including `to_height` with an empty block.
    ///
    /// Heights that already hold a block are left untouched, so deposits planted earlier
    /// stay in place while the tip advances.
    pub fn extend_with_empty_blocks(&self, to_height: BlockHeight) {
        for height in 0..=to_height {
            if self.headers.read().unwrap().contains_key(&height) {
                continue;
            }
            self.add_block(build_block(vec![]), height);
        }
    }

    /// Records a header at `height` with no block body behind it.
    pub fn add_header_without_block(&self, height: BlockHeight) {
        let chained = ChainedBlock::new(build_block(vec![]), height);
        self.headers
            .write()
            .unwrap()
            .insert(height, chained.header());
    }

    /// The chained block recorded at `height`.
    ///
    /// # Panics
    ///
    /// Panics if no block was recorded at that height.
    pub fn chained_block_at(&self, height: BlockHeight) -> ChainedBlock {
        let header = self.headers.read().unwrap()[&height];
        let block = self.blocks.read().unwrap()[&header.hash].clone();
        ChainedBlock::new(block, height)
    }
}

impl ChainIndex for FakeChain {
    fn tip_height(&self) -> BlockHeight {
        self.headers
            .read()
            .unwrap()
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
    }

    fn header_at(&self, height: BlockHeight) -> Option<ChainedHeader> {
        self.headers.read().unwrap().get(&height).copied()
    }
}

impl BlockStore for FakeChain {
    fn block_at(&self, hash: &BlockHash) -> Result<Option<Block>, SinkErr> {
        Ok(self.blocks.read().unwrap().get(hash).cloned())
    }
}
