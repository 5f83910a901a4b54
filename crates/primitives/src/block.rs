//! Blocks paired with their position in the chain index.

use bitcoin::{Block, BlockHash};

use crate::types::BlockHeight;

/// A block header's position in the chain index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainedHeader {
    /// Height of the header on the source chain.
    pub height: BlockHeight,

    /// Hash of the block the header belongs to.
    pub hash: BlockHash,
}

/// A fully materialized block paired with its position in the chain index.
///
/// Confirmation depth is deliberately not stored here: the tip moves, so depth is recomputed at
/// observation time via [`ChainedBlock::confirmations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedBlock {
    /// The block itself, with its ordered transaction list.
    pub block: Block,

    /// Height of the block on the source chain.
    pub height: BlockHeight,

    /// Hash of the block.
    pub hash: BlockHash,
}

impl ChainedBlock {
    /// Pairs a block with its height, computing the block hash once.
    pub fn new(block: Block, height: BlockHeight) -> Self {
        let hash = block.block_hash();
        Self {
            block,
            height,
            hash,
        }
    }

    /// The chained header for this block.
    pub fn header(&self) -> ChainedHeader {
        ChainedHeader {
            height: self.height,
            hash: self.hash,
        }
    }

    /// Number of confirmations this block has at the given tip height.
    ///
    /// The block itself counts as one confirmation. Returns 0 if the block sits beyond the given
    /// tip, which only happens when the tip was read before this block was connected.
    pub fn confirmations(&self, tip_height: BlockHeight) -> u64 {
        match tip_height.checked_sub(self.height) {
            Some(depth) => depth + 1,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        block::{Header, Version},
        hashes::Hash,
        CompactTarget, TxMerkleNode,
    };

    use super::*;

    fn empty_block() -> Block {
        Block {
            header: Header {
                version: Version::TWO,
                prev_blockhash: BlockHash::all_zeros(),
                merkle_root: TxMerkleNode::all_zeros(),
                time: 0,
                bits: CompactTarget::from_consensus(0x207f_ffff),
                nonce: 0,
            },
            txdata: vec![],
        }
    }

    #[test]
    fn confirmations_count_the_block_itself() {
        let chained = ChainedBlock::new(empty_block(), 90);

        assert_eq!(chained.confirmations(90), 1);
        assert_eq!(chained.confirmations(99), 10);
    }

    #[test]
    fn confirmations_are_zero_beyond_the_tip() {
        let chained = ChainedBlock::new(empty_block(), 100);

        assert_eq!(chained.confirmations(99), 0);
    }

    #[test]
    fn header_carries_the_block_hash() {
        let block = empty_block();
        let hash = block.block_hash();
        let chained = ChainedBlock::new(block, 7);

        assert_eq!(chained.header(), ChainedHeader { height: 7, hash });
    }
}
