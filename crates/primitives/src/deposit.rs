//! Provides the record type for value moving into the federation multisig.

use bitcoin::{Amount, BlockHash, Txid};
use serde::{Deserialize, Serialize};

use crate::types::BlockHeight;

/// An immutable record of a value transfer observed on the source chain that is destined for the
/// target chain.
///
/// A deposit only ever exists for a transaction that pays the federation's multisig output *and*
/// carries a decodable target-chain address annotation. The deposit extractor is the only producer
/// of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// The source-chain transaction id this deposit was extracted from.
    id: Txid,

    /// The total value paid to the federation multisig output by the transaction.
    amount: Amount,

    /// The destination address on the target chain, decoded from the transaction's embedded
    /// annotation.
    target_address: String,

    /// The height of the block that contains the deposit transaction.
    block_height: BlockHeight,

    /// The hash of the block that contains the deposit transaction.
    block_hash: BlockHash,
}

impl Deposit {
    /// Creates a new deposit record with full provenance.
    pub fn new(
        id: Txid,
        amount: Amount,
        target_address: String,
        block_height: BlockHeight,
        block_hash: BlockHash,
    ) -> Self {
        Self {
            id,
            amount,
            target_address,
            block_height,
            block_hash,
        }
    }

    /// Get the source-chain transaction id.
    pub fn id(&self) -> Txid {
        self.id
    }

    /// Get the deposited amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Get the destination address on the target chain.
    pub fn target_address(&self) -> &str {
        &self.target_address
    }

    /// Get the height of the containing block.
    pub fn block_height(&self) -> BlockHeight {
        self.block_height
    }

    /// Get the hash of the containing block.
    pub fn block_hash(&self) -> BlockHash {
        self.block_hash
    }
}
