//! Provides the record type for value leaving the federation multisig.

use bitcoin::{Amount, BlockHash, Txid};
use serde::{Deserialize, Serialize};

use crate::types::BlockHeight;

/// An immutable record of value moving out of the federation's multisig back toward a recipient on
/// the source chain.
///
/// This is the symmetric counterpart of [`crate::deposit::Deposit`]. The policy that decides which
/// transactions qualify as withdrawals lives behind the withdrawal extractor seam; this crate only
/// carries the record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    /// The source-chain transaction id this withdrawal was extracted from.
    id: Txid,

    /// The value released from the multisig.
    amount: Amount,

    /// The recipient address on the source chain.
    recipient: String,

    /// The height of the block that contains the withdrawal transaction.
    block_height: BlockHeight,

    /// The hash of the block that contains the withdrawal transaction.
    block_hash: BlockHash,
}

impl Withdrawal {
    /// Creates a new withdrawal record with full provenance.
    pub fn new(
        id: Txid,
        amount: Amount,
        recipient: String,
        block_height: BlockHeight,
        block_hash: BlockHash,
    ) -> Self {
        Self {
            id,
            amount,
            recipient,
            block_height,
            block_hash,
        }
    }

    /// Get the source-chain transaction id.
    pub fn id(&self) -> Txid {
        self.id
    }

    /// Get the released amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Get the recipient address on the source chain.
    pub fn recipient(&self) -> &str {
        &self.recipient
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
