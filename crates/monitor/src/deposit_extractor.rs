//! Extraction of deposit records from validated source-chain blocks.

use std::sync::Arc;

use bitcoin::{Amount, Block, ScriptBuf};
use fedgw_primitives::{
    deposit::Deposit, settings::FederationGatewaySettings, types::BlockHeight,
};
use tracing::{info, trace};

use crate::op_return::OpReturnDataReader;

/// Scans blocks for value sent to the federation's multisig output and annotated with a
/// target-chain destination.
///
/// Pure with respect to shared state: the output is a function of the block, its height and the
/// fixed settings only.
pub struct DepositExtractor {
    multisig_script_pubkey: ScriptBuf,
    op_return_reader: Arc<dyn OpReturnDataReader>,
}

impl std::fmt::Debug for DepositExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositExtractor")
            .field("multisig_script_pubkey", &self.multisig_script_pubkey)
            .field(
                "op_return_reader",
                &format!("{:?}", Arc::as_ptr(&self.op_return_reader)),
            )
            .finish()
    }
}

impl DepositExtractor {
    /// Creates an extractor for the federation described by the settings.
    pub fn new(
        settings: &FederationGatewaySettings,
        op_return_reader: Arc<dyn OpReturnDataReader>,
    ) -> Self {
        Self {
            multisig_script_pubkey: settings.multisig_script_pubkey(),
            op_return_reader,
        }
    }

    /// Extracts the ordered list of deposits contained in the block.
    ///
    /// A transaction yields exactly one deposit when it pays the federation multisig output and
    /// carries a decodable target-chain annotation. A multisig payment without a valid annotation
    /// is deliberately dropped, not queued or errored. Output order matches transaction order
    /// within the block; downstream crediting on the target chain relies on it.
    pub fn extract_deposits_from_block(
        &self,
        block: &Block,
        block_height: BlockHeight,
    ) -> Vec<Deposit> {
        let block_hash = block.block_hash();
        let mut deposits = Vec::new();

        for tx in &block.txdata {
            let amount: Amount = tx
                .output
                .iter()
                .filter(|output| output.script_pubkey == self.multisig_script_pubkey)
                .map(|output| output.value)
                .sum();

            if amount == Amount::ZERO {
                continue;
            }

            let Some(target_address) = self.op_return_reader.try_get_target_address(tx) else {
                trace!(txid=%tx.compute_txid(), "multisig payment without target annotation, skipping");
                continue;
            };

            let txid = tx.compute_txid();
            info!(%txid, %amount, %target_address, block_height, "found deposit");

            deposits.push(Deposit::new(
                txid,
                amount,
                target_address,
                block_height,
                block_hash,
            ));
        }

        deposits
    }
}
