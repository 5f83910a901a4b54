//! Deterministic transaction and block builders.

use bitcoin::{
    absolute::LockTime,
    block::{Header, Version as BlockVersion},
    hashes::Hash,
    key::rand::{rngs::OsRng, RngCore},
    opcodes::all::OP_RETURN,
    script::{Builder, PushBytesBuf},
    transaction, Amount, Block, BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence,
    Transaction, TxIn, TxMerkleNode, TxOut, Txid, Witness,
};

/// Generates a random txid, useful for fabricating unrelated prevouts.
pub fn generate_txid() -> Txid {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    Txid::from_byte_array(bytes)
}

/// A random outpoint spending a transaction that never existed.
pub fn random_outpoint() -> OutPoint {
    OutPoint {
        txid: generate_txid(),
        vout: 0,
    }
}

/// Creates inputs spending the given outpoints, unsigned.
pub fn create_tx_ins(utxos: impl IntoIterator<Item = OutPoint>) -> Vec<TxIn> {
    utxos
        .into_iter()
        .map(|previous_output| TxIn {
            previous_output,
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
            witness: Witness::new(),
        })
        .collect()
}

/// Creates outputs paying the given scripts.
pub fn create_tx_outs(
    scripts_and_amounts: impl IntoIterator<Item = (ScriptBuf, Amount)>,
) -> Vec<TxOut> {
    scripts_and_amounts
        .into_iter()
        .map(|(script_pubkey, value)| TxOut {
            script_pubkey,
            value,
        })
        .collect()
}

/// Assembles a version-2 transaction from parts.
pub fn create_tx(tx_ins: Vec<TxIn>, tx_outs: Vec<TxOut>) -> Transaction {
    Transaction {
        version: transaction::Version(2),
        lock_time: LockTime::ZERO,
        input: tx_ins,
        output: tx_outs,
    }
}

/// An `OP_RETURN` script carrying the given payload.
pub fn op_return_script(data: &[u8]) -> ScriptBuf {
    let mut push_data = PushBytesBuf::new();
    push_data
        .extend_from_slice(data)
        .expect("payload must be within push limits");

    Builder::new()
        .push_opcode(OP_RETURN)
        .push_slice(push_data)
        .into_script()
}

/// A payment of `amount` to `script_pubkey` with no annotation.
pub fn build_payment_tx(script_pubkey: ScriptBuf, amount: Amount) -> Transaction {
    create_tx(
        create_tx_ins([random_outpoint()]),
        create_tx_outs([(script_pubkey, amount)]),
    )
}

/// A payment of `amount` to `script_pubkey` plus an `OP_RETURN` output carrying `annotation`.
pub fn build_annotated_payment_tx(
    script_pubkey: ScriptBuf,
    amount: Amount,
    annotation: &[u8],
) -> Transaction {
    create_tx(
        create_tx_ins([random_outpoint()]),
        create_tx_outs([
            (script_pubkey, amount),
            (op_return_script(annotation), Amount::ZERO),
        ]),
    )
}

/// A block containing the given transactions.
///
/// The header is fabricated: proof of work and the merkle commitment are irrelevant to the code
/// under test, a unique hash per call is all that matters.
pub fn build_block(txdata: Vec<Transaction>) -> Block {
    let mut nonce_bytes = [0u8; 4];
    OsRng.fill_bytes(&mut nonce_bytes);

    Block {
        header: Header {
            version: BlockVersion::TWO,
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time: 0,
            bits: CompactTarget::from_consensus(0x207f_ffff),
            nonce: u32::from_le_bytes(nonce_bytes),
        },
        txdata,
    }
}
