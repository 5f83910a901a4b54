//! Decoding of the target-chain address annotation embedded in deposit transactions.

use bitcoin::{opcodes::all::OP_RETURN, script::Instruction, Script, Transaction};

/// Capability to read a target-chain destination address out of a transaction's embedded
/// metadata.
///
/// Injected into the deposit extractor so tests can substitute a fake.
pub trait OpReturnDataReader: Send + Sync {
    /// Attempts to decode a target-chain address from the transaction.
    ///
    /// `None` means the transaction carries no usable annotation. This deliberately covers both
    /// "no OP_RETURN output" and "malformed payload": either way the transaction is simply not a
    /// deposit.
    fn try_get_target_address(&self, tx: &Transaction) -> Option<String>;
}

/// Reads the target address from the first `OP_RETURN` output whose payload is valid UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpReturnAddressReader;

fn op_return_payload(script: &Script) -> Option<&[u8]> {
    let mut instructions = script.instructions();
    match (instructions.next(), instructions.next()) {
        (Some(Ok(Instruction::Op(OP_RETURN))), Some(Ok(Instruction::PushBytes(bytes)))) => {
            Some(bytes.as_bytes())
        }
        _ => None,
    }
}

impl OpReturnDataReader for OpReturnAddressReader {
    fn try_get_target_address(&self, tx: &Transaction) -> Option<String> {
        let payload = tx
            .output
            .iter()
            .find_map(|output| op_return_payload(&output.script_pubkey))?;

        let address = std::str::from_utf8(payload).ok()?;
        if address.is_empty() {
            return None;
        }

        Some(address.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{absolute::LockTime, transaction, Amount, ScriptBuf, Transaction, TxOut};
    use fedgw_test_utils::tx::op_return_script;

    use super::*;

    fn tx_with_outputs(outputs: Vec<TxOut>) -> Transaction {
        Transaction {
            version: transaction::Version(2),
            lock_time: LockTime::ZERO,
            input: vec![],
            output: outputs,
        }
    }

    #[test]
    fn reads_utf8_annotation_from_op_return() {
        let tx = tx_with_outputs(vec![TxOut {
            script_pubkey: op_return_script(b"SabcdefTargetAddress"),
            value: Amount::ZERO,
        }]);

        assert_eq!(
            OpReturnAddressReader.try_get_target_address(&tx),
            Some("SabcdefTargetAddress".to_string())
        );
    }

    #[test]
    fn no_op_return_output_yields_none() {
        let tx = tx_with_outputs(vec![TxOut {
            script_pubkey: ScriptBuf::new(),
            value: Amount::ZERO,
        }]);

        assert_eq!(OpReturnAddressReader.try_get_target_address(&tx), None);
    }

    #[test]
    fn invalid_utf8_payload_yields_none() {
        let tx = tx_with_outputs(vec![TxOut {
            script_pubkey: op_return_script(&[0xff, 0xfe, 0xfd]),
            value: Amount::ZERO,
        }]);

        assert_eq!(OpReturnAddressReader.try_get_target_address(&tx), None);
    }

    #[test]
    fn empty_payload_yields_none() {
        let tx = tx_with_outputs(vec![TxOut {
            script_pubkey: op_return_script(b""),
            value: Amount::ZERO,
        }]);

        assert_eq!(OpReturnAddressReader.try_get_target_address(&tx), None);
    }
}
