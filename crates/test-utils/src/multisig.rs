//! Federation multisig fixtures.

use bitcoin::{
    hex::DisplayHex,
    key::rand::{rngs::OsRng, RngCore},
    opcodes::all::{OP_CHECKMULTISIG, OP_PUSHNUM_2, OP_PUSHNUM_3},
    script::Builder,
    secp256k1::{Secp256k1, SecretKey},
    PublicKey, ScriptBuf,
};
use fedgw_primitives::settings::FederationGatewaySettings;

/// A freshly generated 2-of-3 federation multisig.
#[derive(Debug, Clone)]
pub struct MultisigFixture {
    redeem_script: ScriptBuf,
}

impl MultisigFixture {
    /// Generates a multisig over three random keys.
    pub fn new_random() -> Self {
        let secp = Secp256k1::new();
        let mut keys: Vec<PublicKey> = (0..3)
            .map(|_| {
                let sk = SecretKey::new(&mut OsRng);
                PublicKey::new(sk.public_key(&secp))
            })
            .collect();
        keys.sort_by_key(|key| key.to_bytes());

        let mut builder = Builder::new().push_opcode(OP_PUSHNUM_2);
        for key in &keys {
            builder = builder.push_key(key);
        }
        let redeem_script = builder
            .push_opcode(OP_PUSHNUM_3)
            .push_opcode(OP_CHECKMULTISIG)
            .into_script();

        Self { redeem_script }
    }

    /// The raw redeem script.
    pub fn redeem_script(&self) -> &ScriptBuf {
        &self.redeem_script
    }

    /// The script pubkey deposit transactions pay: the P2WSH form of the redeem script.
    pub fn script_pubkey(&self) -> ScriptBuf {
        self.redeem_script.to_p2wsh()
    }

    /// Gateway settings over this multisig.
    pub fn settings(
        &self,
        minimum_deposit_confirmations: u64,
        sink_timeout_secs: u64,
    ) -> FederationGatewaySettings {
        FederationGatewaySettings::new(
            minimum_deposit_confirmations,
            self.redeem_script.clone(),
            sink_timeout_secs,
        )
    }
}

/// A random target-chain address string, as it would appear in a deposit annotation.
pub fn random_target_address() -> String {
    let mut bytes = [0u8; 20];
    OsRng.fill_bytes(&mut bytes);
    format!("0x{}", bytes.to_lower_hex_string())
}
