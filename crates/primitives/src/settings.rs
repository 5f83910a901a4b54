//! Settings that govern the federation gateway's view of the source chain.

use std::time::Duration;

use bitcoin::ScriptBuf;
use serde::{Deserialize, Serialize};

/// The configuration values that dictate how the gateway observes the source chain.
///
/// These values are fixed for the lifetime of the process. They are read-only at the monitoring
/// core's boundary and are typically loaded from a TOML file at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederationGatewaySettings {
    /// The number of confirmations a block must accumulate before deposits in it are extracted
    /// and dispatched toward the target chain.
    ///
    /// This buffer exists to absorb shallow chain reorganizations: deposit crediting triggers
    /// minting on the target chain and is effectively irreversible.
    minimum_deposit_confirmations: u64,

    /// The federation's shared locking condition on the source chain.
    ///
    /// An output is a deposit candidate only if it pays (the P2WSH form of) this script.
    multisig_redeem_script: ScriptBuf,

    /// Bound, in seconds, on each cross-node sink dispatch.
    sink_timeout_secs: u64,
}

impl FederationGatewaySettings {
    /// Creates a new settings instance.
    pub fn new(
        minimum_deposit_confirmations: u64,
        multisig_redeem_script: ScriptBuf,
        sink_timeout_secs: u64,
    ) -> Self {
        Self {
            minimum_deposit_confirmations,
            multisig_redeem_script,
            sink_timeout_secs,
        }
    }

    /// The confirmation depth required before deposits become actionable.
    pub fn minimum_deposit_confirmations(&self) -> u64 {
        self.minimum_deposit_confirmations
    }

    /// The federation's multisig redeem script.
    pub fn multisig_redeem_script(&self) -> &ScriptBuf {
        &self.multisig_redeem_script
    }

    /// The script pubkey that deposit transactions pay: the P2WSH wrapping of the redeem script.
    pub fn multisig_script_pubkey(&self) -> ScriptBuf {
        self.multisig_redeem_script.to_p2wsh()
    }

    /// The bound on each cross-node sink dispatch.
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_secs(self.sink_timeout_secs)
    }
}
