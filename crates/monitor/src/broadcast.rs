//! De-duplicating gate in front of transaction broadcast: validate against the mempool policy
//! once, fan out to the connected peers once, and remember the outcome.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bitcoin::{Transaction, Txid};
use tokio::sync::Mutex;
use tracing::{info, trace};

use crate::errors::{BroadcastErr, SinkErr};

/// Propagation state of a transaction as seen by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxBroadcastState {
    /// The tracker has no record of the transaction.
    Unknown,

    /// The transaction is queued for broadcast but has not been validated yet.
    ToBroadcast,

    /// The transaction was accepted by the mempool policy and fanned out to the peers.
    Propagated,

    /// The mempool policy rejected the transaction. Terminal; no retry.
    CantBroadcast,

    /// A peer rejected the transaction after propagation.
    Rejected,
}

/// Admission check against the local mempool policy.
#[async_trait]
pub trait MempoolValidator: Send + Sync {
    /// Whether the transaction would be accepted into the memory pool.
    async fn accept_to_memory_pool(&self, tx: &Transaction) -> bool;
}

/// Fan-out of an accepted transaction to all currently connected peers.
#[async_trait]
pub trait PeerFanout: Send + Sync {
    /// Relays the transaction to every connected peer.
    async fn propagate_to_peers(&self, tx: &Transaction) -> Result<(), SinkErr>;
}

/// Tracks which transactions this node has already pushed into the network.
pub struct BroadcastTracker {
    mempool: Arc<dyn MempoolValidator>,
    peers: Arc<dyn PeerFanout>,
    states: Mutex<HashMap<Txid, TxBroadcastState>>,
}

impl std::fmt::Debug for BroadcastTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastTracker")
            .field("mempool", &format!("{:?}", Arc::as_ptr(&self.mempool)))
            .field("peers", &format!("{:?}", Arc::as_ptr(&self.peers)))
            .finish_non_exhaustive()
    }
}

impl BroadcastTracker {
    /// Creates a tracker with no propagation history.
    pub fn new(mempool: Arc<dyn MempoolValidator>, peers: Arc<dyn PeerFanout>) -> Self {
        Self {
            mempool,
            peers,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// The recorded state for the transaction, [`TxBroadcastState::Unknown`] if untracked.
    pub async fn state(&self, txid: &Txid) -> TxBroadcastState {
        self.states
            .lock()
            .await
            .get(txid)
            .copied()
            .unwrap_or(TxBroadcastState::Unknown)
    }

    /// Broadcasts the transaction unless it is already propagated.
    ///
    /// Mempool rejection is recorded as [`TxBroadcastState::CantBroadcast`] and is not an error:
    /// the caller learns the outcome via [`BroadcastTracker::state`]. A peer fan-out failure
    /// propagates and leaves the transaction unrecorded so a later call retries it.
    pub async fn broadcast_transaction(&self, tx: &Transaction) -> Result<(), BroadcastErr> {
        let txid = tx.compute_txid();

        if self.state(&txid).await == TxBroadcastState::Propagated {
            trace!(%txid, "transaction already propagated, nothing to do");
            return Ok(());
        }

        if !self.mempool.accept_to_memory_pool(tx).await {
            info!(%txid, "mempool policy rejected transaction");
            self.states
                .lock()
                .await
                .insert(txid, TxBroadcastState::CantBroadcast);
            return Ok(());
        }

        self.peers
            .propagate_to_peers(tx)
            .await
            .map_err(BroadcastErr::PeerFanout)?;

        trace!(%txid, "transaction propagated to peers");
        self.states
            .lock()
            .await
            .insert(txid, TxBroadcastState::Propagated);

        Ok(())
    }
}
