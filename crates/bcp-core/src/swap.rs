//! Atomic swap state merging.
//!
//! Swap events arrive from chain scans in any order. The merger pairs each
//! offer with its claim or abort and yields one record per state change.
//!
//! # States per swap id
//!
//! ```text
//! Unseen --open--> Open --claim--> Claimed
//!                       --abort--> Aborted
//! Unseen --claim/abort--> (buffered in settling) --open--> Claimed / Aborted
//! ```
//!
//! Settled ids are remembered, so replayed events for them are errors.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SwapError;
use crate::transactions::{SwapAbortTx, SwapClaimTx, SwapOfferTx};
use crate::types::{Address, Amount, SwapId, SwapTimeout};

/// Immutable data of a swap as committed by its offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapData {
    pub id: SwapId,
    pub sender: Address,
    pub recipient: Address,
    pub hash: Vec<u8>,
    pub amounts: Vec<Amount>,
    pub timeout: SwapTimeout,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSwap {
    pub data: SwapData,
}

impl OpenSwap {
    /// Builds the open record for an observed offer. `id` is the id the
    /// chain assigned, `sender` the offer creator's address.
    pub fn from_offer(offer: &SwapOfferTx, id: SwapId, sender: Address) -> Self {
        Self {
            data: SwapData {
                id,
                sender,
                recipient: offer.recipient.clone(),
                hash: offer.hash.clone(),
                amounts: offer.amounts.clone(),
                timeout: offer.timeout,
                memo: offer.memo.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomicSwap {
    Open(OpenSwap),
    Claimed { data: SwapData, preimage: Vec<u8> },
    Aborted { data: SwapData },
}

impl AtomicSwap {
    pub fn data(&self) -> &SwapData {
        match self {
            Self::Open(open) => &open.data,
            Self::Claimed { data, .. } | Self::Aborted { data } => data,
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Open(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Claim(SwapClaimTx),
    Abort(SwapAbortTx),
}

impl Settlement {
    pub fn swap_id(&self) -> &SwapId {
        match self {
            Self::Claim(claim) => &claim.swap_id,
            Self::Abort(abort) => &abort.swap_id,
        }
    }

    fn settle(self, open: OpenSwap) -> AtomicSwap {
        match self {
            Self::Claim(claim) => AtomicSwap::Claimed { data: open.data, preimage: claim.preimage },
            Self::Abort(_) => AtomicSwap::Aborted { data: open.data },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    Open(OpenSwap),
    Settle(Settlement),
}

impl From<OpenSwap> for SwapEvent {
    fn from(open: OpenSwap) -> Self {
        Self::Open(open)
    }
}

impl From<SwapClaimTx> for SwapEvent {
    fn from(claim: SwapClaimTx) -> Self {
        Self::Settle(Settlement::Claim(claim))
    }
}

impl From<SwapAbortTx> for SwapEvent {
    fn from(abort: SwapAbortTx) -> Self {
        Self::Settle(Settlement::Abort(abort))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Upper bound on buffered settlements whose offer has not been seen.
    /// The oldest buffered settlement is dropped when the bound is hit.
    pub max_settling: usize,
    /// Upper bound on remembered settled swap ids. Once an id is forgotten
    /// a replayed offer or settlement for it is no longer rejected.
    pub max_settled: usize,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self { max_settling: 10_000, max_settled: 100_000 }
    }
}

impl MergerConfig {
    /// Never evict buffered settlements or forget settled swaps.
    pub fn unbounded() -> Self {
        Self { max_settling: usize::MAX, max_settled: usize::MAX }
    }
}

/// Folds swap events into swap records.
///
/// Not internally synchronized. Use [`SharedSwapMerger`] to share one
/// instance across threads.
#[derive(Debug, Default)]
pub struct AtomicSwapMerger {
    config: MergerConfig,
    open: HashMap<SwapId, OpenSwap>,
    settling: HashMap<SwapId, Settlement>,
    settling_order: VecDeque<SwapId>,
    settled: HashSet<SwapId>,
    settled_order: VecDeque<SwapId>,
}

impl AtomicSwapMerger {
    pub fn new(config: MergerConfig) -> Self {
        Self { config, ..Self::default() }
    }

    /// Merges `event` with what is already known about its swap.
    ///
    /// Returns the resulting record, or `None` when a settlement was
    /// buffered because its offer has not been seen yet.
    pub fn process(&mut self, event: impl Into<SwapEvent>) -> Result<Option<AtomicSwap>, SwapError> {
        match event.into() {
            SwapEvent::Open(open) => self.process_open(open).map(Some),
            SwapEvent::Settle(settlement) => self.process_settlement(settlement),
        }
    }

    /// Swaps awaiting settlement, in no particular order.
    pub fn open_swaps(&self) -> Vec<OpenSwap> {
        self.open.values().cloned().collect()
    }

    /// Number of buffered settlements still waiting for their offer.
    pub fn pending_settlements(&self) -> usize {
        self.settling.len()
    }

    fn process_open(&mut self, open: OpenSwap) -> Result<AtomicSwap, SwapError> {
        let id = open.data.id.clone();
        if self.open.contains_key(&id) {
            return Err(SwapError::DuplicateOpen(id.to_hex()));
        }
        if self.settled.contains(&id) {
            return Err(SwapError::AlreadySettled(id.to_hex()));
        }
        if let Some(settlement) = self.settling.remove(&id) {
            self.settling_order.retain(|queued| queued != &id);
            debug!(swap_id = %id.to_hex(), "swap: open matched buffered settlement");
            self.remember_settled(id);
            return Ok(settlement.settle(open));
        }
        debug!(swap_id = %id.to_hex(), "swap: opened");
        self.open.insert(id, open.clone());
        Ok(AtomicSwap::Open(open))
    }

    fn process_settlement(&mut self, settlement: Settlement) -> Result<Option<AtomicSwap>, SwapError> {
        let id = settlement.swap_id().clone();
        if let Some(open) = self.open.remove(&id) {
            debug!(swap_id = %id.to_hex(), "swap: settled");
            self.remember_settled(id);
            return Ok(Some(settlement.settle(open)));
        }
        if self.settled.contains(&id) {
            return Err(SwapError::AlreadySettled(id.to_hex()));
        }
        if self.settling.contains_key(&id) {
            return Err(SwapError::DuplicateSettlement(id.to_hex()));
        }
        if self.config.max_settling == 0 {
            warn!(swap_id = %id.to_hex(), "swap: settlement dropped, buffer disabled");
            return Ok(None);
        }
        while self.settling.len() >= self.config.max_settling {
            let Some(oldest) = self.settling_order.pop_front() else { break };
            self.settling.remove(&oldest);
            warn!(swap_id = %oldest.to_hex(), "swap: evicted unmatched settlement");
        }
        debug!(swap_id = %id.to_hex(), "swap: settlement buffered");
        self.settling_order.push_back(id.clone());
        self.settling.insert(id, settlement);
        Ok(None)
    }

    fn remember_settled(&mut self, id: SwapId) {
        if self.config.max_settled == 0 {
            return;
        }
        while self.settled.len() >= self.config.max_settled {
            let Some(oldest) = self.settled_order.pop_front() else { break };
            self.settled.remove(&oldest);
            warn!(swap_id = %oldest.to_hex(), "swap: forgot settled swap");
        }
        self.settled_order.push_back(id.clone());
        self.settled.insert(id);
    }
}

/// A merger behind a mutex.
#[derive(Debug, Clone, Default)]
pub struct SharedSwapMerger {
    inner: Arc<Mutex<AtomicSwapMerger>>,
}

impl SharedSwapMerger {
    pub fn new(config: MergerConfig) -> Self {
        Self { inner: Arc::new(Mutex::new(AtomicSwapMerger::new(config))) }
    }

    pub fn process(&self, event: impl Into<SwapEvent>) -> Result<Option<AtomicSwap>, SwapError> {
        self.inner.lock().process(event)
    }

    pub fn open_swaps(&self) -> Vec<OpenSwap> {
        self.inner.lock().open_swaps()
    }
}
