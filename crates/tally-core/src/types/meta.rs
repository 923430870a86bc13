use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Block and transaction metadata delivered with every contract event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Block timestamp (unix seconds)
    pub block_timestamp: u64,

    pub block_number: u64,

    /// Hash of the transaction that emitted the event
    pub transaction_hash: B256,

    /// Log index within the block
    pub log_index: u64,
}

impl EventMeta {
    pub fn position(&self) -> EventPosition {
        EventPosition {
            block_number: self.block_number,
            log_index: self.log_index,
        }
    }
}

/// Position of an event in the upstream log
///
/// Ordered by block number, then log index, matching delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventPosition {
    pub block_number: u64,
    pub log_index: u64,
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block_number, self.log_index)
    }
}
