use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tally_core::{Entity, EntityKind};

/// One placed bid; append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub day: u64,
    pub bidder: Address,
    pub amount: U256,
    pub timestamp: u64,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
    /// Id of the day's auction prize
    pub prize: String,
    /// Owning user id
    pub user: String,
}

impl Bid {
    pub fn id_for(transaction_hash: B256, log_index: u64) -> String {
        format!("{:#x}-{}", transaction_hash, log_index)
    }
}

impl Entity for Bid {
    const KIND: EntityKind = EntityKind::Bid;

    fn id(&self) -> String {
        Self::id_for(self.transaction_hash, self.log_index)
    }
}
