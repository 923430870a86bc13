use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_core::{Entity, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    Lottery,
    Auction,
}

impl PrizeKind {
    /// Correlation scan order: lottery first, then auction
    pub const ALL: [PrizeKind; 2] = [PrizeKind::Lottery, PrizeKind::Auction];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrizeKind::Lottery => "lottery",
            PrizeKind::Auction => "auction",
        }
    }
}

impl fmt::Display for PrizeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement state of a prize. A prize is claimed or expired, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PrizeStatus {
    Open,
    Claimed {
        at: u64,
        transaction_hash: B256,
    },
    Expired {
        at: u64,
        transaction_hash: B256,
        beneficiary: Address,
    },
}

/// One day's lottery or auction winner
///
/// Auction records may exist before the win as placeholders (zero winner)
/// so bids have something to count against. Check [`Prize::is_placeholder`]
/// before treating `winner` or the bid count as meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub kind: PrizeKind,
    pub day: u64,
    pub winner: Address,
    /// Tokens won
    pub amount: U256,
    /// Amount the auction winner paid; absent for lotteries
    pub paid_amount: Option<U256>,
    /// Bids seen for the day; absent until the auction is known
    pub bid_count: Option<u64>,
    pub status: PrizeStatus,
    pub timestamp: u64,
    pub block_number: u64,
    pub transaction_hash: B256,
    /// Owning user id; absent on placeholders
    pub user: Option<String>,
}

impl Prize {
    pub fn id_for(day: u64, kind: PrizeKind) -> String {
        format!("{}-{}", day, kind.as_str())
    }

    pub fn is_placeholder(&self) -> bool {
        self.winner == Address::ZERO
    }

    pub fn bid_count(&self) -> u64 {
        self.bid_count.unwrap_or(0)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, PrizeStatus::Open)
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self.status, PrizeStatus::Claimed { .. })
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.status, PrizeStatus::Expired { .. })
    }

    pub fn beneficiary(&self) -> Option<Address> {
        match self.status {
            PrizeStatus::Expired { beneficiary, .. } => Some(beneficiary),
            _ => None,
        }
    }
}

impl Entity for Prize {
    const KIND: EntityKind = EntityKind::Prize;

    fn id(&self) -> String {
        Self::id_for(self.day, self.kind)
    }
}
