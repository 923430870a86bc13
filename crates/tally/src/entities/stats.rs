use super::prize::PrizeKind;
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use tally_core::{Entity, EntityKind};

/// Fixed id of the protocol-wide singleton
pub const PROTOCOL_STATS_ID: &str = "protocol";

/// Protocol-wide running totals
///
/// Created on first use and never deleted. `next_transaction_id` only ever
/// increases, even as old Transactions are evicted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub total_minted: U256,
    pub total_redeemed: U256,
    /// Fees reported by mint and redeem events
    pub total_fees: U256,
    /// Value moved into the fee pool by projected transfers
    pub total_fee_transfers: U256,

    pub total_lottery_awarded: U256,
    pub total_lottery_claimed: U256,
    pub total_lottery_expired: U256,
    pub total_auction_awarded: U256,
    pub total_auction_paid: U256,
    pub total_auction_claimed: U256,
    pub total_auction_expired: U256,

    pub lottery_count: u64,
    pub auction_count: u64,
    pub transaction_count: u64,
    pub bid_count: u64,
    pub user_count: u64,

    /// Sequence counter minting Transaction ids
    pub next_transaction_id: u64,

    pub latest_lottery_day: Option<u64>,
    pub latest_auction_day: Option<u64>,
}

impl ProtocolStats {
    /// Most recent day a win of this kind was recorded for
    pub fn latest_day(&self, kind: PrizeKind) -> Option<u64> {
        match kind {
            PrizeKind::Lottery => self.latest_lottery_day,
            PrizeKind::Auction => self.latest_auction_day,
        }
    }

    pub(crate) fn observe_win_day(&mut self, kind: PrizeKind, day: u64) {
        let latest = match kind {
            PrizeKind::Lottery => &mut self.latest_lottery_day,
            PrizeKind::Auction => &mut self.latest_auction_day,
        };
        *latest = Some(latest.map_or(day, |current| current.max(day)));
    }

    pub(crate) fn add_claimed(&mut self, kind: PrizeKind, amount: U256) {
        let total = match kind {
            PrizeKind::Lottery => &mut self.total_lottery_claimed,
            PrizeKind::Auction => &mut self.total_auction_claimed,
        };
        *total = total.saturating_add(amount);
    }

    pub(crate) fn add_expired(&mut self, kind: PrizeKind, amount: U256) {
        let total = match kind {
            PrizeKind::Lottery => &mut self.total_lottery_expired,
            PrizeKind::Auction => &mut self.total_auction_expired,
        };
        *total = total.saturating_add(amount);
    }
}

impl Entity for ProtocolStats {
    const KIND: EntityKind = EntityKind::ProtocolStats;

    fn id(&self) -> String {
        PROTOCOL_STATS_ID.to_string()
    }
}
