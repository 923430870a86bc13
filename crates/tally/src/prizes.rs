//! Prize projector
//!
//! Folds lottery and auction events into day-keyed [`Prize`] records and
//! appends [`Bid`]s. Each prize kind keeps only the days within
//! `prize_retention_days` of its latest win; older days are deleted when a
//! win arrives, independent of how many records physically exist.

use crate::accessors;
use crate::entities::{Bid, Prize, PrizeKind, PrizeStatus};
use alloy_primitives::{Address, U256};
use tally_core::{
    observe, Entity, EntityReadExt, EntityStore, EntityStoreExt, EventMeta, ProjectorConfig, Result,
};
use tracing::{debug, warn};

pub struct PrizeProjector {
    retention_days: u64,
    lookback_days: u64,
}

impl PrizeProjector {
    pub fn new(config: &ProjectorConfig) -> Self {
        Self {
            retention_days: config.prize_retention_days,
            lookback_days: config.prize_rotation_lookback_days,
        }
    }

    /// Record the winner of a day's lottery, replacing any prior record for that day
    pub fn record_lottery_win<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        day: u64,
        winner: Address,
        amount: U256,
        meta: &EventMeta,
    ) -> Result<Prize> {
        self.rotate(store, PrizeKind::Lottery, day)?;

        let mut stats = accessors::protocol_stats(store)?;
        let mut user = accessors::user(store, &mut stats, winner, meta)?;

        let prize = Prize {
            kind: PrizeKind::Lottery,
            day,
            winner,
            amount,
            paid_amount: None,
            bid_count: None,
            status: PrizeStatus::Open,
            timestamp: meta.block_timestamp,
            block_number: meta.block_number,
            transaction_hash: meta.transaction_hash,
            user: Some(user.id()),
        };
        store.save(&prize)?;

        user.lottery_wins += 1;
        user.lottery_winnings = user.lottery_winnings.saturating_add(amount);
        stats.lottery_count += 1;
        stats.total_lottery_awarded = stats.total_lottery_awarded.saturating_add(amount);
        stats.observe_win_day(PrizeKind::Lottery, day);

        store.save(&user)?;
        accessors::save_stats(store, &stats)?;

        debug!(day, %winner, %amount, "Recorded lottery win");
        Ok(prize)
    }

    /// Record the winner of a day's auction
    ///
    /// Bids counted against a placeholder carry over to the settled record.
    pub fn record_auction_win<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        day: u64,
        winner: Address,
        token_amount: U256,
        paid_amount: U256,
        meta: &EventMeta,
    ) -> Result<Prize> {
        self.rotate(store, PrizeKind::Auction, day)?;

        let mut stats = accessors::protocol_stats(store)?;
        let mut user = accessors::user(store, &mut stats, winner, meta)?;

        let id = Prize::id_for(day, PrizeKind::Auction);
        let bid_count = store
            .load::<Prize>(&id)?
            .map_or(0, |existing| existing.bid_count());

        let prize = Prize {
            kind: PrizeKind::Auction,
            day,
            winner,
            amount: token_amount,
            paid_amount: Some(paid_amount),
            bid_count: Some(bid_count),
            status: PrizeStatus::Open,
            timestamp: meta.block_timestamp,
            block_number: meta.block_number,
            transaction_hash: meta.transaction_hash,
            user: Some(user.id()),
        };
        store.save(&prize)?;

        user.auction_wins += 1;
        user.auction_winnings = user.auction_winnings.saturating_add(token_amount);
        user.auction_spent = user.auction_spent.saturating_add(paid_amount);
        stats.auction_count += 1;
        stats.total_auction_awarded = stats.total_auction_awarded.saturating_add(token_amount);
        stats.total_auction_paid = stats.total_auction_paid.saturating_add(paid_amount);
        stats.observe_win_day(PrizeKind::Auction, day);

        store.save(&user)?;
        accessors::save_stats(store, &stats)?;

        debug!(day, %token_amount, %paid_amount, bid_count, "Recorded auction win");
        Ok(prize)
    }

    /// Create a zero-winner placeholder so bids have a record to count against
    ///
    /// Returns `None` when the day already has a record.
    pub fn record_auction_started<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        day: u64,
        token_amount: U256,
        meta: &EventMeta,
    ) -> Result<Option<Prize>> {
        let id = Prize::id_for(day, PrizeKind::Auction);
        if store.contains::<Prize>(&id)? {
            debug!(day, "Auction record already present");
            return Ok(None);
        }

        let placeholder = Prize {
            kind: PrizeKind::Auction,
            day,
            winner: Address::ZERO,
            amount: token_amount,
            paid_amount: Some(U256::ZERO),
            bid_count: Some(0),
            status: PrizeStatus::Open,
            timestamp: meta.block_timestamp,
            block_number: meta.block_number,
            transaction_hash: meta.transaction_hash,
            user: None,
        };
        store.save(&placeholder)?;

        debug!(day, %token_amount, "Created auction placeholder");
        Ok(Some(placeholder))
    }

    /// Append a bid and count it against the bidder, the protocol and the
    /// day's auction record if one exists
    ///
    /// Without an auction record for the day only the prize counter is
    /// skipped; the bid is still stored and counted on the user and the
    /// protocol.
    pub fn record_bid<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        day: u64,
        bidder: Address,
        amount: U256,
        meta: &EventMeta,
    ) -> Result<Bid> {
        let mut stats = accessors::protocol_stats(store)?;
        let mut user = accessors::user(store, &mut stats, bidder, meta)?;

        let prize_id = Prize::id_for(day, PrizeKind::Auction);
        match store.load::<Prize>(&prize_id)? {
            Some(mut prize) => {
                prize.bid_count = Some(prize.bid_count() + 1);
                store.save(&prize)?;
            }
            None => warn!(day, "Bid for auction with no record; not counted on prize"),
        }

        let bid = Bid {
            day,
            bidder,
            amount,
            timestamp: meta.block_timestamp,
            block_number: meta.block_number,
            transaction_hash: meta.transaction_hash,
            log_index: meta.log_index,
            prize: prize_id,
            user: user.id(),
        };
        store.save(&bid)?;

        user.bid_count += 1;
        stats.bid_count += 1;
        store.save(&user)?;
        accessors::save_stats(store, &stats)?;

        Ok(bid)
    }

    /// Delete records of `kind` that fall out of the retention window ending at `day`
    ///
    /// Scans down from the first day below the window for at most
    /// `lookback_days` days. Returns the number of records deleted.
    pub fn rotate<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        kind: PrizeKind,
        day: u64,
    ) -> Result<usize> {
        let keep_from = day.saturating_sub(self.retention_days.saturating_sub(1));
        if keep_from == 0 {
            return Ok(0);
        }

        let floor = keep_from.saturating_sub(self.lookback_days);
        let mut evicted = 0;
        for old_day in (floor..keep_from).rev() {
            if store.remove::<Prize>(&Prize::id_for(old_day, kind))? {
                debug!(day = old_day, %kind, "Evicted prize");
                evicted += 1;
            }
        }

        if evicted > 0 {
            observe::record_rotation("prize", evicted);
        }
        Ok(evicted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::User;
    use crate::memory::MemoryStore;
    use alloy_primitives::B256;

    fn meta(n: u64) -> EventMeta {
        EventMeta {
            block_timestamp: 10_000 + n,
            block_number: n,
            transaction_hash: B256::repeat_byte(n as u8),
            log_index: n,
        }
    }

    fn projector() -> PrizeProjector {
        PrizeProjector::new(&ProjectorConfig::default())
    }

    fn live_days(store: &MemoryStore, kind: PrizeKind) -> Vec<u64> {
        let mut days: Vec<u64> = store
            .scan::<Prize>()
            .unwrap()
            .into_iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.day)
            .collect();
        days.sort_unstable();
        days
    }

    #[test]
    fn test_lottery_rotation_by_day_distance() {
        let mut store = MemoryStore::new();
        let projector = projector();
        let winner = Address::repeat_byte(1);

        for day in 1..=12 {
            projector
                .record_lottery_win(&mut store, day, winner, U256::from(day), &meta(day))
                .unwrap();
        }
        assert_eq!(live_days(&store, PrizeKind::Lottery), (6..=12).collect::<Vec<_>>());

        // A gap of missed days does not use up capacity
        projector
            .record_lottery_win(&mut store, 40, winner, U256::from(40u64), &meta(40))
            .unwrap();
        assert_eq!(live_days(&store, PrizeKind::Lottery), vec![40]);
    }

    #[test]
    fn test_rotation_is_per_kind() {
        let mut store = MemoryStore::new();
        let projector = projector();
        let winner = Address::repeat_byte(2);

        projector
            .record_auction_win(&mut store, 1, winner, U256::from(5u64), U256::from(1u64), &meta(1))
            .unwrap();
        projector
            .record_lottery_win(&mut store, 30, winner, U256::from(5u64), &meta(2))
            .unwrap();

        assert_eq!(live_days(&store, PrizeKind::Auction), vec![1]);
        assert_eq!(live_days(&store, PrizeKind::Lottery), vec![30]);
    }

    #[test]
    fn test_rotation_scan_is_bounded() {
        let mut store = MemoryStore::new();
        let config = ProjectorConfig {
            prize_rotation_lookback_days: 5,
            ..ProjectorConfig::default()
        };
        let projector = PrizeProjector::new(&config);
        let winner = Address::repeat_byte(3);

        projector
            .record_lottery_win(&mut store, 1, winner, U256::from(1u64), &meta(1))
            .unwrap();
        // keep_from = 94, scan covers 89..94 and never reaches day 1
        projector
            .record_lottery_win(&mut store, 100, winner, U256::from(1u64), &meta(2))
            .unwrap();
        assert_eq!(live_days(&store, PrizeKind::Lottery), vec![1, 100]);
    }

    #[test]
    fn test_placeholder_then_bids_then_win() {
        let mut store = MemoryStore::new();
        let projector = projector();
        let bidder = Address::repeat_byte(4);
        let winner = Address::repeat_byte(5);

        let placeholder = projector
            .record_auction_started(&mut store, 3, U256::from(1_000u64), &meta(1))
            .unwrap()
            .unwrap();
        assert!(placeholder.is_placeholder());
        assert_eq!(placeholder.bid_count, Some(0));
        assert_eq!(placeholder.paid_amount, Some(U256::ZERO));

        // Second start for the same day leaves the record alone
        assert!(projector
            .record_auction_started(&mut store, 3, U256::from(9u64), &meta(2))
            .unwrap()
            .is_none());

        projector
            .record_bid(&mut store, 3, bidder, U256::from(10u64), &meta(3))
            .unwrap();
        projector
            .record_bid(&mut store, 3, bidder, U256::from(20u64), &meta(4))
            .unwrap();

        let prize: Prize = store.load("3-auction").unwrap().unwrap();
        assert_eq!(prize.bid_count(), 2);
        assert_eq!(prize.amount, U256::from(1_000u64));

        let won = projector
            .record_auction_win(&mut store, 3, winner, U256::from(1_000u64), U256::from(20u64), &meta(5))
            .unwrap();
        assert!(!won.is_placeholder());
        assert_eq!(won.bid_count, Some(2));
        assert_eq!(won.user, Some(User::id_for(winner)));

        let bidder_user: User = store.load(&User::id_for(bidder)).unwrap().unwrap();
        assert_eq!(bidder_user.bid_count, 2);
        let stats = accessors::protocol_stats(&store).unwrap();
        assert_eq!(stats.bid_count, 2);
        assert_eq!(stats.auction_count, 1);
        assert_eq!(stats.total_auction_paid, U256::from(20u64));
        assert_eq!(stats.user_count, 2);
    }

    #[test]
    fn test_bid_without_record_still_appends() {
        let mut store = MemoryStore::new();
        let bid = projector()
            .record_bid(&mut store, 8, Address::repeat_byte(6), U256::from(1u64), &meta(1))
            .unwrap();

        assert_eq!(bid.prize, "8-auction");
        assert!(store.load::<Prize>("8-auction").unwrap().is_none());
        assert_eq!(store.scan::<Bid>().unwrap(), vec![bid]);

        let bidder: User = store.load(&User::id_for(Address::repeat_byte(6))).unwrap().unwrap();
        assert_eq!(bidder.bid_count, 1);
        assert_eq!(accessors::protocol_stats(&store).unwrap().bid_count, 1);
    }
}
