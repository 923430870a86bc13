//! Claim/expiry correlator
//!
//! `PrizeClaimed` and `BeneficiaryFunded` carry no prize key. The correlator
//! resolves them by scanning a bounded window of days, lottery first then
//! auction, and settling the first open prize that matches in ascending day
//! order. Placeholders never match.

use crate::accessors;
use crate::entities::{Prize, PrizeKind, PrizeStatus};
use alloy_primitives::{Address, U256};
use std::ops::Range;
use tally_core::{
    EntityReadExt, EntityStore, EntityStoreExt, EventMeta, ProjectorConfig, Result, ScanWindow,
};
use tracing::debug;

pub struct Correlator {
    scan_days: u64,
    window: ScanWindow,
}

/// What a settlement event is matched on
#[derive(Debug, Clone, Copy)]
enum Claimant {
    Claim { winner: Address, amount: U256 },
    Expiry { previous_winner: Address },
}

impl Claimant {
    fn matches(&self, prize: &Prize) -> bool {
        if prize.is_placeholder() || !prize.is_open() {
            return false;
        }
        match *self {
            Claimant::Claim { winner, amount } => prize.winner == winner && prize.amount == amount,
            Claimant::Expiry { previous_winner } => prize.winner == previous_winner,
        }
    }
}

impl Correlator {
    pub fn new(config: &ProjectorConfig) -> Self {
        Self {
            scan_days: config.claim_scan_days,
            window: config.claim_scan_window,
        }
    }

    /// Days searched for a prize kind whose latest win was on `latest_day`
    ///
    /// `Absolute` is the fixed window `0..claim_scan_days`. The default,
    /// `Trailing`, ends the window at the latest win instead; it returns the
    /// same days until the contract reaches day `claim_scan_days`, after which
    /// a fixed window would no longer reach any live prize.
    pub fn window(&self, latest_day: Option<u64>) -> Range<u64> {
        match self.window {
            ScanWindow::Absolute => 0..self.scan_days,
            ScanWindow::Trailing => {
                let end = latest_day
                    .map_or(0, |day| day.saturating_add(1))
                    .max(self.scan_days);
                end - self.scan_days..end
            }
        }
    }

    /// Mark the first open prize won by `winner` for `amount` as claimed
    ///
    /// Returns `None` when nothing in the window matches.
    pub fn record_claim<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        winner: Address,
        amount: U256,
        meta: &EventMeta,
    ) -> Result<Option<Prize>> {
        let Some(mut prize) = self.find(store, Claimant::Claim { winner, amount })? else {
            return Ok(None);
        };

        prize.status = PrizeStatus::Claimed {
            at: meta.block_timestamp,
            transaction_hash: meta.transaction_hash,
        };
        store.save(&prize)?;

        let mut stats = accessors::protocol_stats(store)?;
        stats.add_claimed(prize.kind, amount);
        accessors::save_stats(store, &stats)?;

        debug!(day = prize.day, kind = %prize.kind, %winner, %amount, "Prize claimed");
        Ok(Some(prize))
    }

    /// Mark the first open prize won by `previous_winner` as expired
    ///
    /// Returns `None` when nothing in the window matches.
    pub fn record_expiry<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        previous_winner: Address,
        beneficiary: Address,
        amount: U256,
        meta: &EventMeta,
    ) -> Result<Option<Prize>> {
        let Some(mut prize) = self.find(store, Claimant::Expiry { previous_winner })? else {
            return Ok(None);
        };

        prize.status = PrizeStatus::Expired {
            at: meta.block_timestamp,
            transaction_hash: meta.transaction_hash,
            beneficiary,
        };
        store.save(&prize)?;

        let mut stats = accessors::protocol_stats(store)?;
        stats.add_expired(prize.kind, amount);
        accessors::save_stats(store, &stats)?;

        debug!(
            day = prize.day,
            kind = %prize.kind,
            %previous_winner,
            %beneficiary,
            "Prize expired"
        );
        Ok(Some(prize))
    }

    fn find<S: EntityStore + ?Sized>(
        &self,
        store: &S,
        claimant: Claimant,
    ) -> Result<Option<Prize>> {
        let stats = accessors::protocol_stats(store)?;

        for kind in PrizeKind::ALL {
            for day in self.window(stats.latest_day(kind)) {
                if let Some(prize) = store.load::<Prize>(&Prize::id_for(day, kind))? {
                    if claimant.matches(&prize) {
                        return Ok(Some(prize));
                    }
                }
            }
        }

        Ok(None)
    }
}
