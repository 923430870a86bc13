//! Event router
//!
//! Maps each [`ContractEvent`] to its projector. Events are applied one at a
//! time in delivery order; the router holds no state besides configuration.

use crate::correlator::Correlator;
use crate::events::{ContractEvent, LoggedEvent};
use crate::prizes::PrizeProjector;
use crate::transactions::TransactionProjector;
use std::time::Instant;
use tally_core::{observe, EntityStore, ProjectorConfig, Result};
use tracing::{debug, warn};

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event changed projected state
    Applied,
    /// The event was deliberately not projected (non fee-pool or zero-source
    /// transfer, duplicate auction start)
    Ignored,
    /// A claim or expiry matched no open prize in the scan window
    Unmatched,
}

pub struct EventRouter {
    config: ProjectorConfig,
    transactions: TransactionProjector,
    prizes: PrizeProjector,
    correlator: Correlator,
}

impl EventRouter {
    pub fn new(config: ProjectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transactions: TransactionProjector::new(&config),
            prizes: PrizeProjector::new(&config),
            correlator: Correlator::new(&config),
            config,
        })
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    pub fn transactions(&self) -> &TransactionProjector {
        &self.transactions
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Project one event into `store`
    ///
    /// On error the store may hold partial writes for this event; callers
    /// that need atomicity apply inside a transaction they can abort.
    pub fn apply<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        logged: &LoggedEvent,
    ) -> Result<ApplyOutcome> {
        let start = Instant::now();
        let meta = &logged.meta;
        let name = logged.event.name();

        let outcome = match logged.event {
            ContractEvent::LotteryWon {
                day,
                winner,
                amount,
            } => {
                self.prizes
                    .record_lottery_win(store, day, winner, amount, meta)?;
                ApplyOutcome::Applied
            }
            ContractEvent::AuctionWon {
                day,
                winner,
                token_amount,
                paid_amount,
            } => {
                self.prizes
                    .record_auction_win(store, day, winner, token_amount, paid_amount, meta)?;
                ApplyOutcome::Applied
            }
            ContractEvent::AuctionStarted { day, token_amount } => {
                match self
                    .prizes
                    .record_auction_started(store, day, token_amount, meta)?
                {
                    Some(_) => ApplyOutcome::Applied,
                    None => ApplyOutcome::Ignored,
                }
            }
            ContractEvent::BidPlaced {
                day,
                bidder,
                amount,
            } => {
                self.prizes.record_bid(store, day, bidder, amount, meta)?;
                ApplyOutcome::Applied
            }
            ContractEvent::PrizeClaimed { winner, amount } => {
                match self.correlator.record_claim(store, winner, amount, meta)? {
                    Some(_) => ApplyOutcome::Applied,
                    None => {
                        warn!(%winner, %amount, position = %logged.position(), "Claim matched no open prize");
                        ApplyOutcome::Unmatched
                    }
                }
            }
            ContractEvent::BeneficiaryFunded {
                previous_winner,
                beneficiary,
                amount,
            } => {
                match self
                    .correlator
                    .record_expiry(store, previous_winner, beneficiary, amount, meta)?
                {
                    Some(_) => ApplyOutcome::Applied,
                    None => {
                        warn!(%previous_winner, %amount, position = %logged.position(), "Expiry matched no open prize");
                        ApplyOutcome::Unmatched
                    }
                }
            }
            ContractEvent::Minted {
                to,
                collateral_amount,
                token_amount,
                fee,
            } => {
                self.transactions
                    .record_mint(store, to, token_amount, collateral_amount, fee, meta)?;
                ApplyOutcome::Applied
            }
            ContractEvent::Redeemed {
                from,
                collateral_amount,
                token_amount,
                fee,
            } => {
                self.transactions
                    .record_redeem(store, from, token_amount, collateral_amount, fee, meta)?;
                ApplyOutcome::Applied
            }
            ContractEvent::Transfer { from, to, value } => {
                if self.config.fee_pool_address != Some(to) {
                    ApplyOutcome::Ignored
                } else {
                    match self
                        .transactions
                        .record_fee_transfer(store, from, value, meta)?
                    {
                        Some(_) => ApplyOutcome::Applied,
                        None => ApplyOutcome::Ignored,
                    }
                }
            }
        };

        if outcome == ApplyOutcome::Unmatched {
            observe::record_unmatched_correlation(name);
        }
        observe::record_event_applied(name, start.elapsed());
        debug!(event = name, position = %logged.position(), ?outcome, "Applied event");

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use alloy_primitives::{Address, B256, U256};
    use tally_core::{EventMeta, TallyError};

    fn logged(event: ContractEvent) -> LoggedEvent {
        LoggedEvent::new(
            EventMeta {
                block_timestamp: 1,
                block_number: 1,
                transaction_hash: B256::ZERO,
                log_index: 0,
            },
            event,
        )
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ProjectorConfig::default().with_transaction_cap(0);
        assert!(matches!(
            EventRouter::new(config),
            Err(TallyError::Config(_))
        ));
    }

    #[test]
    fn test_transfers_outside_fee_pool_are_ignored() {
        let pool = Address::repeat_byte(0xfe);
        let router = EventRouter::new(ProjectorConfig::default().with_fee_pool(pool)).unwrap();
        let mut store = MemoryStore::new();

        let elsewhere = logged(ContractEvent::Transfer {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            value: U256::from(1u64),
        });
        assert_eq!(router.apply(&mut store, &elsewhere).unwrap(), ApplyOutcome::Ignored);
        assert!(store.is_empty());

        let into_pool = logged(ContractEvent::Transfer {
            from: Address::repeat_byte(1),
            to: pool,
            value: U256::from(1u64),
        });
        assert_eq!(router.apply(&mut store, &into_pool).unwrap(), ApplyOutcome::Applied);
    }

    #[test]
    fn test_no_fee_pool_projects_no_transfer() {
        let router = EventRouter::new(ProjectorConfig::default()).unwrap();
        let mut store = MemoryStore::new();
        let transfer = logged(ContractEvent::Transfer {
            from: Address::repeat_byte(1),
            to: Address::ZERO,
            value: U256::from(1u64),
        });
        assert_eq!(router.apply(&mut store, &transfer).unwrap(), ApplyOutcome::Ignored);
        assert!(store.is_empty());
    }

    #[test]
    fn test_unmatched_claim_leaves_store_untouched() {
        let router = EventRouter::new(ProjectorConfig::default()).unwrap();
        let mut store = MemoryStore::new();
        let claim = logged(ContractEvent::PrizeClaimed {
            winner: Address::repeat_byte(1),
            amount: U256::from(1u64),
        });
        assert_eq!(router.apply(&mut store, &claim).unwrap(), ApplyOutcome::Unmatched);
        assert!(store.is_empty());
    }
}
