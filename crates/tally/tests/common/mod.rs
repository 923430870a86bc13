//! Event builders shared by the integration tests.
#![allow(dead_code)]

use tally::prelude::*;

pub fn fee_pool() -> Address {
    Address::repeat_byte(0xfe)
}

pub fn config() -> ProjectorConfig {
    ProjectorConfig::default().with_fee_pool(fee_pool())
}

/// Builds a log with strictly increasing positions and timestamps
#[derive(Default)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
    block: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event in a new block
    pub fn push(&mut self, event: ContractEvent) -> &mut Self {
        self.block += 1;
        self.push_at(self.block, 0, event)
    }

    /// Append an event in the current block, after the previous one
    pub fn push_same_block(&mut self, event: ContractEvent) -> &mut Self {
        let log_index = self
            .events
            .last()
            .map_or(0, |last| last.meta.log_index + 1);
        self.push_at(self.block, log_index, event)
    }

    fn push_at(&mut self, block: u64, log_index: u64, event: ContractEvent) -> &mut Self {
        let meta = EventMeta {
            block_timestamp: 1_700_000_000 + block * 12,
            block_number: block,
            transaction_hash: B256::left_padding_from(&block.to_be_bytes()),
            log_index,
        };
        self.events.push(LoggedEvent::new(meta, event));
        self
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<LoggedEvent> {
        self.events
    }
}

pub fn addr(n: u8) -> Address {
    Address::repeat_byte(n)
}

pub fn amount(n: u64) -> U256 {
    U256::from(n)
}

pub fn minted(to: Address, token_amount: u64, fee: u64) -> ContractEvent {
    ContractEvent::Minted {
        to,
        collateral_amount: amount(token_amount / 2),
        token_amount: amount(token_amount),
        fee: amount(fee),
    }
}

pub fn redeemed(from: Address, token_amount: u64, fee: u64) -> ContractEvent {
    ContractEvent::Redeemed {
        from,
        collateral_amount: amount(token_amount / 2),
        token_amount: amount(token_amount),
        fee: amount(fee),
    }
}

pub fn fee_transfer(from: Address, value: u64) -> ContractEvent {
    ContractEvent::Transfer {
        from,
        to: fee_pool(),
        value: amount(value),
    }
}

pub fn lottery_won(day: u64, winner: Address, value: u64) -> ContractEvent {
    ContractEvent::LotteryWon {
        day,
        winner,
        amount: amount(value),
    }
}

pub fn auction_won(day: u64, winner: Address, tokens: u64, paid: u64) -> ContractEvent {
    ContractEvent::AuctionWon {
        day,
        winner,
        token_amount: amount(tokens),
        paid_amount: amount(paid),
    }
}

pub fn auction_started(day: u64, tokens: u64) -> ContractEvent {
    ContractEvent::AuctionStarted {
        day,
        token_amount: amount(tokens),
    }
}

pub fn bid_placed(day: u64, bidder: Address, value: u64) -> ContractEvent {
    ContractEvent::BidPlaced {
        day,
        bidder,
        amount: amount(value),
    }
}

pub fn prize_claimed(winner: Address, value: u64) -> ContractEvent {
    ContractEvent::PrizeClaimed {
        winner,
        amount: amount(value),
    }
}

pub fn beneficiary_funded(previous_winner: Address, beneficiary: Address, value: u64) -> ContractEvent {
    ContractEvent::BeneficiaryFunded {
        previous_winner,
        beneficiary,
        amount: amount(value),
    }
}

/// A mixed log touching every event kind
pub fn mixed_log() -> EventLog {
    let mut log = EventLog::new();
    for day in 1..=20u64 {
        let player = addr((day % 4 + 1) as u8);
        log.push(minted(player, 1_000 + day, 10));
        log.push_same_block(fee_transfer(player, 10));
        log.push(auction_started(day, 500));
        log.push(bid_placed(day, addr(9), 40 + day));
        log.push_same_block(bid_placed(day, addr(10), 50 + day));
        log.push(lottery_won(day, player, 100 + day));
        log.push(auction_won(day, addr(10), 500, 50 + day));
        if day % 3 == 0 {
            log.push(prize_claimed(player, 100 + day));
        }
        if day % 5 == 0 {
            log.push(beneficiary_funded(addr(10), addr(11), 500));
        }
        log.push(redeemed(player, 300, 3));
    }
    log
}
