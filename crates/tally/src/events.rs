//! Contract events consumed by the projector.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tally_core::{EventMeta, EventPosition};

/// Decoded events of the tracked contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContractEvent {
    /// A day's lottery was drawn.
    LotteryWon {
        day: u64,
        winner: Address,
        amount: U256,
    },
    /// A day's auction was settled.
    AuctionWon {
        day: u64,
        winner: Address,
        token_amount: U256,
        paid_amount: U256,
    },
    /// A day's auction opened for bids.
    AuctionStarted { day: u64, token_amount: U256 },
    BidPlaced {
        day: u64,
        bidder: Address,
        amount: U256,
    },
    /// A winner withdrew a prize. Carries no day.
    PrizeClaimed { winner: Address, amount: U256 },
    /// An unclaimed prize was redirected to a beneficiary. Carries no day.
    BeneficiaryFunded {
        previous_winner: Address,
        beneficiary: Address,
        amount: U256,
    },
    Minted {
        to: Address,
        collateral_amount: U256,
        token_amount: U256,
        fee: U256,
    },
    Redeemed {
        from: Address,
        collateral_amount: U256,
        token_amount: U256,
        fee: U256,
    },
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
}

impl ContractEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LotteryWon { .. } => "LotteryWon",
            Self::AuctionWon { .. } => "AuctionWon",
            Self::AuctionStarted { .. } => "AuctionStarted",
            Self::BidPlaced { .. } => "BidPlaced",
            Self::PrizeClaimed { .. } => "PrizeClaimed",
            Self::BeneficiaryFunded { .. } => "BeneficiaryFunded",
            Self::Minted { .. } => "Minted",
            Self::Redeemed { .. } => "Redeemed",
            Self::Transfer { .. } => "Transfer",
        }
    }
}

/// An event together with the block/transaction metadata it was emitted in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub meta: EventMeta,
    pub event: ContractEvent,
}

impl LoggedEvent {
    pub fn new(meta: EventMeta, event: ContractEvent) -> Self {
        Self { meta, event }
    }

    pub fn position(&self) -> EventPosition {
        self.meta.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn test_json_shape() {
        let event = LoggedEvent::new(
            EventMeta {
                block_timestamp: 1_700_000_000,
                block_number: 12,
                transaction_hash: B256::repeat_byte(0xab),
                log_index: 4,
            },
            ContractEvent::PrizeClaimed {
                winner: Address::repeat_byte(0x11),
                amount: U256::from(500u64),
            },
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"]["type"], "PrizeClaimed");
        assert_eq!(value["meta"]["block_number"], 12);

        let decoded: LoggedEvent = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, event);
        assert_eq!(decoded.event.name(), "PrizeClaimed");
    }
}
