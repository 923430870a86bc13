use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use tally_core::{Entity, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Mint,
    Redeem,
    /// Transfer into the fee pool
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Mint => "MINT",
            TransactionKind::Redeem => "REDEEM",
            TransactionKind::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recent mint, redeem or fee-pool transfer
///
/// Keyed by the protocol sequence counter at insertion time; at most
/// `transaction_cap` of these are live at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sequence: u64,
    pub kind: TransactionKind,
    pub actor: Address,
    /// Token amount (transfer value for fee-pool transfers)
    pub amount: U256,
    pub collateral_amount: U256,
    pub fee: U256,
    pub timestamp: u64,
    pub block_number: u64,
    pub transaction_hash: B256,
    /// Owning user id
    pub user: String,
}

impl Transaction {
    pub fn id_for(sequence: u64) -> String {
        sequence.to_string()
    }
}

impl Entity for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;

    fn id(&self) -> String {
        Self::id_for(self.sequence)
    }
}
