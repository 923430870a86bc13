use crate::error::{Result, TallyError};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Configuration for the projection engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Maximum number of live Transaction records
    /// Default: 10
    #[serde(default = "default_transaction_cap")]
    pub transaction_cap: usize,

    /// Maximum number of contiguous Transaction records the rotation probe
    /// may walk before the store is considered corrupt
    /// Default: 64
    #[serde(default = "default_transaction_probe_limit")]
    pub transaction_probe_limit: u64,

    /// Number of most recent days kept per prize kind
    /// Default: 7
    #[serde(default = "default_prize_retention_days")]
    pub prize_retention_days: u64,

    /// How far below the retention window the eviction scan looks
    /// Default: 100
    #[serde(default = "default_prize_rotation_lookback_days")]
    pub prize_rotation_lookback_days: u64,

    /// Width of the day window searched when correlating claims and expiries
    /// Default: 30
    #[serde(default = "default_claim_scan_days")]
    pub claim_scan_days: u64,

    /// Where the correlation window sits
    #[serde(default)]
    pub claim_scan_window: ScanWindow,

    /// Transfers to this address are projected as fee-pool transactions.
    /// When unset no transfer is projected.
    #[serde(default)]
    pub fee_pool_address: Option<Address>,
}

/// Placement of the claim/expiry correlation window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanWindow {
    /// Days `0 .. claim_scan_days`
    Absolute,
    /// The `claim_scan_days` days ending at the latest win of the prize kind.
    /// Same as `Absolute` until the contract reaches day `claim_scan_days`.
    #[default]
    Trailing,
}

fn default_transaction_cap() -> usize {
    10
}

fn default_transaction_probe_limit() -> u64 {
    64
}

fn default_prize_retention_days() -> u64 {
    7
}

fn default_prize_rotation_lookback_days() -> u64 {
    100
}

fn default_claim_scan_days() -> u64 {
    30
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            transaction_cap: default_transaction_cap(),
            transaction_probe_limit: default_transaction_probe_limit(),
            prize_retention_days: default_prize_retention_days(),
            prize_rotation_lookback_days: default_prize_rotation_lookback_days(),
            claim_scan_days: default_claim_scan_days(),
            claim_scan_window: ScanWindow::default(),
            fee_pool_address: None,
        }
    }
}

impl ProjectorConfig {
    pub fn with_fee_pool(mut self, address: Address) -> Self {
        self.fee_pool_address = Some(address);
        self
    }

    pub fn with_transaction_cap(mut self, cap: usize) -> Self {
        self.transaction_cap = cap;
        self
    }

    pub fn with_prize_retention_days(mut self, days: u64) -> Self {
        self.prize_retention_days = days;
        self
    }

    pub fn with_claim_scan_days(mut self, days: u64) -> Self {
        self.claim_scan_days = days;
        self
    }

    pub fn with_claim_scan_window(mut self, window: ScanWindow) -> Self {
        self.claim_scan_window = window;
        self
    }

    /// Check that the limits are mutually consistent
    pub fn validate(&self) -> Result<()> {
        if self.transaction_cap == 0 {
            return Err(TallyError::Config("transaction_cap must be at least 1".into()));
        }
        if self.transaction_probe_limit < self.transaction_cap as u64 {
            return Err(TallyError::Config(format!(
                "transaction_probe_limit ({}) must not be below transaction_cap ({})",
                self.transaction_probe_limit, self.transaction_cap
            )));
        }
        if self.prize_retention_days == 0 {
            return Err(TallyError::Config(
                "prize_retention_days must be at least 1".into(),
            ));
        }
        if self.claim_scan_days < self.prize_retention_days {
            return Err(TallyError::Config(format!(
                "claim_scan_days ({}) must cover prize_retention_days ({})",
                self.claim_scan_days, self.prize_retention_days
            )));
        }
        Ok(())
    }
}
