//! Transaction projector
//!
//! Folds mint, redeem and fee-pool transfer events into sequentially keyed
//! [`Transaction`] records and keeps at most `transaction_cap` of them live.
//!
//! Rotation relies on contiguity: live records always occupy the id range
//! just below the sequence counter, so the probe walks down from
//! `next_transaction_id - 1` until it hits a missing id. The walk is bounded
//! by `transaction_probe_limit`; exceeding it means the store is corrupt.

use crate::accessors;
use crate::entities::{Transaction, TransactionKind, User};
use alloy_primitives::{Address, U256};
use tally_core::{
    observe, Entity, EntityRead, EntityReadExt, EntityStore, EntityStoreExt, EventMeta,
    ProjectorConfig, Result, TallyError,
};
use tracing::debug;

pub struct TransactionProjector {
    cap: usize,
    probe_limit: u64,
}

impl TransactionProjector {
    pub fn new(config: &ProjectorConfig) -> Self {
        Self {
            cap: config.transaction_cap,
            probe_limit: config.transaction_probe_limit,
        }
    }

    /// Record a MINT for `actor`
    pub fn record_mint<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        actor: Address,
        token_amount: U256,
        collateral_amount: U256,
        fee: U256,
        meta: &EventMeta,
    ) -> Result<Transaction> {
        self.record(
            store,
            TransactionKind::Mint,
            actor,
            token_amount,
            collateral_amount,
            fee,
            meta,
        )
    }

    /// Record a REDEEM for `actor`
    pub fn record_redeem<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        actor: Address,
        token_amount: U256,
        collateral_amount: U256,
        fee: U256,
        meta: &EventMeta,
    ) -> Result<Transaction> {
        self.record(
            store,
            TransactionKind::Redeem,
            actor,
            token_amount,
            collateral_amount,
            fee,
            meta,
        )
    }

    /// Record a TRANSFER into the fee pool
    ///
    /// Transfers from the zero address are the mint side of fee routing and
    /// are already counted by the mint; they are dropped and `None` returned.
    pub fn record_fee_transfer<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        source: Address,
        amount: U256,
        meta: &EventMeta,
    ) -> Result<Option<Transaction>> {
        if source == Address::ZERO {
            debug!(block = meta.block_number, "Skipping fee transfer from zero address");
            return Ok(None);
        }
        self.record(
            store,
            TransactionKind::Transfer,
            source,
            amount,
            U256::ZERO,
            U256::ZERO,
            meta,
        )
        .map(Some)
    }

    /// Live records, newest first
    pub fn live<S: EntityRead + ?Sized>(
        &self,
        store: &S,
        next_transaction_id: u64,
    ) -> Result<Vec<Transaction>> {
        let mut live = Vec::new();
        let mut id = next_transaction_id;

        while id > 0 {
            id -= 1;
            match store.load::<Transaction>(&Transaction::id_for(id))? {
                Some(tx) => live.push(tx),
                None => break,
            }
            if live.len() as u64 > self.probe_limit {
                return Err(TallyError::IntegrityViolation(format!(
                    "more than {} contiguous transactions below sequence {}",
                    self.probe_limit, next_transaction_id
                )));
            }
        }

        Ok(live)
    }

    #[allow(clippy::too_many_arguments)]
    fn record<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        kind: TransactionKind,
        actor: Address,
        amount: U256,
        collateral_amount: U256,
        fee: U256,
        meta: &EventMeta,
    ) -> Result<Transaction> {
        let mut stats = accessors::protocol_stats(store)?;
        let mut user = accessors::user(store, &mut stats, actor, meta)?;

        let sequence = stats.next_transaction_id;
        let live = self.rotate(store, sequence)?;

        let id = Transaction::id_for(sequence);
        if store.contains::<Transaction>(&id)? {
            return Err(TallyError::IntegrityViolation(format!(
                "transaction id {} already in use",
                sequence
            )));
        }

        let tx = Transaction {
            sequence,
            kind,
            actor,
            amount,
            collateral_amount,
            fee,
            timestamp: meta.block_timestamp,
            block_number: meta.block_number,
            transaction_hash: meta.transaction_hash,
            user: User::id_for(actor),
        };
        store.save(&tx)?;

        stats.next_transaction_id = sequence + 1;
        stats.transaction_count += 1;
        user.transaction_count += 1;
        match kind {
            TransactionKind::Mint => {
                stats.total_minted = stats.total_minted.saturating_add(amount);
                stats.total_fees = stats.total_fees.saturating_add(fee);
                user.total_minted = user.total_minted.saturating_add(amount);
            }
            TransactionKind::Redeem => {
                stats.total_redeemed = stats.total_redeemed.saturating_add(amount);
                stats.total_fees = stats.total_fees.saturating_add(fee);
                user.total_redeemed = user.total_redeemed.saturating_add(amount);
            }
            TransactionKind::Transfer => {
                stats.total_fee_transfers = stats.total_fee_transfers.saturating_add(amount);
            }
        }

        store.save(&user)?;
        accessors::save_stats(store, &stats)?;
        observe::set_live_transactions(live + 1);

        debug!(
            sequence,
            kind = %kind,
            actor = %tx.user,
            %amount,
            "Recorded transaction"
        );

        Ok(tx)
    }

    /// Make room for one more record; returns how many remain live
    fn rotate<S: EntityStore + ?Sized>(
        &self,
        store: &mut S,
        next_transaction_id: u64,
    ) -> Result<usize> {
        let mut live = self.live(store, next_transaction_id)?;
        if live.len() < self.cap {
            return Ok(live.len());
        }

        let evict = live.len() + 1 - self.cap;
        live.sort_by_key(|tx| (tx.timestamp, tx.sequence));
        for tx in &live[..evict] {
            store.remove::<Transaction>(&tx.id())?;
            debug!(sequence = tx.sequence, "Evicted transaction");
        }
        observe::record_rotation("transaction", evict);

        Ok(live.len() - evict)
    }
}
