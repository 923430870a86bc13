//! Show command implementations

use super::format_timestamp;
use crate::config::Settings;
use alloy_primitives::Address;
use anyhow::{Context, Result};
use tally::prelude::*;
use tally::query;

pub fn transactions(settings: &Settings) -> Result<()> {
    let db = settings.open_db()?;
    let txn = db.read_txn()?;
    let live = query::recent_transactions(&txn).context("Failed to scan transactions")?;

    if live.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    for tx in live {
        println!(
            "#{:<6} {:<8} {}  {}  amount={} collateral={} fee={}",
            tx.sequence,
            tx.kind.as_str(),
            format_timestamp(tx.timestamp),
            tx.actor,
            tx.amount,
            tx.collateral_amount,
            tx.fee
        );
    }
    Ok(())
}

pub fn prizes(settings: &Settings, kind: PrizeKind) -> Result<()> {
    let db = settings.open_db()?;
    let txn = db.read_txn()?;
    let prizes = query::prizes(&txn, kind).context("Failed to scan prizes")?;

    if prizes.is_empty() {
        println!("No {} prizes", kind);
        return Ok(());
    }

    for prize in prizes {
        let winner = if prize.is_placeholder() {
            "(pending)".to_string()
        } else {
            prize.winner.to_string()
        };
        let state = match prize.status {
            PrizeStatus::Open => "open".to_string(),
            PrizeStatus::Claimed { at, .. } => format!("claimed {}", format_timestamp(at)),
            PrizeStatus::Expired { at, beneficiary, .. } => {
                format!("expired {} -> {}", format_timestamp(at), beneficiary)
            }
        };

        print!("day {:<6} {}  amount={}", prize.day, winner, prize.amount);
        if let Some(paid) = prize.paid_amount {
            print!(" paid={}", paid);
        }
        if prize.kind == PrizeKind::Auction {
            print!(" bids={}", prize.bid_count());
        }
        println!("  [{}]", state);
    }
    Ok(())
}

pub fn user(settings: &Settings, address: Address) -> Result<()> {
    let db = settings.open_db()?;
    let txn = db.read_txn()?;

    let Some(user) = query::user(&txn, address)? else {
        println!("No activity for {}", address);
        return Ok(());
    };

    println!("\nUser {}", user.address);
    println!("{}", "=".repeat(60));
    println!("First Seen Block: {}", user.first_seen_block);
    println!("Minted: {}", user.total_minted);
    println!("Redeemed: {}", user.total_redeemed);
    println!("Transactions: {}", user.transaction_count);
    println!("Lottery Wins: {} ({})", user.lottery_wins, user.lottery_winnings);
    println!("Auction Wins: {} ({})", user.auction_wins, user.auction_winnings);
    println!("Auction Spent: {}", user.auction_spent);
    println!("Bids: {}", user.bid_count);
    Ok(())
}
