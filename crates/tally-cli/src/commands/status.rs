//! Status command implementation

use crate::config::Settings;
use anyhow::{Context, Result};
use tally::prelude::*;
use tally::query;

pub fn execute(settings: &Settings) -> Result<()> {
    tracing::info!("Checking store status: {}", settings.store.path.display());

    let db = settings.open_db()?;
    let txn = db.read_txn().context("Failed to open read transaction")?;
    let stats = query::stats(&txn).context("Failed to load protocol stats")?;

    println!("\nStore Status");
    println!("{}", "=".repeat(60));
    println!("Path: {}", settings.store.path.display());
    match txn.cursor()? {
        Some(cursor) => println!("Cursor: {}", cursor),
        None => println!("Cursor: (empty)"),
    }

    println!("\nProtocol:");
    println!("  Minted: {}", stats.total_minted);
    println!("  Redeemed: {}", stats.total_redeemed);
    println!("  Fees: {}", stats.total_fees);
    println!("  Fee Transfers: {}", stats.total_fee_transfers);
    println!("  Users: {}", stats.user_count);
    println!("  Transactions: {}", stats.transaction_count);
    println!("  Bids: {}", stats.bid_count);

    println!("\nLottery:");
    println!("  Draws: {}", stats.lottery_count);
    println!("  Awarded: {}", stats.total_lottery_awarded);
    println!("  Claimed: {}", stats.total_lottery_claimed);
    println!("  Expired: {}", stats.total_lottery_expired);

    println!("\nAuction:");
    println!("  Settled: {}", stats.auction_count);
    println!("  Awarded: {}", stats.total_auction_awarded);
    println!("  Paid: {}", stats.total_auction_paid);
    println!("  Claimed: {}", stats.total_auction_claimed);
    println!("  Expired: {}", stats.total_auction_expired);

    let live_transactions = query::recent_transactions(&txn)?.len();
    println!("\nLive Records:");
    println!(
        "  Transactions: {} / {}",
        live_transactions, settings.projector.transaction_cap
    );
    for kind in PrizeKind::ALL {
        let live = query::prizes(&txn, kind)?.len();
        let latest = stats
            .latest_day(kind)
            .map_or_else(|| "-".to_string(), |day| day.to_string());
        println!(
            "  {} prizes: {} / {} (latest day {})",
            kind, live, settings.projector.prize_retention_days, latest
        );
    }

    Ok(())
}
