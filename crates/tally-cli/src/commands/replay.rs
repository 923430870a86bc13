//! Replay command implementation

use crate::config::Settings;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tally::prelude::*;

pub fn execute(settings: &Settings, events: PathBuf, from_scratch: bool) -> Result<()> {
    let db = settings.open_db()?;

    if from_scratch {
        db.reset().context("Failed to reset projection")?;
        println!("Cleared projection at {}", settings.store.path.display());
    } else if let Some(cursor) = db.cursor()? {
        println!("Resuming after event {}", cursor);
    }

    let source = JsonLinesSource::open(&events)
        .with_context(|| format!("Failed to open {}", events.display()))?;
    let stats = db
        .replay(source)
        .with_context(|| format!("Replay of {} failed", events.display()))?;

    println!(
        "✓ Applied {} events ({} ignored, {} unmatched, {} skipped) in {:?}",
        stats.applied, stats.ignored, stats.unmatched, stats.skipped, stats.duration
    );
    if let Some(cursor) = stats.cursor {
        println!("Cursor: {}", cursor);
    }
    if stats.unmatched > 0 {
        println!(
            "⚠️  {} claim/expiry event(s) matched no prize; consider widening claim_scan_days",
            stats.unmatched
        );
    }

    Ok(())
}
