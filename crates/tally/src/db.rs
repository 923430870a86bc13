//! Persistent projector
//!
//! Bundles an LMDB entity store with the event router. Each event is
//! projected inside its own write transaction together with the replay
//! cursor, so a failing event leaves no partial writes behind and a restarted
//! replay resumes right after the last committed event.

use crate::events::LoggedEvent;
use crate::router::{ApplyOutcome, EventRouter};
use std::path::Path;
use std::time::{Duration, Instant};
use tally_core::{EntityRead, EventPosition, ProjectorConfig, Result, StoreConfig};
use tally_lmdb::{LmdbEntityStore, LmdbReadTxn};
use tracing::{debug, error, info};

/// How often replay reports progress
const PROGRESS_INTERVAL: u64 = 10_000;

/// Counts from one [`TallyDb::replay`] run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: u64,
    pub ignored: u64,
    pub unmatched: u64,
    /// Events at or before the stored cursor
    pub skipped: u64,
    pub duration: Duration,
    /// Cursor after the run
    pub cursor: Option<EventPosition>,
}

impl ReplayStats {
    pub fn processed(&self) -> u64 {
        self.applied + self.ignored + self.unmatched
    }
}

pub struct TallyDb {
    store: LmdbEntityStore,
    router: EventRouter,
}

impl TallyDb {
    /// Open a store at `path` with default settings
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(
            StoreConfig::new(path.as_ref().to_path_buf()),
            ProjectorConfig::default(),
        )
    }

    pub fn open_with_config(store_config: StoreConfig, projector_config: ProjectorConfig) -> Result<Self> {
        let router = EventRouter::new(projector_config)?;
        let store = LmdbEntityStore::open(store_config)?;
        Ok(Self { store, router })
    }

    pub fn store(&self) -> &LmdbEntityStore {
        &self.store
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    /// Position of the last committed event
    pub fn cursor(&self) -> Result<Option<EventPosition>> {
        self.store.cursor()
    }

    /// Project one event and advance the cursor atomically
    ///
    /// Returns `None` when the event is at or before the cursor and was
    /// skipped.
    pub fn apply(&self, event: &LoggedEvent) -> Result<Option<ApplyOutcome>> {
        let position = event.position();
        let mut txn = self.store.write_txn()?;

        if let Some(cursor) = txn.cursor()? {
            if position <= cursor {
                debug!(%position, %cursor, "Skipping already projected event");
                return Ok(None);
            }
        }

        let outcome = self.router.apply(&mut txn, event)?;
        txn.set_cursor(position)?;
        let info = txn.commit()?;

        debug!(
            %position,
            written = info.state_keys_written,
            deleted = info.state_keys_deleted,
            "Committed event"
        );
        Ok(Some(outcome))
    }

    /// Apply a stream of events in order, stopping at the first error
    pub fn replay<I>(&self, events: I) -> Result<ReplayStats>
    where
        I: IntoIterator<Item = Result<LoggedEvent>>,
    {
        let start = Instant::now();
        let mut stats = ReplayStats::default();

        for event in events {
            let event = event.map_err(|e| {
                error!(error = %e, "Failed to read event");
                e
            })?;

            let outcome = self.apply(&event).map_err(|e| {
                error!(
                    error = %e,
                    position = %event.position(),
                    event = event.event.name(),
                    "Replay aborted"
                );
                e
            })?;

            match outcome {
                Some(ApplyOutcome::Applied) => stats.applied += 1,
                Some(ApplyOutcome::Ignored) => stats.ignored += 1,
                Some(ApplyOutcome::Unmatched) => stats.unmatched += 1,
                None => stats.skipped += 1,
            }

            let seen = stats.processed() + stats.skipped;
            if seen % PROGRESS_INTERVAL == 0 {
                info!(events = seen, position = %event.position(), "Replay progress");
            }
        }

        stats.duration = start.elapsed();
        stats.cursor = self.cursor()?;

        info!(
            applied = stats.applied,
            ignored = stats.ignored,
            unmatched = stats.unmatched,
            skipped = stats.skipped,
            duration_ms = stats.duration.as_millis() as u64,
            "Replay finished"
        );
        Ok(stats)
    }

    /// Drop all projected state and the cursor
    pub fn reset(&self) -> Result<()> {
        self.store.clear()?;
        info!(path = %self.store.path().display(), "Reset projection");
        Ok(())
    }

    pub fn read_txn(&self) -> Result<LmdbReadTxn<'_>> {
        self.store.read_txn()
    }

    /// Every stored entity as raw key/value pairs, in key order
    pub fn snapshot(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.read_txn()?.scan_range(&[], None)
    }
}
