use lmdb::{Database, RoTransaction, RwTransaction, Transaction, WriteFlags};
use tally_core::{EntityRead, EntityStore, EventPosition, Result, TallyError};

use crate::keys::meta_keys;
use crate::scan::collect_range;

/// Counts reported by a committed write transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitInfo {
    pub state_keys_written: usize,
    pub state_keys_deleted: usize,
}

/// Write transaction over the entity store
///
/// Everything written through one transaction, including the replay cursor,
/// becomes visible atomically on commit. Dropping without commit aborts.
pub struct LmdbWriteTxn<'a> {
    txn: Option<RwTransaction<'a>>,
    state_db: Database,
    meta_db: Database,
    stats: CommitInfo,
}

impl<'a> LmdbWriteTxn<'a> {
    pub(crate) fn new(txn: RwTransaction<'a>, state_db: Database, meta_db: Database) -> Self {
        Self {
            txn: Some(txn),
            state_db,
            meta_db,
            stats: CommitInfo::default(),
        }
    }

    fn txn(&self) -> Result<&RwTransaction<'a>> {
        self.txn
            .as_ref()
            .ok_or_else(|| TallyError::InvalidState("Transaction already committed".into()))
    }

    fn txn_mut(&mut self) -> Result<&mut RwTransaction<'a>> {
        self.txn
            .as_mut()
            .ok_or_else(|| TallyError::InvalidState("Transaction already committed".into()))
    }

    /// Position of the last event whose projection was committed
    pub fn cursor(&self) -> Result<Option<EventPosition>> {
        read_cursor(self.txn()?, self.meta_db)
    }

    pub fn set_cursor(&mut self, position: EventPosition) -> Result<()> {
        let meta_db = self.meta_db;
        let bytes = serde_json::to_vec(&position)?;
        self.txn_mut()?
            .put(meta_db, &meta_keys::CURSOR, &bytes, WriteFlags::empty())
            .map_err(|e| TallyError::Store(e.to_string()))
    }

    /// Remove every entity and the replay cursor
    pub fn clear_all(&mut self) -> Result<()> {
        let (state_db, meta_db) = (self.state_db, self.meta_db);
        let txn = self.txn_mut()?;
        txn.clear_db(state_db)
            .map_err(|e| TallyError::Store(e.to_string()))?;
        match txn.del(meta_db, &meta_keys::CURSOR, None) {
            Ok(()) | Err(lmdb::Error::NotFound) => Ok(()),
            Err(e) => Err(TallyError::Store(e.to_string())),
        }
    }

    pub fn commit(mut self) -> Result<CommitInfo> {
        let txn = self
            .txn
            .take()
            .ok_or_else(|| TallyError::InvalidState("Transaction already committed".into()))?;
        txn.commit().map_err(|e| TallyError::Store(e.to_string()))?;
        Ok(self.stats)
    }
}

impl<'a> EntityRead for LmdbWriteTxn<'a> {
    fn get_state(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.txn()?.get(self.state_db, &key) {
            Ok(bytes) => Ok(Some(bytes.to_vec())),
            Err(lmdb::Error::NotFound) => Ok(None),
            Err(e) => Err(TallyError::Store(e.to_string())),
        }
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        collect_range(self.txn()?, self.state_db, start, end)
    }
}

impl<'a> EntityStore for LmdbWriteTxn<'a> {
    fn put_state(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let state_db = self.state_db;
        self.txn_mut()?
            .put(state_db, &key, &value, WriteFlags::empty())
            .map_err(|e| TallyError::Store(e.to_string()))?;
        self.stats.state_keys_written += 1;
        Ok(())
    }

    fn del_state(&mut self, key: &[u8]) -> Result<()> {
        let state_db = self.state_db;
        match self.txn_mut()?.del(state_db, &key, None) {
            Ok(()) => {
                self.stats.state_keys_deleted += 1;
                Ok(())
            }
            Err(lmdb::Error::NotFound) => Ok(()), // Idempotent
            Err(e) => Err(TallyError::Store(e.to_string())),
        }
    }
}

impl<'a> Drop for LmdbWriteTxn<'a> {
    fn drop(&mut self) {
        if let Some(txn) = self.txn.take() {
            txn.abort();
        }
    }
}

/// Read-only transaction for the query side
///
/// Sees a consistent snapshot and never blocks the writer.
pub struct LmdbReadTxn<'a> {
    txn: RoTransaction<'a>,
    state_db: Database,
    meta_db: Database,
}

impl<'a> LmdbReadTxn<'a> {
    pub(crate) fn new(txn: RoTransaction<'a>, state_db: Database, meta_db: Database) -> Self {
        Self {
            txn,
            state_db,
            meta_db,
        }
    }

    pub fn cursor(&self) -> Result<Option<EventPosition>> {
        read_cursor(&self.txn, self.meta_db)
    }
}

impl<'a> EntityRead for LmdbReadTxn<'a> {
    fn get_state(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.txn.get(self.state_db, &key) {
            Ok(bytes) => Ok(Some(bytes.to_vec())),
            Err(lmdb::Error::NotFound) => Ok(None),
            Err(e) => Err(TallyError::Store(e.to_string())),
        }
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        collect_range(&self.txn, self.state_db, start, end)
    }
}

fn read_cursor<T: Transaction>(txn: &T, meta_db: Database) -> Result<Option<EventPosition>> {
    match txn.get(meta_db, &meta_keys::CURSOR) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
        Err(lmdb::Error::NotFound) => Ok(None),
        Err(e) => Err(TallyError::Store(e.to_string())),
    }
}
