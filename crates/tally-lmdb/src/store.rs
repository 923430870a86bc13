use lmdb::{Database, DatabaseFlags, Environment, EnvironmentFlags, Transaction, WriteFlags};
use std::path::{Path, PathBuf};
use tally_core::{EventPosition, Result, StoreConfig, SyncMode, TallyError};

use crate::keys::{meta_keys, SCHEMA_VERSION};
use crate::txn::{LmdbReadTxn, LmdbWriteTxn};

/// LMDB-backed entity store
///
/// Entities live in the `state` database; the replay cursor and schema
/// version live in `meta`. LMDB admits a single writer at a time, which is
/// all the projector needs.
pub struct LmdbEntityStore {
    env: Environment,
    state_db: Database,
    meta_db: Database,
    path: PathBuf,
}

impl LmdbEntityStore {
    /// Open (or create) a store
    pub fn open(cfg: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&cfg.path)?;

        let mut env_builder = Environment::new();
        env_builder.set_max_dbs(2); // state, meta
        env_builder.set_map_size(cfg.map_size);

        let mut flags = EnvironmentFlags::empty();
        match cfg.sync_mode {
            SyncMode::Full => {}
            SyncMode::NoMetaSync => {
                flags.insert(EnvironmentFlags::NO_META_SYNC);
            }
            SyncMode::NoSync => {
                flags.insert(EnvironmentFlags::NO_SYNC);
            }
        }
        env_builder.set_flags(flags);

        let env = env_builder
            .open(&cfg.path)
            .map_err(|e| TallyError::Io(std::io::Error::other(e)))?;

        let state_db = env
            .create_db(Some("state"), DatabaseFlags::empty())
            .map_err(|e| TallyError::Store(e.to_string()))?;
        let meta_db = env
            .create_db(Some("meta"), DatabaseFlags::empty())
            .map_err(|e| TallyError::Store(e.to_string()))?;

        // Stamp or check the schema version
        {
            let mut txn = env
                .begin_rw_txn()
                .map_err(|e| TallyError::Store(e.to_string()))?;

            let existing = match txn.get(meta_db, &meta_keys::SCHEMA_VERSION) {
                Ok(bytes) => Some(
                    std::str::from_utf8(bytes)
                        .ok()
                        .and_then(|s| s.parse::<u32>().ok())
                        .ok_or_else(|| {
                            TallyError::Serialization("unreadable schema version".into())
                        })?,
                ),
                Err(lmdb::Error::NotFound) => None,
                Err(e) => return Err(TallyError::Store(e.to_string())),
            };

            match existing {
                Some(version) if version != SCHEMA_VERSION => {
                    return Err(TallyError::Config(format!(
                        "store at {} has schema version {}, expected {}",
                        cfg.path.display(),
                        version,
                        SCHEMA_VERSION
                    )));
                }
                Some(_) => {}
                None => {
                    txn.put(
                        meta_db,
                        &meta_keys::SCHEMA_VERSION,
                        &SCHEMA_VERSION.to_string(),
                        WriteFlags::empty(),
                    )
                    .map_err(|e| TallyError::Store(e.to_string()))?;
                }
            }

            txn.commit()
                .map_err(|e| TallyError::Store(e.to_string()))?;
        }

        tracing::debug!(path = %cfg.path.display(), "Opened entity store");

        Ok(Self {
            env,
            state_db,
            meta_db,
            path: cfg.path,
        })
    }

    /// Begin a write transaction
    pub fn write_txn(&self) -> Result<LmdbWriteTxn<'_>> {
        let txn = self
            .env
            .begin_rw_txn()
            .map_err(|e| TallyError::Store(e.to_string()))?;
        Ok(LmdbWriteTxn::new(txn, self.state_db, self.meta_db))
    }

    /// Begin a read-only transaction
    pub fn read_txn(&self) -> Result<LmdbReadTxn<'_>> {
        let txn = self
            .env
            .begin_ro_txn()
            .map_err(|e| TallyError::Store(e.to_string()))?;
        Ok(LmdbReadTxn::new(txn, self.state_db, self.meta_db))
    }

    /// Position of the last committed event, if any
    pub fn cursor(&self) -> Result<Option<EventPosition>> {
        self.read_txn()?.cursor()
    }

    /// Drop every entity and the cursor
    pub fn clear(&self) -> Result<()> {
        let mut txn = self.write_txn()?;
        txn.clear_all()?;
        txn.commit()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::{EntityRead, EntityStore};
    use tempfile::TempDir;

    fn open_store() -> (LmdbEntityStore, TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let store = LmdbEntityStore::open(StoreConfig::new(temp.path().join("store"))).unwrap();
        (store, temp)
    }

    #[test]
    fn test_write_and_read_state() {
        let (store, _temp) = open_store();

        let mut txn = store.write_txn().unwrap();
        txn.put_state(b"user/a", b"1").unwrap();
        txn.put_state(b"user/b", b"2").unwrap();
        let info = txn.commit().unwrap();
        assert_eq!(info.state_keys_written, 2);

        let read = store.read_txn().unwrap();
        assert_eq!(read.get_state(b"user/a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(read.get_state(b"user/c").unwrap(), None);
    }

    #[test]
    fn test_dropped_txn_is_rolled_back() {
        let (store, _temp) = open_store();

        {
            let mut txn = store.write_txn().unwrap();
            txn.put_state(b"user/a", b"1").unwrap();
            txn.set_cursor(EventPosition {
                block_number: 1,
                log_index: 0,
            })
            .unwrap();
        }

        assert_eq!(store.read_txn().unwrap().get_state(b"user/a").unwrap(), None);
        assert_eq!(store.cursor().unwrap(), None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _temp) = open_store();

        let mut txn = store.write_txn().unwrap();
        txn.put_state(b"tx/1", b"x").unwrap();
        txn.del_state(b"tx/1").unwrap();
        txn.del_state(b"tx/1").unwrap();
        let info = txn.commit().unwrap();
        assert_eq!(info.state_keys_deleted, 1);
    }

    #[test]
    fn test_prefix_and_range_scan() {
        let (store, _temp) = open_store();

        let mut txn = store.write_txn().unwrap();
        for key in ["tx/01", "tx/02", "tx/03", "user/a", "prize/1-lottery"] {
            txn.put_state(key.as_bytes(), b"v").unwrap();
        }
        txn.commit().unwrap();

        let read = store.read_txn().unwrap();
        let keys: Vec<Vec<u8>> = read
            .scan_prefix(b"tx/")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"tx/01".to_vec(), b"tx/02".to_vec(), b"tx/03".to_vec()]);

        let range = read.scan_range(b"tx/02", Some(b"tx/03")).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(range[0].0, b"tx/02".to_vec());

        assert!(read.scan_prefix(b"bid/").unwrap().is_empty());
    }

    #[test]
    fn test_cursor_and_clear() {
        let (store, _temp) = open_store();
        let position = EventPosition {
            block_number: 42,
            log_index: 3,
        };

        let mut txn = store.write_txn().unwrap();
        txn.put_state(b"stats/protocol", b"{}").unwrap();
        txn.set_cursor(position).unwrap();
        txn.commit().unwrap();
        assert_eq!(store.cursor().unwrap(), Some(position));

        store.clear().unwrap();
        assert_eq!(store.cursor().unwrap(), None);
        assert!(store.read_txn().unwrap().scan_prefix(b"").unwrap().is_empty());
    }

    #[test]
    fn test_reopen_keeps_state() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("store");

        {
            let store = LmdbEntityStore::open(StoreConfig::new(&path)).unwrap();
            let mut txn = store.write_txn().unwrap();
            txn.put_state(b"user/a", b"1").unwrap();
            txn.commit().unwrap();
        }

        let store = LmdbEntityStore::open(StoreConfig::new(&path)).unwrap();
        assert_eq!(
            store.read_txn().unwrap().get_state(b"user/a").unwrap(),
            Some(b"1".to_vec())
        );
    }
}
