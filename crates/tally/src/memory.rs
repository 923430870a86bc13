//! In-memory entity store
//!
//! Ordered map backing for tests and dry runs. Scans follow the same byte
//! ordering as the LMDB backend, so projections behave identically on both.

use std::collections::BTreeMap;
use std::ops::Bound;
use tally_core::{EntityRead, EntityStore, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    state: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Every key/value pair in key order
    pub fn snapshot(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.state
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl EntityRead for MemoryStore {
    fn get_state(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn scan_range(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let upper = match end {
            Some(end) if end <= start => return Ok(Vec::new()),
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        Ok(self
            .state
            .range::<[u8], _>((Bound::Included(start), upper))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl EntityStore for MemoryStore {
    fn put_state(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.state.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn del_state(&mut self, key: &[u8]) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }
}
