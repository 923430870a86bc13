use lmdb::{Cursor, Database, Transaction};
use tally_core::{Result, TallyError};

/// Collect every `(key, value)` with `start <= key < end`
///
/// Results are copied out so they outlive the cursor.
pub fn collect_range<T: Transaction>(
    txn: &T,
    db: Database,
    start: &[u8],
    end: Option<&[u8]>,
) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut results = Vec::new();

    let mut cursor = txn
        .open_ro_cursor(db)
        .map_err(|e| TallyError::Store(e.to_string()))?;

    // Position cursor at start key or first key >= start
    let iter = if !start.is_empty() {
        cursor.iter_from(start)
    } else {
        cursor.iter_start()
    };

    for (key, value) in iter {
        let key_bytes: &[u8] = key;
        let value_bytes: &[u8] = value;
        if let Some(end_key) = end {
            if key_bytes >= end_key {
                break;
            }
        }
        results.push((key_bytes.to_vec(), value_bytes.to_vec()));
    }

    Ok(results)
}
