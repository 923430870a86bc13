//! Replay through the LMDB-backed `TallyDb`: determinism, resume from the
//! stored cursor, and rollback of a failing event.

mod common;

use common::*;
use std::io::Write;
use tally::prelude::*;
use tally::query;
use tempfile::TempDir;

fn open_db(temp: &TempDir, name: &str) -> Result<TallyDb> {
    TallyDb::open_with_config(StoreConfig::new(temp.path().join(name)), config())
}

fn ok_events(log: &EventLog) -> impl Iterator<Item = Result<LoggedEvent>> + '_ {
    log.events().iter().cloned().map(Ok)
}

#[test]
fn test_replay_is_deterministic_across_stores() -> Result<()> {
    let temp = TempDir::new()?;
    let log = mixed_log();

    let first = open_db(&temp, "first")?;
    let second = open_db(&temp, "second")?;
    let stats = first.replay(ok_events(&log))?;
    second.replay(ok_events(&log))?;

    assert_eq!(stats.processed(), log.events().len() as u64);
    assert_eq!(stats.skipped, 0);
    assert_eq!(first.snapshot()?, second.snapshot()?);

    // The in-memory projection writes the same bytes
    let router = EventRouter::new(config())?;
    let mut memory = MemoryStore::new();
    for event in log.events() {
        router.apply(&mut memory, event)?;
    }
    assert_eq!(first.snapshot()?, memory.snapshot());
    Ok(())
}

#[test]
fn test_resume_from_cursor() -> Result<()> {
    let temp = TempDir::new()?;
    let log = mixed_log();
    let half = log.events().len() / 2;

    let resumed = open_db(&temp, "resumed")?;
    resumed.replay(log.events()[..half].iter().cloned().map(Ok))?;
    assert_eq!(resumed.cursor()?, Some(log.events()[half - 1].position()));

    let stats = resumed.replay(ok_events(&log))?;
    assert_eq!(stats.skipped, half as u64);
    assert_eq!(stats.processed(), (log.events().len() - half) as u64);

    let one_shot = open_db(&temp, "one_shot")?;
    one_shot.replay(ok_events(&log))?;
    assert_eq!(resumed.snapshot()?, one_shot.snapshot()?);
    Ok(())
}

#[test]
fn test_reopen_keeps_projection() -> Result<()> {
    let temp = TempDir::new()?;
    let log = mixed_log();

    let before = {
        let db = open_db(&temp, "db")?;
        db.replay(ok_events(&log))?;
        db.snapshot()?
    };

    let db = open_db(&temp, "db")?;
    assert_eq!(db.snapshot()?, before);
    assert_eq!(db.cursor()?, log.events().last().map(|e| e.position()));
    Ok(())
}

#[test]
fn test_failing_event_is_rolled_back() -> Result<()> {
    let temp = TempDir::new()?;
    let db = open_db(&temp, "db")?;

    let mut log = EventLog::new();
    for _ in 0..11 {
        log.push(minted(addr(1), 100, 1));
    }
    db.replay(ok_events(&log))?;

    // Occupy the id the next mint will be assigned
    {
        let mut txn = db.store().write_txn()?;
        txn.save(&Transaction {
            sequence: 11,
            kind: TransactionKind::Mint,
            actor: addr(2),
            amount: amount(1),
            collateral_amount: amount(0),
            fee: amount(0),
            timestamp: 0,
            block_number: 0,
            transaction_hash: B256::ZERO,
            user: User::id_for(addr(2)),
        })?;
        txn.commit()?;
    }
    let before = db.snapshot()?;
    let cursor = db.cursor()?;

    log.push(minted(addr(1), 100, 1));
    let err = db.replay(ok_events(&log)).unwrap_err();
    assert!(matches!(err, TallyError::IntegrityViolation(_)), "{}", err);

    // The eviction of sequence 1 ran before the violation and was undone
    assert_eq!(db.snapshot()?, before);
    assert_eq!(db.cursor()?, cursor);
    let oldest: Option<Transaction> = db.read_txn()?.load(&Transaction::id_for(1))?;
    assert!(oldest.is_some());
    Ok(())
}

#[test]
fn test_reset_then_replay_from_scratch() -> Result<()> {
    let temp = TempDir::new()?;
    let db = open_db(&temp, "db")?;
    let log = mixed_log();

    db.replay(ok_events(&log))?;
    let first = db.snapshot()?;

    db.reset()?;
    assert!(db.snapshot()?.is_empty());
    assert_eq!(db.cursor()?, None);

    let stats = db.replay(ok_events(&log))?;
    assert_eq!(stats.skipped, 0);
    assert_eq!(db.snapshot()?, first);
    Ok(())
}

#[test]
fn test_replay_from_json_lines() -> Result<()> {
    let temp = TempDir::new()?;
    let log = mixed_log();

    let path = temp.path().join("events.jsonl");
    {
        let mut file = std::fs::File::create(&path)?;
        for event in log.events() {
            writeln!(file, "{}", serde_json::to_string(event)?)?;
        }
    }

    let from_file = open_db(&temp, "from_file")?;
    from_file.replay(JsonLinesSource::open(&path)?)?;

    let direct = open_db(&temp, "direct")?;
    direct.replay(ok_events(&log))?;
    assert_eq!(from_file.snapshot()?, direct.snapshot()?);

    let stats = query::stats(&from_file.read_txn()?)?;
    assert_eq!(stats.lottery_count, 20);
    Ok(())
}

#[test]
fn test_decode_error_stops_replay_after_last_good_event() -> Result<()> {
    let temp = TempDir::new()?;
    let db = open_db(&temp, "db")?;
    let log = mixed_log();

    let events = log.events()[..3]
        .iter()
        .cloned()
        .map(Ok)
        .chain(std::iter::once(Err(TallyError::EventDecode("line 4: bad".into()))))
        .chain(log.events()[3..].iter().cloned().map(Ok));

    let err = db.replay(events).unwrap_err();
    assert!(matches!(err, TallyError::EventDecode(_)));
    assert_eq!(db.cursor()?, Some(log.events()[2].position()));
    Ok(())
}
