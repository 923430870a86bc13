//! JSON-lines event source
//!
//! One [`LoggedEvent`] per line, already in delivery order. Blank lines are
//! skipped; decode failures carry the 1-based line number.

use crate::events::LoggedEvent;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tally_core::{Result, TallyError};

pub struct JsonLinesSource<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
}

impl JsonLinesSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesSource<R> {
    type Item = Result<LoggedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(trimmed).map_err(|e| {
                TallyError::EventDecode(format!("line {}: {}", self.line_number, e))
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ContractEvent;
    use std::io::Cursor;

    const MINT: &str = r#"{"meta":{"block_timestamp":100,"block_number":1,"transaction_hash":"0x0101010101010101010101010101010101010101010101010101010101010101","log_index":0},"event":{"type":"Minted","to":"0x1111111111111111111111111111111111111111","collateral_amount":"0x64","token_amount":"0xc8","fee":"0x2"}}"#;

    #[test]
    fn test_reads_events_and_skips_blank_lines() {
        let input = format!("{}\n\n   \n{}\n", MINT, MINT);
        let events: Vec<LoggedEvent> = JsonLinesSource::new(Cursor::new(input))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0].event, ContractEvent::Minted { .. }));
        assert_eq!(events[0].meta.block_number, 1);
    }

    #[test]
    fn test_decode_error_reports_line() {
        let input = format!("{}\n\n{{\"meta\":{{}}}}\n", MINT);
        let mut source = JsonLinesSource::new(Cursor::new(input));

        assert!(source.next().unwrap().is_ok());
        match source.next().unwrap() {
            Err(TallyError::EventDecode(msg)) => assert!(msg.starts_with("line 3:"), "{}", msg),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
