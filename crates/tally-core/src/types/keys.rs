use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity families kept in the store
///
/// Every stored key is `"{prefix}/{id}"`, so a prefix scan over one kind
/// never sees records of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ProtocolStats,
    User,
    Transaction,
    Prize,
    Bid,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::ProtocolStats,
        EntityKind::User,
        EntityKind::Transaction,
        EntityKind::Prize,
        EntityKind::Bid,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::ProtocolStats => "stats",
            EntityKind::User => "user",
            EntityKind::Transaction => "tx",
            EntityKind::Prize => "prize",
            EntityKind::Bid => "bid",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Full store key for an entity id
///
/// Transaction ids are decimal sequence numbers; their key carries the
/// number big-endian so byte order equals numeric order. Every other id is
/// stored as its UTF-8 text.
pub fn entity_key(kind: EntityKind, id: &str) -> Vec<u8> {
    let mut key = kind_prefix(kind);
    match (kind, id.parse::<u64>()) {
        (EntityKind::Transaction, Ok(seq)) => key.extend_from_slice(&seq.to_be_bytes()),
        _ => key.extend_from_slice(id.as_bytes()),
    }
    key
}

/// Key prefix shared by every entity of a kind
pub fn kind_prefix(kind: EntityKind) -> Vec<u8> {
    format!("{}/", kind.prefix()).into_bytes()
}

/// Smallest key greater than every key starting with `prefix`
///
/// Returns None when no such key exists (empty prefix or all bytes 0xff).
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
