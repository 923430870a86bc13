//! Read-optimized entities maintained by the projector

pub mod bid;
pub mod prize;
pub mod stats;
pub mod transaction;
pub mod user;

pub use bid::Bid;
pub use prize::{Prize, PrizeKind, PrizeStatus};
pub use stats::{ProtocolStats, PROTOCOL_STATS_ID};
pub use transaction::{Transaction, TransactionKind};
pub use user::User;
