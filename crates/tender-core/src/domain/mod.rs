//! # Tender Core - Domain Module
//!
//! Domain entities for tenders, their version history, and bids.

pub mod tender;
pub mod tender_version;
pub mod bid;

// Re-export all entities and enums
pub use tender::{NewTender, Tender, TenderStatus};
pub use tender_version::TenderVersion;
pub use bid::{AuthorType, Bid, BidStatus, NewBid};
