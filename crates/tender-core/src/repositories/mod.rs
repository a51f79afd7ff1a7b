//! Repository traits (ports) and the in-memory adapter

pub mod tender_repository;
pub mod bid_repository;
pub mod membership_repository;
pub mod store;
pub mod memory;

pub use tender_repository::TenderRepository;
pub use bid_repository::BidRepository;
pub use membership_repository::MembershipRepository;
pub use store::{Store, StoreTx};
pub use memory::InMemoryStore;
