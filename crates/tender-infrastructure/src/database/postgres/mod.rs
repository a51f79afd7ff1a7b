//! PostgreSQL repository implementations

pub mod store_impl;
pub mod tender_repo_impl;
pub mod bid_repo_impl;
pub mod membership_repo_impl;

pub use store_impl::{PgStore, PgStoreTx};
