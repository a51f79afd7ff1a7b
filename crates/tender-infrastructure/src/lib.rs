//! # Tender Infrastructure
//!
//! PostgreSQL implementation of the tender persistence ports.

pub mod database;

pub use database::{create_pool, ping, run_migrations, PgStore};
