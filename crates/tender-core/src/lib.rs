//! # Tender Core
//!
//! Domain entities, persistence ports, authorization predicates, and the
//! tender/bid lifecycle services.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, ErrorKind};
