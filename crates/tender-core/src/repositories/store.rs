//! Transactional entry point of the persistence gateway

use async_trait::async_trait;
use crate::error::DomainError;
use crate::repositories::{BidRepository, MembershipRepository, TenderRepository};

/// One open transaction. Dropping it without `commit` rolls it back.
#[async_trait]
pub trait StoreTx: TenderRepository + BidRepository + MembershipRepository + Send {
    async fn commit(&mut self) -> Result<(), DomainError>;
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, DomainError>;
}
