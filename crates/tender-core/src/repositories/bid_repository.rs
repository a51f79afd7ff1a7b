//! Bid repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Bid, BidStatus, NewBid};
use crate::error::DomainError;

#[async_trait]
pub trait BidRepository: Send {
    async fn insert_bid(&mut self, bid: &NewBid) -> Result<Bid, DomainError>;
    async fn find_bid(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError>;
    async fn find_bid_for_update(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError>;

    /// Overwrites name and description and advances the bid version.
    async fn update_bid_fields(
        &mut self,
        id: &Uuid,
        name: &str,
        description: &str,
    ) -> Result<Option<Bid>, DomainError>;

    async fn update_bid_status(
        &mut self,
        id: &Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, DomainError>;

    /// Newest first.
    async fn list_bids_by_tender(&mut self, tender_id: &Uuid) -> Result<Vec<Bid>, DomainError>;
    /// Newest first.
    async fn list_bids_by_author(&mut self, author_id: &Uuid) -> Result<Vec<Bid>, DomainError>;
}
