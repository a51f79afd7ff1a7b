// ============================================================================
// Tender Core - Bid Service
// File: crates/tender-core/src/services/bid_service.rs
// ============================================================================
//! Bid lifecycle: creation, listings, status changes and edits.
//!
//! Reads and mutations of an existing bid are gated on organizational
//! access through the bid's tender, not on authorship.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{AuthorType, Bid, BidStatus, NewBid};
use crate::error::DomainError;
use crate::repositories::{BidRepository, MembershipRepository, Store, StoreTx};
use crate::services::access;

/// Input for [`BidService::create`]
#[derive(Debug, Clone, Validate)]
pub struct CreateBidRequest {
    #[validate(length(min = 1, message = "Bid name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Bid description is required"))]
    pub description: String,

    pub tender_id: Uuid,
    pub author_type: AuthorType,
    pub author_id: Uuid,
}

/// Input for [`BidService::edit`]; both fields are overwritten.
#[derive(Debug, Clone, Validate)]
pub struct EditBidRequest {
    pub bid_id: Uuid,
    pub username: String,

    #[validate(length(min = 1, message = "Bid name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Bid description is required"))]
    pub description: String,
}

pub struct BidService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> BidService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Submit a bid. The status always starts at `Created`; the referenced
    /// tender is not checked for existence.
    pub async fn create(&self, request: CreateBidRequest) -> Result<Bid, DomainError> {
        request.validate()?;
        if request.tender_id.is_nil() || request.author_id.is_nil() {
            return Err(DomainError::InvalidInput(
                "Tender id and author id are required".to_string(),
            ));
        }

        let mut tx = self.store.begin().await?;
        let bid = tx
            .insert_bid(&NewBid {
                name: request.name,
                description: request.description,
                status: BidStatus::Created,
                tender_id: request.tender_id,
                author_type: request.author_type,
                author_id: request.author_id,
            })
            .await?;
        tx.commit().await?;

        info!("Bid created: {} for tender {}", bid.id, bid.tender_id);
        Ok(bid)
    }

    /// Bids on a tender, newest first. Caller must belong to the tender's
    /// organization.
    pub async fn list_by_tender(
        &self,
        tender_id: &Uuid,
        username: &str,
    ) -> Result<Vec<Bid>, DomainError> {
        let mut tx = self.store.begin().await?;
        if !access::has_organization_access_to_tender(tx.as_mut(), username, tender_id).await? {
            warn!("{} denied bid listing for tender {}", username, tender_id);
            return Err(access::deny(format!(
                "{} is not authorized to view bids for tender {}",
                username, tender_id
            )));
        }

        let bids = tx.list_bids_by_tender(tender_id).await?;
        tx.commit().await?;
        Ok(bids)
    }

    /// Bids by one author, newest first.
    pub async fn list_by_author(&self, author_id: &Uuid) -> Result<Vec<Bid>, DomainError> {
        let mut tx = self.store.begin().await?;
        let bids = tx.list_bids_by_author(author_id).await?;
        tx.commit().await?;
        Ok(bids)
    }

    /// Resolves `username` to its employee id, then lists that author's bids.
    pub async fn list_by_author_username(&self, username: &str) -> Result<Vec<Bid>, DomainError> {
        let mut tx = self.store.begin().await?;
        let author_id = tx.find_employee_id(username).await?.ok_or_else(|| DomainError::NotFound {
            entity: "employee",
            id: username.to_string(),
        })?;

        let bids = tx.list_bids_by_author(&author_id).await?;
        tx.commit().await?;
        Ok(bids)
    }

    pub async fn get_status(
        &self,
        bid_id: &Uuid,
        username: &str,
    ) -> Result<BidStatus, DomainError> {
        let mut tx = self.store.begin().await?;
        let bid = tx
            .find_bid(bid_id)
            .await?
            .ok_or_else(|| DomainError::bid_not_found(bid_id))?;
        ensure_bid_access(tx.as_mut(), username, bid_id).await?;
        tx.commit().await?;
        Ok(bid.status)
    }

    /// Any value may be set by an actor with organizational access. The
    /// version is not advanced.
    pub async fn update_status(
        &self,
        bid_id: &Uuid,
        username: &str,
        new_status: BidStatus,
    ) -> Result<(), DomainError> {
        let mut tx = self.store.begin().await?;
        let bid = load_for_update(tx.as_mut(), bid_id).await?;
        ensure_bid_access(tx.as_mut(), username, bid_id).await?;

        tx.update_bid_status(bid_id, new_status)
            .await?
            .ok_or_else(|| DomainError::bid_not_found(bid_id))?;
        tx.commit().await?;

        info!(
            "Bid {} status changed {} -> {} by {}",
            bid_id, bid.status, new_status, username
        );
        Ok(())
    }

    /// Full overwrite of name and description; the store advances the version.
    pub async fn edit(&self, request: EditBidRequest) -> Result<(), DomainError> {
        request.validate()?;
        let bid_id = &request.bid_id;

        let mut tx = self.store.begin().await?;
        load_for_update(tx.as_mut(), bid_id).await?;
        ensure_bid_access(tx.as_mut(), &request.username, bid_id).await?;

        let updated = tx
            .update_bid_fields(bid_id, &request.name, &request.description)
            .await?
            .ok_or_else(|| DomainError::bid_not_found(bid_id))?;
        tx.commit().await?;

        info!(
            "Bid {} edited by {}, now at version {}",
            bid_id, request.username, updated.version
        );
        Ok(())
    }
}

async fn load_for_update(tx: &mut dyn StoreTx, bid_id: &Uuid) -> Result<Bid, DomainError> {
    tx.find_bid_for_update(bid_id)
        .await?
        .ok_or_else(|| DomainError::bid_not_found(bid_id))
}

async fn ensure_bid_access(
    tx: &mut dyn StoreTx,
    username: &str,
    bid_id: &Uuid,
) -> Result<(), DomainError> {
    if access::has_access_to_bid(tx, username, bid_id).await? {
        return Ok(());
    }

    warn!("{} has no organizational access to bid {}", username, bid_id);
    Err(access::deny(format!("{} is not authorized to access bid {}", username, bid_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;
    use crate::ErrorKind;

    fn request(tender_id: Uuid, author_id: Uuid) -> CreateBidRequest {
        CreateBidRequest {
            name: "Fast delivery".to_string(),
            description: "Two days".to_string(),
            tender_id,
            author_type: AuthorType::User,
            author_id,
        }
    }

    fn edit_request(bid_id: Uuid, username: &str, name: &str, description: &str) -> EditBidRequest {
        EditBidRequest {
            bid_id,
            username: username.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_forces_initial_status() {
        let service = BidService::new(Arc::new(InMemoryStore::new()));

        let bid = service.create(request(Uuid::new_v4(), Uuid::new_v4())).await.unwrap();

        assert_eq!(bid.status, BidStatus::Created);
        assert_eq!(bid.version, 1);
    }

    #[tokio::test]
    async fn test_create_rejects_missing_fields() {
        let service = BidService::new(Arc::new(InMemoryStore::new()));

        let mut bad = request(Uuid::new_v4(), Uuid::new_v4());
        bad.description = String::new();
        assert_eq!(service.create(bad).await.unwrap_err().kind(), ErrorKind::InvalidInput);

        let bad = request(Uuid::nil(), Uuid::new_v4());
        assert_eq!(service.create(bad).await.unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_unknown_bid_is_not_found() {
        let service = BidService::new(Arc::new(InMemoryStore::new()));
        let missing = Uuid::new_v4();

        let err = service.get_status(&missing, "carol").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.edit(edit_request(missing, "carol", "n", "d")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_by_unknown_username_is_not_found() {
        let service = BidService::new(Arc::new(InMemoryStore::new()));

        let err = service.list_by_author_username("nobody").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_by_author_username_resolves_employee() {
        let store = Arc::new(InMemoryStore::new());
        let dave = store.add_employee("dave").await;
        let service = BidService::new(store);

        service.create(request(Uuid::new_v4(), dave)).await.unwrap();
        service.create(request(Uuid::new_v4(), Uuid::new_v4())).await.unwrap();

        let bids = service.list_by_author_username("dave").await.unwrap();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].author_id, dave);
    }

    #[tokio::test]
    async fn test_edit_applies_create_rules() {
        let store = Arc::new(InMemoryStore::new());
        let org_id = Uuid::new_v4();
        let carol = store.add_employee("carol").await;
        store.add_responsible(carol, org_id).await;

        let tenders = crate::services::TenderService::new(store.clone());
        let tender = tenders
            .create(crate::services::CreateTenderRequest {
                name: "Catering".to_string(),
                description: "Lunch for 40".to_string(),
                service_type: "Delivery".to_string(),
                status: crate::domain::TenderStatus::Published,
                organization_id: org_id,
                creator_username: "carol".to_string(),
            })
            .await
            .unwrap();

        let service = BidService::new(store);
        let bid = service.create(request(tender.id, carol)).await.unwrap();

        let err = service.edit(edit_request(bid.id, "carol", "n", "")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = service.edit(edit_request(bid.id, "carol", "", "d")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let bids = service.list_by_author(&carol).await.unwrap();
        assert_eq!(bids[0].description, "Two days");
        assert_eq!(bids[0].version, 1);

        service.edit(edit_request(bid.id, "carol", "n", "d")).await.unwrap();
        let bids = service.list_by_author(&carol).await.unwrap();
        assert_eq!(bids[0].description, "d");
        assert_eq!(bids[0].version, 2);
    }
}
