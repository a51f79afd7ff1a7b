// ============================================================================
// Tender Core - Tender Service
// File: crates/tender-core/src/services/tender_service.rs
// ============================================================================
//! Tender lifecycle: creation, status transitions, creator-gated field
//! edits, version history and rollback.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{NewTender, Tender, TenderStatus, TenderVersion};
use crate::error::DomainError;
use crate::repositories::{Store, StoreTx, TenderRepository};
use crate::services::access;

/// Input for [`TenderService::create`]
#[derive(Debug, Clone, Validate)]
pub struct CreateTenderRequest {
    #[validate(length(min = 1, message = "Tender name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Tender description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Service type is required"))]
    pub service_type: String,

    pub status: TenderStatus,
    pub organization_id: Uuid,

    #[validate(length(min = 1, message = "Creator username is required"))]
    pub creator_username: String,
}

/// Partial edit for [`TenderService::update_fields`]; absent fields are kept.
#[derive(Debug, Clone, Validate)]
pub struct UpdateTenderRequest {
    pub tender_id: Uuid,
    pub username: String,

    #[validate(length(min = 1, message = "Tender name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Tender description cannot be empty"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Service type cannot be empty"))]
    pub service_type: Option<String>,
}

impl UpdateTenderRequest {
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some() || self.service_type.is_some()
    }
}

/// Tender service. Each operation runs in a single store transaction.
pub struct TenderService<S: Store> {
    store: Arc<S>,
}

impl<S: Store> TenderService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a tender at version 1. Creation is not ownership-gated.
    pub async fn create(&self, request: CreateTenderRequest) -> Result<Tender, DomainError> {
        request.validate()?;
        if request.organization_id.is_nil() {
            return Err(DomainError::InvalidInput("Organization id is required".to_string()));
        }

        let mut tx = self.store.begin().await?;
        let tender = tx
            .insert_tender(&NewTender {
                name: request.name,
                description: request.description,
                service_type: request.service_type,
                status: request.status,
                organization_id: request.organization_id,
                creator_username: request.creator_username,
            })
            .await?;
        tx.commit().await?;

        info!("Tender created: {} by {}", tender.id, tender.creator_username);
        Ok(tender)
    }

    /// All tenders, regardless of status.
    pub async fn list(&self) -> Result<Vec<Tender>, DomainError> {
        let mut tx = self.store.begin().await?;
        let tenders = tx.list_tenders().await?;
        tx.commit().await?;
        Ok(tenders)
    }

    /// Tenders created by `username`, ordered by name.
    pub async fn list_by_creator(&self, username: &str) -> Result<Vec<Tender>, DomainError> {
        let mut tx = self.store.begin().await?;
        let tenders = tx.list_tenders_by_creator(username).await?;
        tx.commit().await?;
        Ok(tenders)
    }

    /// A published status is public. Anything else requires responsibility
    /// for the tender's organization.
    pub async fn get_status(
        &self,
        tender_id: &Uuid,
        username: &str,
    ) -> Result<TenderStatus, DomainError> {
        let mut tx = self.store.begin().await?;
        let tender = load_visible(tx.as_mut(), tender_id, username).await?;
        tx.commit().await?;
        Ok(tender.status)
    }

    /// Full tender read, under the same visibility rule as [`Self::get_status`].
    pub async fn get_tender(
        &self,
        tender_id: &Uuid,
        username: &str,
    ) -> Result<Tender, DomainError> {
        let mut tx = self.store.begin().await?;
        let tender = load_visible(tx.as_mut(), tender_id, username).await?;
        tx.commit().await?;
        Ok(tender)
    }

    /// Change the status in place. Status changes do not advance the version.
    pub async fn update_status(
        &self,
        tender_id: &Uuid,
        new_status: TenderStatus,
        username: &str,
    ) -> Result<Tender, DomainError> {
        let mut tx = self.store.begin().await?;
        let tender = load_for_update(tx.as_mut(), tender_id).await?;
        ensure_responsible(tx.as_mut(), username, &tender).await?;

        let updated = tx
            .update_tender_status(tender_id, new_status, tender.version)
            .await?
            .ok_or(DomainError::VersionConflict {
                tender_id: *tender_id,
                expected: tender.version,
            })?;
        tx.commit().await?;

        info!(
            "Tender {} status changed {} -> {} by {}",
            tender_id, tender.status, updated.status, username
        );
        Ok(updated)
    }

    /// Creator-only partial edit. Records the pre-edit snapshot and advances
    /// the version by one. At least one field must be present.
    pub async fn update_fields(&self, request: UpdateTenderRequest) -> Result<Tender, DomainError> {
        request.validate()?;
        if !request.has_changes() {
            return Err(DomainError::InvalidInput("No tender fields to update".to_string()));
        }

        let mut tx = self.store.begin().await?;
        let current = load_for_update(tx.as_mut(), &request.tender_id).await?;

        if !current.is_created_by(&request.username) {
            warn!(
                "Edit of tender {} rejected: {} is not the creator",
                current.id, request.username
            );
            return Err(access::deny(format!(
                "{} is not the creator of tender {}",
                request.username, current.id
            )));
        }

        let mut next = current.clone();
        if let Some(name) = request.name {
            next.name = name;
        }
        if let Some(description) = request.description {
            next.description = description;
        }
        if let Some(service_type) = request.service_type {
            next.service_type = service_type;
        }

        let updated = write_new_version(tx.as_mut(), &current, next).await?;
        tx.commit().await?;

        info!(
            "Tender {} edited by {}, now at version {}",
            updated.id, request.username, updated.version
        );
        Ok(updated)
    }

    /// Restore the fields recorded at `target_version`.
    ///
    /// The rollback is itself a new version: the current state is recorded
    /// first and the counter moves forward, so history stays contiguous.
    /// Targeting the current version copies the current fields forward.
    pub async fn rollback(
        &self,
        tender_id: &Uuid,
        target_version: i32,
        username: &str,
    ) -> Result<Tender, DomainError> {
        let mut tx = self.store.begin().await?;
        let current = load_for_update(tx.as_mut(), tender_id).await?;
        ensure_responsible(tx.as_mut(), username, &current).await?;

        let snapshot = if target_version == current.version {
            current.snapshot()
        } else {
            tx.find_tender_version(tender_id, target_version)
                .await?
                .ok_or(DomainError::VersionNotFound {
                    tender_id: *tender_id,
                    version: target_version,
                })?
        };

        let mut next = current.clone();
        next.restore(&snapshot);
        let updated = write_new_version(tx.as_mut(), &current, next).await?;
        tx.commit().await?;

        info!(
            "Tender {} rolled back to version {} by {}, now at version {}",
            tender_id, target_version, username, updated.version
        );
        Ok(updated)
    }

    /// Recorded snapshots, oldest first. Requires organization responsibility.
    pub async fn list_versions(
        &self,
        tender_id: &Uuid,
        username: &str,
    ) -> Result<Vec<TenderVersion>, DomainError> {
        let mut tx = self.store.begin().await?;
        let tender = tx
            .find_tender(tender_id)
            .await?
            .ok_or_else(|| DomainError::tender_not_found(tender_id))?;
        ensure_responsible(tx.as_mut(), username, &tender).await?;

        let versions = tx.list_tender_versions(tender_id).await?;
        tx.commit().await?;
        Ok(versions)
    }
}

async fn load_for_update(tx: &mut dyn StoreTx, tender_id: &Uuid) -> Result<Tender, DomainError> {
    tx.find_tender_for_update(tender_id)
        .await?
        .ok_or_else(|| DomainError::tender_not_found(tender_id))
}

async fn load_visible(
    tx: &mut dyn StoreTx,
    tender_id: &Uuid,
    username: &str,
) -> Result<Tender, DomainError> {
    let tender = tx
        .find_tender(tender_id)
        .await?
        .ok_or_else(|| DomainError::tender_not_found(tender_id))?;

    if !tender.is_published() {
        ensure_responsible(tx, username, &tender).await?;
    }
    Ok(tender)
}

async fn ensure_responsible(
    tx: &mut dyn StoreTx,
    username: &str,
    tender: &Tender,
) -> Result<(), DomainError> {
    if access::is_responsible_for_organization(tx, username, &tender.organization_id).await? {
        return Ok(());
    }

    warn!(
        "{} is not responsible for organization {} (tender {})",
        username, tender.organization_id, tender.id
    );
    Err(access::deny(format!(
        "{} is not responsible for the organization owning tender {}",
        username, tender.id
    )))
}

/// Record `current` as history, then persist `next` one version ahead of it.
async fn write_new_version(
    tx: &mut dyn StoreTx,
    current: &Tender,
    mut next: Tender,
) -> Result<Tender, DomainError> {
    tx.insert_tender_version(&current.snapshot()).await?;

    next.version = current.version + 1;
    tx.update_tender_fields(&next, current.version)
        .await?
        .ok_or(DomainError::VersionConflict {
            tender_id: current.id,
            expected: current.version,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryStore;
    use crate::ErrorKind;

    async fn setup() -> (TenderService<InMemoryStore>, Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let org_id = Uuid::new_v4();
        let carol = store.add_employee("carol").await;
        store.add_responsible(carol, org_id).await;
        store.add_employee("alice").await;
        (TenderService::new(store.clone()), store, org_id)
    }

    fn request(org_id: Uuid) -> CreateTenderRequest {
        CreateTenderRequest {
            name: "Office supplies".to_string(),
            description: "Paper and toner".to_string(),
            service_type: "Delivery".to_string(),
            status: TenderStatus::Created,
            organization_id: org_id,
            creator_username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let (service, _, org_id) = setup().await;

        let mut bad = request(org_id);
        bad.name = String::new();
        let err = service.create(bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = service.create(request(Uuid::nil())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_keeps_version() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();

        let updated = service
            .update_status(&tender.id, TenderStatus::Closed, "carol")
            .await
            .unwrap();

        assert_eq!(updated.status, TenderStatus::Closed);
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn test_update_fields_rejects_empty_present_field() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();

        let err = service
            .update_fields(UpdateTenderRequest {
                tender_id: tender.id,
                username: "alice".to_string(),
                name: Some(String::new()),
                description: None,
                service_type: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_responsibility_does_not_grant_field_edits() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();

        let err = service
            .update_fields(UpdateTenderRequest {
                tender_id: tender.id,
                username: "carol".to_string(),
                name: Some("Hijacked".to_string()),
                description: None,
                service_type: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_unknown_tender_is_not_found() {
        let (service, _, _) = setup().await;
        let missing = Uuid::new_v4();

        assert_eq!(
            service.get_status(&missing, "carol").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            service.rollback(&missing, 1, "carol").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            service
                .update_status(&missing, TenderStatus::Published, "carol")
                .await
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_list_versions_requires_responsibility() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();

        let err = service.list_versions(&tender.id, "alice").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        assert!(service.list_versions(&tender.id, "carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_fields_requires_a_change() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();

        let err = service
            .update_fields(UpdateTenderRequest {
                tender_id: tender.id,
                username: "alice".to_string(),
                name: None,
                description: None,
                service_type: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let unchanged = service.get_tender(&tender.id, "carol").await.unwrap();
        assert_eq!(unchanged.version, 1);
        assert!(service.list_versions(&tender.id, "carol").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rollback_to_current_version_copies_forward() {
        let (service, _, org_id) = setup().await;
        let tender = service.create(request(org_id)).await.unwrap();
        assert_eq!(tender.version, 1);

        let rolled = service.rollback(&tender.id, 1, "carol").await.unwrap();
        assert_eq!(rolled.version, 2);
        assert_eq!(rolled.name, tender.name);
        assert_eq!(rolled.description, tender.description);
        assert_eq!(rolled.status, tender.status);

        let history = service.list_versions(&tender.id, "carol").await.unwrap();
        let numbers: Vec<i32> = history.iter().map(|v| v.version).collect();
        assert_eq!(numbers, vec![1]);

        // version 2 is now current and also a valid target
        let again = service.rollback(&tender.id, 2, "carol").await.unwrap();
        assert_eq!(again.version, 3);
        assert_eq!(
            service.rollback(&tender.id, 7, "carol").await.unwrap_err().kind(),
            ErrorKind::VersionNotFound
        );
    }
}
