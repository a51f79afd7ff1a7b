//! Tender repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{NewTender, Tender, TenderStatus, TenderVersion};
use crate::error::DomainError;

#[async_trait]
pub trait TenderRepository: Send {
    async fn find_tender(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError>;

    /// Same as `find_tender`, but locks the row until the transaction ends.
    async fn find_tender_for_update(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError>;

    async fn insert_tender(&mut self, tender: &NewTender) -> Result<Tender, DomainError>;

    /// Writes name, description, status, service type and version, provided
    /// the stored version still equals `expected_version`. Returns `None`
    /// when that precondition fails.
    async fn update_tender_fields(
        &mut self,
        tender: &Tender,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError>;

    /// Writes only the status, under the same version precondition.
    async fn update_tender_status(
        &mut self,
        id: &Uuid,
        status: TenderStatus,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError>;

    async fn insert_tender_version(&mut self, snapshot: &TenderVersion) -> Result<(), DomainError>;
    async fn find_tender_version(
        &mut self,
        tender_id: &Uuid,
        version: i32,
    ) -> Result<Option<TenderVersion>, DomainError>;
    async fn list_tender_versions(
        &mut self,
        tender_id: &Uuid,
    ) -> Result<Vec<TenderVersion>, DomainError>;

    async fn list_tenders(&mut self) -> Result<Vec<Tender>, DomainError>;
    async fn list_tenders_by_creator(&mut self, username: &str) -> Result<Vec<Tender>, DomainError>;
}
