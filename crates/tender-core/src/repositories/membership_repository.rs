//! Organization membership queries (port)
//!
//! Relationship data is owned outside this crate; these are reads only.

use async_trait::async_trait;
use uuid::Uuid;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send {
    async fn find_employee_id(&mut self, username: &str) -> Result<Option<Uuid>, DomainError>;

    async fn is_responsible(
        &mut self,
        user_id: &Uuid,
        organization_id: &Uuid,
    ) -> Result<bool, DomainError>;

    /// Whether `username` is responsible for the organization owning the tender.
    async fn is_tender_org_member(
        &mut self,
        username: &str,
        tender_id: &Uuid,
    ) -> Result<bool, DomainError>;

    /// Whether `username` is responsible for the organization owning the
    /// tender the bid targets.
    async fn has_bid_access(&mut self, username: &str, bid_id: &Uuid) -> Result<bool, DomainError>;
}
