// ============================================================================
// Tender Core - Access Oracle
// File: crates/tender-core/src/services/access.rs
// ============================================================================
//! Capability predicates over organization membership.
//!
//! Every check runs against the caller's open transaction, so the answer
//! holds for the write that follows it. An unknown username has no
//! capabilities; it is not an error.

use tracing::debug;
use uuid::Uuid;

use crate::error::DomainError;
use crate::repositories::MembershipRepository;

/// Is `username` registered as responsible for `organization_id`?
pub async fn is_responsible_for_organization<M>(
    repo: &mut M,
    username: &str,
    organization_id: &Uuid,
) -> Result<bool, DomainError>
where
    M: MembershipRepository + ?Sized,
{
    let Some(user_id) = repo.find_employee_id(username).await? else {
        debug!("Unknown employee {} has no organization responsibility", username);
        return Ok(false);
    };

    repo.is_responsible(&user_id, organization_id).await
}

/// Is `username` responsible for the organization that owns `tender_id`?
pub async fn has_organization_access_to_tender<M>(
    repo: &mut M,
    username: &str,
    tender_id: &Uuid,
) -> Result<bool, DomainError>
where
    M: MembershipRepository + ?Sized,
{
    repo.is_tender_org_member(username, tender_id).await
}

/// Is `username` responsible for the organization owning the bid's tender?
pub async fn has_access_to_bid<M>(
    repo: &mut M,
    username: &str,
    bid_id: &Uuid,
) -> Result<bool, DomainError>
where
    M: MembershipRepository + ?Sized,
{
    repo.has_bid_access(username, bid_id).await
}

pub(crate) fn deny(reason: impl Into<String>) -> DomainError {
    DomainError::Unauthorized(reason.into())
}
