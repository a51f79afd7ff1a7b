// ============================================================================
// Tender Infrastructure - PostgreSQL Membership Queries
// File: crates/tender-infrastructure/src/database/postgres/membership_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use uuid::Uuid;

use tender_core::error::DomainError;
use tender_core::repositories::MembershipRepository;

use super::store_impl::{db_error, PgStoreTx};

#[async_trait]
impl MembershipRepository for PgStoreTx {
    async fn find_employee_id(&mut self, username: &str) -> Result<Option<Uuid>, DomainError> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM employee WHERE username = $1")
            .bind(username)
            .fetch_optional(self.conn()?)
            .await
            .map_err(db_error("finding employee by username"))
    }

    async fn is_responsible(
        &mut self,
        user_id: &Uuid,
        organization_id: &Uuid,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organization_responsible
                WHERE user_id = $1 AND organization_id = $2
            )
            "#
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("checking organization responsibility"))
    }

    async fn is_tender_org_member(
        &mut self,
        username: &str,
        tender_id: &Uuid,
    ) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM tenders t
                JOIN organization_responsible org_resp
                    ON t.organization_id = org_resp.organization_id
                JOIN employee e ON org_resp.user_id = e.id
                WHERE t.id = $1 AND e.username = $2
            )
            "#
        )
        .bind(tender_id)
        .bind(username)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("checking tender organization membership"))
    }

    async fn has_bid_access(&mut self, username: &str, bid_id: &Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bid b
                JOIN tenders t ON b.tender_id = t.id
                JOIN organization_responsible org_resp
                    ON t.organization_id = org_resp.organization_id
                JOIN employee e ON org_resp.user_id = e.id
                WHERE b.id = $1 AND e.username = $2
            )
            "#
        )
        .bind(bid_id)
        .bind(username)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("checking bid access"))
    }
}
