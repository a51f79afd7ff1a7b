// ============================================================================
// Tender Infrastructure - PostgreSQL Tender Repository
// File: crates/tender-infrastructure/src/database/postgres/tender_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use tender_core::domain::{NewTender, Tender, TenderStatus, TenderVersion};
use tender_core::error::DomainError;
use tender_core::repositories::TenderRepository;

use super::store_impl::{db_error, decode_error, PgStoreTx};

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct TenderRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: String,
    pub organization_id: Uuid,
    pub creator_username: String,
    pub version: i32,
}

impl TryFrom<TenderRow> for Tender {
    type Error = DomainError;

    fn try_from(row: TenderRow) -> Result<Self, Self::Error> {
        Ok(Tender {
            id: row.id,
            name: row.name,
            description: row.description,
            service_type: row.service_type,
            status: row
                .status
                .parse::<TenderStatus>()
                .map_err(|e| decode_error("decoding tender row", e))?,
            organization_id: row.organization_id,
            creator_username: row.creator_username,
            version: row.version,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TenderVersionRow {
    pub tender_id: Uuid,
    pub version: i32,
    pub name: String,
    pub description: String,
    pub status: String,
    pub service_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TenderVersionRow> for TenderVersion {
    type Error = DomainError;

    fn try_from(row: TenderVersionRow) -> Result<Self, Self::Error> {
        Ok(TenderVersion {
            tender_id: row.tender_id,
            version: row.version,
            name: row.name,
            description: row.description,
            status: row
                .status
                .parse::<TenderStatus>()
                .map_err(|e| decode_error("decoding tender version row", e))?,
            service_type: row.service_type,
            created_at: row.created_at,
        })
    }
}

fn into_tenders(rows: Vec<TenderRow>) -> Result<Vec<Tender>, DomainError> {
    rows.into_iter().map(Tender::try_from).collect()
}

#[async_trait]
impl TenderRepository for PgStoreTx {
    async fn find_tender(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError> {
        let row: Option<TenderRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, service_type, status,
                organization_id, creator_username, version
            FROM tenders
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("finding tender by id"))?;

        row.map(Tender::try_from).transpose()
    }

    async fn find_tender_for_update(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError> {
        let row: Option<TenderRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, service_type, status,
                organization_id, creator_username, version
            FROM tenders
            WHERE id = $1
            FOR UPDATE
            "#
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("locking tender"))?;

        row.map(Tender::try_from).transpose()
    }

    async fn insert_tender(&mut self, tender: &NewTender) -> Result<Tender, DomainError> {
        info!("Creating tender: {}", tender.name);

        let row: TenderRow = sqlx::query_as(
            r#"
            INSERT INTO tenders (
                name, description, service_type, status,
                organization_id, creator_username
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, name, description, service_type, status,
                organization_id, creator_username, version
            "#
        )
        .bind(&tender.name)
        .bind(&tender.description)
        .bind(&tender.service_type)
        .bind(tender.status.as_str())
        .bind(tender.organization_id)
        .bind(&tender.creator_username)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("inserting tender"))?;

        info!("Tender created successfully: {}", row.id);
        row.try_into()
    }

    async fn update_tender_fields(
        &mut self,
        tender: &Tender,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError> {
        let row: Option<TenderRow> = sqlx::query_as(
            r#"
            UPDATE tenders
            SET
                name = $2,
                description = $3,
                status = $4,
                service_type = $5,
                version = $6,
                updated_at = NOW()
            WHERE id = $1 AND version = $7
            RETURNING
                id, name, description, service_type, status,
                organization_id, creator_username, version
            "#
        )
        .bind(tender.id)
        .bind(&tender.name)
        .bind(&tender.description)
        .bind(tender.status.as_str())
        .bind(&tender.service_type)
        .bind(tender.version)
        .bind(expected_version)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("updating tender fields"))?;

        row.map(Tender::try_from).transpose()
    }

    async fn update_tender_status(
        &mut self,
        id: &Uuid,
        status: TenderStatus,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError> {
        let row: Option<TenderRow> = sqlx::query_as(
            r#"
            UPDATE tenders
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND version = $3
            RETURNING
                id, name, description, service_type, status,
                organization_id, creator_username, version
            "#
        )
        .bind(id)
        .bind(status.as_str())
        .bind(expected_version)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("updating tender status"))?;

        row.map(Tender::try_from).transpose()
    }

    async fn insert_tender_version(&mut self, snapshot: &TenderVersion) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tender_versions (
                tender_id, version, name, description,
                status, service_type, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#
        )
        .bind(snapshot.tender_id)
        .bind(snapshot.version)
        .bind(&snapshot.name)
        .bind(&snapshot.description)
        .bind(snapshot.status.as_str())
        .bind(&snapshot.service_type)
        .bind(snapshot.created_at)
        .execute(self.conn()?)
        .await
        .map_err(db_error("inserting tender version"))?;

        Ok(())
    }

    async fn find_tender_version(
        &mut self,
        tender_id: &Uuid,
        version: i32,
    ) -> Result<Option<TenderVersion>, DomainError> {
        let row: Option<TenderVersionRow> = sqlx::query_as(
            r#"
            SELECT
                tender_id, version, name, description,
                status, service_type, created_at
            FROM tender_versions
            WHERE tender_id = $1 AND version = $2
            "#
        )
        .bind(tender_id)
        .bind(version)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("finding tender version"))?;

        row.map(TenderVersion::try_from).transpose()
    }

    async fn list_tender_versions(
        &mut self,
        tender_id: &Uuid,
    ) -> Result<Vec<TenderVersion>, DomainError> {
        let rows: Vec<TenderVersionRow> = sqlx::query_as(
            r#"
            SELECT
                tender_id, version, name, description,
                status, service_type, created_at
            FROM tender_versions
            WHERE tender_id = $1
            ORDER BY version ASC
            "#
        )
        .bind(tender_id)
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("listing tender versions"))?;

        rows.into_iter().map(TenderVersion::try_from).collect()
    }

    async fn list_tenders(&mut self) -> Result<Vec<Tender>, DomainError> {
        let rows: Vec<TenderRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, service_type, status,
                organization_id, creator_username, version
            FROM tenders
            ORDER BY created_at ASC
            "#
        )
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("listing tenders"))?;

        into_tenders(rows)
    }

    async fn list_tenders_by_creator(
        &mut self,
        username: &str,
    ) -> Result<Vec<Tender>, DomainError> {
        let rows: Vec<TenderRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, service_type, status,
                organization_id, creator_username, version
            FROM tenders
            WHERE creator_username = $1
            ORDER BY name ASC
            "#
        )
        .bind(username)
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("listing tenders by creator"))?;

        into_tenders(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> TenderRow {
        TenderRow {
            id: Uuid::new_v4(),
            name: "Warehouse".to_string(),
            description: "Build a warehouse".to_string(),
            service_type: "Construction".to_string(),
            status: status.to_string(),
            organization_id: Uuid::new_v4(),
            creator_username: "alice".to_string(),
            version: 3,
        }
    }

    #[test]
    fn test_row_maps_to_tender() {
        let tender = Tender::try_from(row("CLOSED")).unwrap();
        assert_eq!(tender.status, TenderStatus::Closed);
        assert_eq!(tender.version, 3);
        assert_eq!(tender.creator_username, "alice");
    }

    #[test]
    fn test_unknown_status_is_a_store_failure() {
        let err = Tender::try_from(row("ARCHIVED")).unwrap_err();
        assert!(matches!(err, DomainError::StoreFailure { .. }));
    }
}
