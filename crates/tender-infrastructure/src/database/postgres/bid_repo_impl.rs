// ============================================================================
// Tender Infrastructure - PostgreSQL Bid Repository
// File: crates/tender-infrastructure/src/database/postgres/bid_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use tender_core::domain::{AuthorType, Bid, BidStatus, NewBid};
use tender_core::error::DomainError;
use tender_core::repositories::BidRepository;

use super::store_impl::{db_error, decode_error, PgStoreTx};

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct BidRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub tender_id: Uuid,
    pub author_type: String,
    pub author_id: Uuid,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BidRow> for Bid {
    type Error = DomainError;

    fn try_from(row: BidRow) -> Result<Self, Self::Error> {
        Ok(Bid {
            id: row.id,
            name: row.name,
            description: row.description,
            status: row
                .status
                .parse::<BidStatus>()
                .map_err(|e| decode_error("decoding bid row", e))?,
            tender_id: row.tender_id,
            author_type: row
                .author_type
                .parse::<AuthorType>()
                .map_err(|e| decode_error("decoding bid row", e))?,
            author_id: row.author_id,
            version: row.version,
            created_at: row.created_at,
        })
    }
}

fn into_bids(rows: Vec<BidRow>) -> Result<Vec<Bid>, DomainError> {
    rows.into_iter().map(Bid::try_from).collect()
}

#[async_trait]
impl BidRepository for PgStoreTx {
    async fn insert_bid(&mut self, bid: &NewBid) -> Result<Bid, DomainError> {
        info!("Creating bid {} for tender {}", bid.name, bid.tender_id);

        let row: BidRow = sqlx::query_as(
            r#"
            INSERT INTO bid (name, description, status, tender_id, author_type, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            "#
        )
        .bind(&bid.name)
        .bind(&bid.description)
        .bind(bid.status.as_str())
        .bind(bid.tender_id)
        .bind(bid.author_type.as_str())
        .bind(bid.author_id)
        .fetch_one(self.conn()?)
        .await
        .map_err(db_error("inserting bid"))?;

        info!("Bid created successfully: {}", row.id);
        row.try_into()
    }

    async fn find_bid(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError> {
        let row: Option<BidRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            FROM bid
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("finding bid by id"))?;

        row.map(Bid::try_from).transpose()
    }

    async fn find_bid_for_update(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError> {
        let row: Option<BidRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            FROM bid
            WHERE id = $1
            FOR UPDATE
            "#
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("locking bid"))?;

        row.map(Bid::try_from).transpose()
    }

    async fn update_bid_fields(
        &mut self,
        id: &Uuid,
        name: &str,
        description: &str,
    ) -> Result<Option<Bid>, DomainError> {
        let row: Option<BidRow> = sqlx::query_as(
            r#"
            UPDATE bid
            SET name = $2, description = $3, version = version + 1
            WHERE id = $1
            RETURNING
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            "#
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("updating bid fields"))?;

        row.map(Bid::try_from).transpose()
    }

    async fn update_bid_status(
        &mut self,
        id: &Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, DomainError> {
        let row: Option<BidRow> = sqlx::query_as(
            r#"
            UPDATE bid
            SET status = $2
            WHERE id = $1
            RETURNING
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            "#
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.conn()?)
        .await
        .map_err(db_error("updating bid status"))?;

        row.map(Bid::try_from).transpose()
    }

    async fn list_bids_by_tender(&mut self, tender_id: &Uuid) -> Result<Vec<Bid>, DomainError> {
        let rows: Vec<BidRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            FROM bid
            WHERE tender_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(tender_id)
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("listing bids by tender"))?;

        into_bids(rows)
    }

    async fn list_bids_by_author(&mut self, author_id: &Uuid) -> Result<Vec<Bid>, DomainError> {
        let rows: Vec<BidRow> = sqlx::query_as(
            r#"
            SELECT
                id, name, description, status, tender_id,
                author_type, author_id, version, created_at
            FROM bid
            WHERE author_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(author_id)
        .fetch_all(self.conn()?)
        .await
        .map_err(db_error("listing bids by author"))?;

        into_bids(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_to_bid() {
        let row = BidRow {
            id: Uuid::new_v4(),
            name: "Offer".to_string(),
            description: "Lowest price".to_string(),
            status: "Canceled".to_string(),
            tender_id: Uuid::new_v4(),
            author_type: "Organization".to_string(),
            author_id: Uuid::new_v4(),
            version: 2,
            created_at: Utc::now(),
        };

        let bid = Bid::try_from(row).unwrap();
        assert_eq!(bid.status, BidStatus::Canceled);
        assert_eq!(bid.author_type, AuthorType::Organization);
    }
}
