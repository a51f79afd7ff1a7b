// ============================================================================
// Tender Core - Bid Entity
// File: crates/tender-core/src/domain/bid.rs
// Description: Bid entity submitted against a tender
// ============================================================================

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Bid status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Created => "Created",
            BidStatus::Published => "Published",
            BidStatus::Canceled => "Canceled",
        }
    }
}

impl FromStr for BidStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(BidStatus::Created),
            "Published" => Ok(BidStatus::Published),
            "Canceled" => Ok(BidStatus::Canceled),
            other => Err(DomainError::InvalidInput(format!("unknown bid status: {}", other))),
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a bid is submitted on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorType {
    Organization,
    User,
}

impl AuthorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorType::Organization => "Organization",
            AuthorType::User => "User",
        }
    }
}

impl FromStr for AuthorType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Organization" => Ok(AuthorType::Organization),
            "User" => Ok(AuthorType::User),
            other => Err(DomainError::InvalidInput(format!("unknown author type: {}", other))),
        }
    }
}

/// Bid entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: Uuid,
    pub author_type: AuthorType,
    pub author_id: Uuid,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a bid; id, version and timestamp come from the store.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub name: String,
    pub description: String,
    pub status: BidStatus,
    pub tender_id: Uuid,
    pub author_type: AuthorType,
    pub author_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_status_text_encoding() {
        for status in [BidStatus::Created, BidStatus::Published, BidStatus::Canceled] {
            assert_eq!(status.as_str().parse::<BidStatus>().unwrap(), status);
        }
        assert!("CREATED".parse::<BidStatus>().is_err());
    }

    #[test]
    fn test_author_type_parse() {
        assert_eq!("User".parse::<AuthorType>().unwrap(), AuthorType::User);
        assert!(matches!(
            "Individual".parse::<AuthorType>(),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
