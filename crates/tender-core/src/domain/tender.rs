// ============================================================================
// Tender Core - Tender Entity
// File: crates/tender-core/src/domain/tender.rs
// Description: Tender entity with status lifecycle and version counter
// ============================================================================

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::TenderVersion;
use crate::error::DomainError;

/// Tender status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Created => "CREATED",
            TenderStatus::Published => "PUBLISHED",
            TenderStatus::Closed => "CLOSED",
        }
    }
}

impl FromStr for TenderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(TenderStatus::Created),
            "PUBLISHED" => Ok(TenderStatus::Published),
            "CLOSED" => Ok(TenderStatus::Closed),
            other => Err(DomainError::InvalidInput(format!("unknown tender status: {}", other))),
        }
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tender entity, as stored in the current-state row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: TenderStatus,
    pub organization_id: Uuid,
    pub creator_username: String,
    pub version: i32,
}

impl Tender {
    pub fn is_published(&self) -> bool {
        self.status == TenderStatus::Published
    }

    pub fn is_created_by(&self, username: &str) -> bool {
        self.creator_username == username
    }

    /// Freezes the mutable fields under the current version number.
    pub fn snapshot(&self) -> TenderVersion {
        TenderVersion {
            tender_id: self.id,
            version: self.version,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            service_type: self.service_type.clone(),
            created_at: Utc::now(),
        }
    }

    /// Copies a recorded snapshot's fields into this tender. The version
    /// counter is left for the caller to advance.
    pub fn restore(&mut self, snapshot: &TenderVersion) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.status = snapshot.status;
        self.service_type = snapshot.service_type.clone();
    }
}

/// Insert payload for a tender; id and version are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTender {
    pub name: String,
    pub description: String,
    pub service_type: String,
    pub status: TenderStatus,
    pub organization_id: Uuid,
    pub creator_username: String,
}
