//! Tender version snapshot (history record)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::TenderStatus;

/// Immutable pre-image of a tender's mutable fields, keyed by
/// `(tender_id, version)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderVersion {
    pub tender_id: Uuid,
    pub version: i32,
    pub name: String,
    pub description: String,
    pub status: TenderStatus,
    pub service_type: String,
    pub created_at: DateTime<Utc>,
}
