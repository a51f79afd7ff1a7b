// ============================================================================
// Tender Core - In-Memory Store
// File: crates/tender-core/src/repositories/memory.rs
// ============================================================================
//! Process-local implementation of the persistence ports.
//!
//! Transactions are serialized: `begin` takes an owned lock on the whole
//! state and works on a copy, which `commit` publishes. A transaction that
//! is dropped uncommitted leaves the shared state untouched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::{Bid, BidStatus, NewBid, NewTender, Tender, TenderStatus, TenderVersion};
use crate::error::DomainError;
use crate::repositories::{BidRepository, MembershipRepository, Store, StoreTx, TenderRepository};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    tenders: Vec<Tender>,
    versions: Vec<TenderVersion>,
    bids: Vec<Bid>,
    employees: HashMap<String, Uuid>,
    // (user_id, organization_id)
    responsible: HashSet<(Uuid, Uuid)>,
}

impl MemoryState {
    fn tender(&self, id: &Uuid) -> Option<&Tender> {
        self.tenders.iter().find(|t| t.id == *id)
    }

    fn bid(&self, id: &Uuid) -> Option<&Bid> {
        self.bids.iter().find(|b| b.id == *id)
    }

    fn is_responsible_by_name(&self, username: &str, organization_id: &Uuid) -> bool {
        self.employees
            .get(username)
            .map(|user_id| self.responsible.contains(&(*user_id, *organization_id)))
            .unwrap_or(false)
    }

    fn bids_newest_first(&self, keep: impl Fn(&Bid) -> bool) -> Vec<Bid> {
        // Reverse insertion order first, so equal timestamps still list the
        // most recent insert first after the stable sort.
        let mut bids: Vec<Bid> = self.bids.iter().rev().filter(|b| keep(b)).cloned().collect();
        bids.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bids
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an employee and returns its id. Re-registering a username
    /// returns the existing id.
    pub async fn add_employee(&self, username: &str) -> Uuid {
        let mut state = self.state.lock().await;
        *state
            .employees
            .entry(username.to_string())
            .or_insert_with(Uuid::new_v4)
    }

    pub async fn add_responsible(&self, user_id: Uuid, organization_id: Uuid) {
        self.state.lock().await.responsible.insert((user_id, organization_id));
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(InMemoryTx { guard, working }))
    }
}

pub struct InMemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn commit(&mut self) -> Result<(), DomainError> {
        *self.guard = self.working.clone();
        Ok(())
    }
}

#[async_trait]
impl TenderRepository for InMemoryTx {
    async fn find_tender(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError> {
        Ok(self.working.tender(id).cloned())
    }

    async fn find_tender_for_update(&mut self, id: &Uuid) -> Result<Option<Tender>, DomainError> {
        self.find_tender(id).await
    }

    async fn insert_tender(&mut self, tender: &NewTender) -> Result<Tender, DomainError> {
        let stored = Tender {
            id: Uuid::new_v4(),
            name: tender.name.clone(),
            description: tender.description.clone(),
            service_type: tender.service_type.clone(),
            status: tender.status,
            organization_id: tender.organization_id,
            creator_username: tender.creator_username.clone(),
            version: 1,
        };
        self.working.tenders.push(stored.clone());
        Ok(stored)
    }

    async fn update_tender_fields(
        &mut self,
        tender: &Tender,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError> {
        let Some(current) = self
            .working
            .tenders
            .iter_mut()
            .find(|t| t.id == tender.id && t.version == expected_version)
        else {
            return Ok(None);
        };

        current.name = tender.name.clone();
        current.description = tender.description.clone();
        current.status = tender.status;
        current.service_type = tender.service_type.clone();
        current.version = tender.version;
        Ok(Some(current.clone()))
    }

    async fn update_tender_status(
        &mut self,
        id: &Uuid,
        status: TenderStatus,
        expected_version: i32,
    ) -> Result<Option<Tender>, DomainError> {
        let Some(current) = self
            .working
            .tenders
            .iter_mut()
            .find(|t| t.id == *id && t.version == expected_version)
        else {
            return Ok(None);
        };

        current.status = status;
        Ok(Some(current.clone()))
    }

    async fn insert_tender_version(&mut self, snapshot: &TenderVersion) -> Result<(), DomainError> {
        let duplicate = self
            .working
            .versions
            .iter()
            .any(|v| v.tender_id == snapshot.tender_id && v.version == snapshot.version);
        if duplicate {
            return Err(DomainError::store(
                "inserting tender version",
                format!("duplicate key ({}, {})", snapshot.tender_id, snapshot.version),
            ));
        }

        self.working.versions.push(snapshot.clone());
        Ok(())
    }

    async fn find_tender_version(
        &mut self,
        tender_id: &Uuid,
        version: i32,
    ) -> Result<Option<TenderVersion>, DomainError> {
        Ok(self
            .working
            .versions
            .iter()
            .find(|v| v.tender_id == *tender_id && v.version == version)
            .cloned())
    }

    async fn list_tender_versions(
        &mut self,
        tender_id: &Uuid,
    ) -> Result<Vec<TenderVersion>, DomainError> {
        let mut versions: Vec<TenderVersion> = self
            .working
            .versions
            .iter()
            .filter(|v| v.tender_id == *tender_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn list_tenders(&mut self) -> Result<Vec<Tender>, DomainError> {
        Ok(self.working.tenders.clone())
    }

    async fn list_tenders_by_creator(
        &mut self,
        username: &str,
    ) -> Result<Vec<Tender>, DomainError> {
        let mut tenders: Vec<Tender> = self
            .working
            .tenders
            .iter()
            .filter(|t| t.creator_username == username)
            .cloned()
            .collect();
        tenders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tenders)
    }
}

#[async_trait]
impl BidRepository for InMemoryTx {
    async fn insert_bid(&mut self, bid: &NewBid) -> Result<Bid, DomainError> {
        let stored = Bid {
            id: Uuid::new_v4(),
            name: bid.name.clone(),
            description: bid.description.clone(),
            status: bid.status,
            tender_id: bid.tender_id,
            author_type: bid.author_type,
            author_id: bid.author_id,
            version: 1,
            created_at: Utc::now(),
        };
        self.working.bids.push(stored.clone());
        Ok(stored)
    }

    async fn find_bid(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError> {
        Ok(self.working.bid(id).cloned())
    }

    async fn find_bid_for_update(&mut self, id: &Uuid) -> Result<Option<Bid>, DomainError> {
        self.find_bid(id).await
    }

    async fn update_bid_fields(
        &mut self,
        id: &Uuid,
        name: &str,
        description: &str,
    ) -> Result<Option<Bid>, DomainError> {
        Ok(self.working.bids.iter_mut().find(|b| b.id == *id).map(|bid| {
            bid.name = name.to_string();
            bid.description = description.to_string();
            bid.version += 1;
            bid.clone()
        }))
    }

    async fn update_bid_status(
        &mut self,
        id: &Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, DomainError> {
        Ok(self.working.bids.iter_mut().find(|b| b.id == *id).map(|bid| {
            bid.status = status;
            bid.clone()
        }))
    }

    async fn list_bids_by_tender(&mut self, tender_id: &Uuid) -> Result<Vec<Bid>, DomainError> {
        Ok(self.working.bids_newest_first(|b| b.tender_id == *tender_id))
    }

    async fn list_bids_by_author(&mut self, author_id: &Uuid) -> Result<Vec<Bid>, DomainError> {
        Ok(self.working.bids_newest_first(|b| b.author_id == *author_id))
    }
}

#[async_trait]
impl MembershipRepository for InMemoryTx {
    async fn find_employee_id(&mut self, username: &str) -> Result<Option<Uuid>, DomainError> {
        Ok(self.working.employees.get(username).copied())
    }

    async fn is_responsible(
        &mut self,
        user_id: &Uuid,
        organization_id: &Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self.working.responsible.contains(&(*user_id, *organization_id)))
    }

    async fn is_tender_org_member(
        &mut self,
        username: &str,
        tender_id: &Uuid,
    ) -> Result<bool, DomainError> {
        Ok(self
            .working
            .tender(tender_id)
            .map(|t| self.working.is_responsible_by_name(username, &t.organization_id))
            .unwrap_or(false))
    }

    async fn has_bid_access(&mut self, username: &str, bid_id: &Uuid) -> Result<bool, DomainError> {
        Ok(self
            .working
            .bid(bid_id)
            .and_then(|b| self.working.tender(&b.tender_id))
            .map(|t| self.working.is_responsible_by_name(username, &t.organization_id))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_tender(name: &str) -> NewTender {
        NewTender {
            name: name.to_string(),
            description: "desc".to_string(),
            service_type: "Delivery".to_string(),
            status: TenderStatus::Created,
            organization_id: Uuid::new_v4(),
            creator_username: "alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_is_discarded() {
        let store = InMemoryStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_tender(&new_tender("dropped")).await.unwrap();
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_tenders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_changes() {
        let store = InMemoryStore::new();

        let mut tx = store.begin().await.unwrap();
        let tender = tx.insert_tender(&new_tender("kept")).await.unwrap();
        tx.commit().await.unwrap();
        drop(tx);

        let mut tx = store.begin().await.unwrap();
        let found = tx.find_tender(&tender.id).await.unwrap().unwrap();
        assert_eq!(found.version, 1);
        assert_eq!(found.name, "kept");
    }

    #[tokio::test]
    async fn test_update_fields_respects_expected_version() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let mut tender = tx.insert_tender(&new_tender("cas")).await.unwrap();

        tender.name = "cas-2".to_string();
        tender.version = 2;
        assert!(tx.update_tender_fields(&tender, 5).await.unwrap().is_none());

        let updated = tx.update_tender_fields(&tender, 1).await.unwrap().unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.name, "cas-2");
    }

    #[tokio::test]
    async fn test_duplicate_version_snapshot_is_rejected() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let tender = tx.insert_tender(&new_tender("history")).await.unwrap();

        tx.insert_tender_version(&tender.snapshot()).await.unwrap();
        let err = tx.insert_tender_version(&tender.snapshot()).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreFailure { .. }));
    }
}
