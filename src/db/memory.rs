use async_trait::async_trait;
use sea_orm::prelude::DateTimeUtc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AlumniStore, StoreError};
use crate::models::alumni::{self, next_write_time};
use crate::models::dto::{AlumniChanges, AlumniStats, GroupCount};
use crate::services::query::{self, DirectoryFilter};

/// Stockage en mémoire avec le même contrat que PostgresStore.
/// Sert aux tests et au mode ALUMNI_STORE=memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<alumni::Model>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(records: &[alumni::Model], email: &str, except: Option<Uuid>) -> bool {
    records
        .iter()
        .any(|r| Some(r.id) != except && r.email.eq_ignore_ascii_case(email))
}

fn tally<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| GroupCount::new(key, count))
        .collect()
}

#[async_trait]
impl AlumniStore for MemoryStore {
    async fn insert(&self, record: alumni::Model) -> Result<alumni::Model, StoreError> {
        // vérification + écriture sous le même verrou
        let mut records = self.records.write().await;
        if email_taken(&records, &record.email, None) {
            return Err(StoreError::UniqueViolation);
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<alumni::Model>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn find(&self, filter: &DirectoryFilter) -> Result<Vec<alumni::Model>, StoreError> {
        let records = self.records.read().await;
        let mut found: Vec<alumni::Model> = records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        found.sort_by(query::newest_first);
        Ok(found)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
        now: DateTimeUtc,
    ) -> Result<Option<alumni::Model>, StoreError> {
        let mut records = self.records.write().await;

        if let Some(email) = &changes.email {
            if email_taken(&records, email, Some(id)) {
                return Err(StoreError::UniqueViolation);
            }
        }

        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let updated_at = next_write_time(record.updated_at, now);
        changes.apply(record, updated_at);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn stats(&self) -> Result<AlumniStats, StoreError> {
        let records = self.records.read().await;

        let total = records.len() as u64;
        let verified = records.iter().filter(|r| r.is_verified).count() as u64;
        let batches = tally(records.iter().map(|r| r.batch.as_str()));
        let companies = tally(records.iter().map(|r| r.current_company.as_str()));

        Ok(AlumniStats::new(
            total,
            verified,
            query::sort_batch_stats(batches),
            query::rank_top_companies(companies),
        ))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
