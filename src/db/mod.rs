// connexion BD + contrat de stockage

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeUtc;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::{AppConfig, StoreConfig};
use crate::models::alumni;
use crate::models::dto::{AlumniChanges, AlumniStats};
use crate::services::query::DirectoryFilter;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// contrainte UNIQUE (email) violée, rien n'a été écrit
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("{0}")]
    Backend(String),
}

/// Contrat de stockage de la collection alumni.
/// Chaque méthode est une seule lecture ou écriture, atomique pour un enregistrement.
#[async_trait]
pub trait AlumniStore: Send + Sync {
    async fn insert(&self, record: alumni::Model) -> Result<alumni::Model, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<alumni::Model>, StoreError>;

    /// Enregistrements filtrés, plus récents d'abord
    async fn find(&self, filter: &DirectoryFilter) -> Result<Vec<alumni::Model>, StoreError>;

    /// Applique `changes`; updated_at = next_write_time(ancien, now). None si l'id n'existe pas.
    async fn update(
        &self,
        id: Uuid,
        changes: AlumniChanges,
        now: DateTimeUtc,
    ) -> Result<Option<alumni::Model>, StoreError>;

    /// false si l'id n'existe pas
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn stats(&self) -> Result<AlumniStats, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) -> Result<(), StoreError>;
}

/// Ouvre le stockage choisi par la config (une seule fois, au démarrage)
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn AlumniStore>, StoreError> {
    match &config.store {
        StoreConfig::Postgres { database_url } => {
            info!("🔌 Connecting to database...");
            let store = PostgresStore::connect(database_url).await?;
            info!("✅ Database connected!");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("using in-memory alumni store, data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
