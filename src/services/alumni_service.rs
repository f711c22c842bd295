use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;
use validator::Validate;

use crate::db::{AlumniStore, StoreError};
use crate::models::alumni::{self, now_micros};
use crate::models::dto::{
    AlumniChanges, AlumniStats, DirectoryListing, RegisterAlumniRequest, UpdateAlumniRequest,
};
use crate::services::error::AlumniError;
use crate::services::query::DirectoryFilter;

/// Opérations CRUD sur la collection alumni.
/// Le stockage est injecté au démarrage (PostgreSQL ou mémoire).
#[derive(Clone)]
pub struct AlumniService {
    store: Arc<dyn AlumniStore>,
}

impl AlumniService {
    pub fn new(store: Arc<dyn AlumniStore>) -> Self {
        Self { store }
    }

    /// Inscrit un nouveau profil (isVerified = false)
    pub async fn register(
        &self,
        mut request: RegisterAlumniRequest,
    ) -> Result<alumni::Model, AlumniError> {
        request.normalize();
        request.validate()?;

        let record = request.into_record(Uuid::new_v4(), now_micros());
        let saved = self
            .store
            .insert(record)
            .await
            .map_err(|e| storage_failure("register", e))?;

        info!(id = %saved.id, batch = %saved.batch, "alumni registered");
        Ok(saved)
    }

    /// Répertoire filtré, plus récents d'abord
    pub async fn list(&self, filter: DirectoryFilter) -> Result<DirectoryListing, AlumniError> {
        let filter = filter.normalized();
        let alumni = self
            .store
            .find(&filter)
            .await
            .map_err(|e| storage_failure("list", e))?;

        debug!(?filter, count = alumni.len(), "directory listed");
        Ok(DirectoryListing {
            count: alumni.len(),
            alumni,
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<alumni::Model, AlumniError> {
        let id = parse_id(id)?;
        self.store
            .find_by_id(id)
            .await
            .map_err(|e| storage_failure("get", e))?
            .ok_or(AlumniError::NotFound)
    }

    /// Mise à jour partielle: seuls les champs fournis sont vérifiés et modifiés
    pub async fn update(
        &self,
        id: &str,
        mut request: UpdateAlumniRequest,
    ) -> Result<alumni::Model, AlumniError> {
        let id = parse_id(id)?;
        request.normalize();
        request.validate()?;

        let updated = self
            .store
            .update(id, request.into_changes(), now_micros())
            .await
            .map_err(|e| storage_failure("update", e))?
            .ok_or(AlumniError::NotFound)?;

        info!(id = %updated.id, "alumni profile updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AlumniError> {
        let id = parse_id(id)?;
        let deleted = self
            .store
            .delete(id)
            .await
            .map_err(|e| storage_failure("delete", e))?;

        if !deleted {
            return Err(AlumniError::NotFound);
        }
        info!(%id, "alumni profile deleted");
        Ok(())
    }

    /// Marque le profil comme vérifié; idempotent
    pub async fn verify(&self, id: &str) -> Result<alumni::Model, AlumniError> {
        let id = parse_id(id)?;
        let verified = self
            .store
            .update(id, AlumniChanges::verify(), now_micros())
            .await
            .map_err(|e| storage_failure("verify", e))?
            .ok_or(AlumniError::NotFound)?;

        info!(id = %verified.id, "alumni verified");
        Ok(verified)
    }

    /// Stats du dashboard admin
    pub async fn stats(&self) -> Result<AlumniStats, AlumniError> {
        self.store
            .stats()
            .await
            .map_err(|e| storage_failure("stats", e))
    }

    pub async fn ping(&self) -> Result<(), AlumniError> {
        self.store
            .ping()
            .await
            .map_err(|e| storage_failure("ping", e))
    }

    pub async fn shutdown(&self) -> Result<(), AlumniError> {
        self.store
            .close()
            .await
            .map_err(|e| storage_failure("close", e))
    }
}

// un id qui n'est pas un UUID ne peut désigner aucun profil
fn parse_id(id: &str) -> Result<Uuid, AlumniError> {
    Uuid::parse_str(id.trim()).map_err(|_| {
        debug!(id, "malformed alumni id");
        AlumniError::NotFound
    })
}

fn storage_failure(operation: &'static str, err: StoreError) -> AlumniError {
    match &err {
        StoreError::UniqueViolation => debug!(operation, "email already registered"),
        StoreError::Backend(detail) => error!(operation, %detail, "storage failure"),
    }
    AlumniError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use futures::future::join_all;

    fn service() -> AlumniService {
        AlumniService::new(Arc::new(MemoryStore::new()))
    }

    fn request(name: &str, email: &str, batch: &str, company: &str) -> RegisterAlumniRequest {
        RegisterAlumniRequest {
            name: name.to_string(),
            email: email.to_string(),
            batch: batch.to_string(),
            current_company: company.to_string(),
            job_role: "Eng".to_string(),
            location: "NY".to_string(),
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn test_register_then_get_returns_input_plus_generated_fields() {
        let service = service();
        let mut input = request("A B", "ab@x.com", "2020", "Acme");
        input.skills = vec!["rust".to_string(), "sql".to_string()];
        input.bio = Some("Hello".to_string());

        let saved = service.register(input).await.unwrap();
        let found = service.get_by_id(&saved.id.to_string()).await.unwrap();

        assert_eq!(found, saved);
        assert_eq!(found.name, "A B");
        assert_eq!(found.email, "ab@x.com");
        assert_eq!(found.current_company, "Acme");
        assert_eq!(found.skills.0, vec!["rust", "sql"]);
        assert_eq!(found.bio.as_deref(), Some("Hello"));
        assert!(!found.is_verified);
        assert_eq!(found.created_at, found.updated_at);
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_case_insensitive() {
        let service = service();
        service.register(request("A B", "ab@x.com", "2020", "Acme")).await.unwrap();

        let second = service.register(request("Other", " AB@X.COM ", "2021", "Initech")).await;
        assert!(matches!(second, Err(AlumniError::DuplicateEmail)));
    }

    #[actix_web::test]
    async fn test_register_rejects_invalid_input() {
        let service = service();
        let result = service.register(request("  ", "ab@x.com", "2020", "Acme")).await;

        let Err(AlumniError::Validation(fields)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "name");
        assert_eq!(fields[0].message, "Name is required");
        assert!(service.list(DirectoryFilter::default()).await.unwrap().alumni.is_empty());
    }

    #[actix_web::test]
    async fn test_linked_in_without_scheme_is_accepted() {
        let service = service();
        let mut input = request("A B", "ab@x.com", "2020", "Acme");
        input.linked_in = Some("linkedin.com/in/ab".to_string());

        let saved = service.register(input).await.unwrap();
        assert_eq!(saved.linked_in.as_deref(), Some("linkedin.com/in/ab"));

        let changes = UpdateAlumniRequest {
            linked_in: Some("www.linkedin.com/in/ab".to_string()),
            ..Default::default()
        };
        let updated = service.update(&saved.id.to_string(), changes).await.unwrap();
        assert_eq!(updated.linked_in.as_deref(), Some("www.linkedin.com/in/ab"));
    }

    #[actix_web::test]
    async fn test_concurrent_registrations_with_same_email() {
        let service = service();
        let attempts = (0..8).map(|i| {
            let service = service.clone();
            async move {
                service
                    .register(request(&format!("Racer {i}"), "race@x.com", "2020", "Acme"))
                    .await
            }
        });

        let results = join_all(attempts).await;
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AlumniError::DuplicateEmail)));
    }

    #[actix_web::test]
    async fn test_partial_update_changes_only_supplied_fields() {
        let service = service();
        let saved = service.register(request("A B", "ab@x.com", "2020", "Acme")).await.unwrap();

        let update = UpdateAlumniRequest {
            job_role: Some("Staff Eng".to_string()),
            location: Some(" Boston ".to_string()),
            ..Default::default()
        };
        let updated = service.update(&saved.id.to_string(), update).await.unwrap();

        assert_eq!(updated.job_role, "Staff Eng");
        assert_eq!(updated.location, "Boston");
        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.created_at, saved.created_at);
        assert_eq!(updated.name, saved.name);
        assert_eq!(updated.email, saved.email);
        assert_eq!(updated.batch, saved.batch);
        assert_eq!(updated.current_company, saved.current_company);
        assert_eq!(updated.is_verified, saved.is_verified);
        assert!(updated.updated_at > saved.updated_at);
    }

    #[actix_web::test]
    async fn test_update_errors() {
        let service = service();
        let first = service.register(request("A", "a@x.com", "2020", "Acme")).await.unwrap();
        let second = service.register(request("B", "b@x.com", "2020", "Acme")).await.unwrap();

        let taken = UpdateAlumniRequest {
            email: Some("A@x.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&second.id.to_string(), taken).await,
            Err(AlumniError::DuplicateEmail)
        ));

        let too_long = UpdateAlumniRequest {
            bio: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(matches!(
            service.update(&first.id.to_string(), too_long).await,
            Err(AlumniError::Validation(_))
        ));

        assert!(matches!(
            service.update(&Uuid::new_v4().to_string(), UpdateAlumniRequest::default()).await,
            Err(AlumniError::NotFound)
        ));
    }

    #[actix_web::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let saved = service.register(request("A B", "ab@x.com", "2020", "Acme")).await.unwrap();
        let id = saved.id.to_string();

        service.delete(&id).await.unwrap();

        assert!(matches!(service.get_by_id(&id).await, Err(AlumniError::NotFound)));
        assert!(matches!(service.delete(&id).await, Err(AlumniError::NotFound)));
    }

    #[actix_web::test]
    async fn test_malformed_id_is_not_found() {
        let service = service();
        assert!(matches!(service.get_by_id("not-a-uuid").await, Err(AlumniError::NotFound)));
        assert!(matches!(service.verify("42").await, Err(AlumniError::NotFound)));
    }

    #[actix_web::test]
    async fn test_list_by_batch_is_exact_and_newest_first() {
        let service = service();
        service.register(request("A", "a@x.com", "2020", "Acme")).await.unwrap();
        service.register(request("B", "b@x.com", "2021", "Acme")).await.unwrap();
        service.register(request("C", "c@x.com", "2020", "Acme")).await.unwrap();
        service.register(request("D", "d@x.com", "20201", "Acme")).await.unwrap();

        let listing = service
            .list(DirectoryFilter {
                batch: Some("2020".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(listing.count, 2);
        assert!(listing.alumni.iter().all(|a| a.batch == "2020"));
        assert!(listing
            .alumni
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[actix_web::test]
    async fn test_list_by_company_substring() {
        let service = service();
        service.register(request("A", "a@x.com", "2020", "Google")).await.unwrap();
        service.register(request("B", "b@x.com", "2020", "GOOGL Inc")).await.unwrap();
        service.register(request("C", "c@x.com", "2020", "Microsoft")).await.unwrap();

        let listing = service
            .list(DirectoryFilter {
                company: Some("goog".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut companies: Vec<&str> = listing.alumni.iter().map(|a| a.current_company.as_str()).collect();
        companies.sort();
        assert_eq!(companies, vec!["GOOGL Inc", "Google"]);
    }

    #[actix_web::test]
    async fn test_stats_counts_verified() {
        let service = service();
        let mut ids = Vec::new();
        for i in 0..5 {
            let saved = service
                .register(request(&format!("A{i}"), &format!("a{i}@x.com"), "2020", "Acme"))
                .await
                .unwrap();
            ids.push(saved.id.to_string());
        }
        for id in &ids[..3] {
            service.verify(id).await.unwrap();
        }

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_alumni, 5);
        assert_eq!(stats.verified_alumni, 3);
        assert_eq!(stats.unverified_alumni, 2);
    }

    #[actix_web::test]
    async fn test_verify_is_idempotent() {
        let service = service();
        let saved = service.register(request("A B", "ab@x.com", "2020", "Acme")).await.unwrap();
        let id = saved.id.to_string();

        let first = service.verify(&id).await.unwrap();
        let second = service.verify(&id).await.unwrap();

        assert!(first.is_verified);
        assert!(second.is_verified);
        assert!(first.updated_at > saved.updated_at);
        assert!(second.updated_at > first.updated_at);
    }
}
