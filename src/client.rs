// ============================================================================
// CLIENT HTTP - AlumniConnect
// ============================================================================
//
// Adaptateur côté client: une méthode par endpoint, enveloppe décodée.
// Ne fait aucune validation; les erreurs du serveur remontent telles quelles.
//
// ============================================================================

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::alumni;
use crate::models::dto::{AlumniStats, ApiResponse, RegisterAlumniRequest, UpdateAlumniRequest};
use crate::services::query::DirectoryFilter;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// réponse non-2xx; `body` est l'enveloppe si le serveur en a renvoyé une
    #[error("server answered {status}")]
    Api {
        status: StatusCode,
        body: Option<ApiResponse<Value>>,
    },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Transport(e) => e.status(),
            ClientError::Api { status, .. } => Some(*status),
        }
    }

    /// Message de l'enveloppe d'erreur, s'il y en a un
    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Api { body: Some(body), .. } => body.message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AlumniClient {
    http: reqwest::Client,
    base_url: String,
}

impl AlumniClient {
    /// `base_url` sans /api, ex: http://localhost:5000
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/alumni{}", self.base_url, path)
    }

    pub async fn register(
        &self,
        request: &RegisterAlumniRequest,
    ) -> Result<ApiResponse<alumni::Model>, ClientError> {
        self.send(Method::POST, &self.url("/register"), Some(request)).await
    }

    pub async fn list(
        &self,
        filter: Option<&DirectoryFilter>,
    ) -> Result<ApiResponse<Vec<alumni::Model>>, ClientError> {
        let mut request = self.http.get(self.url("/directory"));
        if let Some(filter) = filter {
            request = request.query(&filter.clone().normalized());
        }
        decode(request.send().await?).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ApiResponse<alumni::Model>, ClientError> {
        self.send::<(), _>(Method::GET, &self.url(&format!("/{id}")), None).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateAlumniRequest,
    ) -> Result<ApiResponse<alumni::Model>, ClientError> {
        self.send(Method::PUT, &self.url(&format!("/{id}")), Some(changes)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<ApiResponse<Value>, ClientError> {
        self.send::<(), _>(Method::DELETE, &self.url(&format!("/{id}")), None).await
    }

    pub async fn stats(&self) -> Result<ApiResponse<AlumniStats>, ClientError> {
        self.send::<(), _>(Method::GET, &self.url("/admin/stats"), None).await
    }

    pub async fn verify(&self, id: Uuid) -> Result<ApiResponse<alumni::Model>, ClientError> {
        let empty = serde_json::Map::new();
        self.send(Method::PATCH, &self.url(&format!("/{id}/verify")), Some(&empty)).await
    }

    async fn send<B, T>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    // corps illisible: on garde quand même le statut
    let body = response.json::<ApiResponse<Value>>().await.ok();
    Err(ClientError::Api { status, body })
}
