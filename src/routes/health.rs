use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use serde_json::json;

use crate::models::health::HealthResponse;
use crate::services::alumni_service::AlumniService;

#[get("/health")]
pub async fn health_check(service: web::Data<AlumniService>) -> HttpResponse {
    // ping du stockage: 503 si la BD ne répond pas
    let (status, storage) = match service.ping().await {
        Ok(()) => ("ok", "up"),
        Err(_) => ("degraded", "down"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        time: Utc::now(),
        storage: storage.to_string(),
    };

    if storage == "up" {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Page d'accueil: liste des endpoints
#[get("/")]
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "AlumniConnect API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "POST /api/alumni/register",
            "directory": "GET /api/alumni/directory",
            "profile": "GET /api/alumni/:id",
            "update": "PUT /api/alumni/:id",
            "delete": "DELETE /api/alumni/:id",
            "stats": "GET /api/alumni/admin/stats",
            "verify": "PATCH /api/alumni/:id/verify",
            "health": "GET /api/health"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use actix_web::{App, http::StatusCode, test};
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_health_and_index() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AlumniService::new(Arc::new(MemoryStore::new()))))
                .service(api_index)
                .service(web::scope("/api").service(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "up");

        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["endpoints"]["verify"], "PATCH /api/alumni/:id/verify");
    }
}
