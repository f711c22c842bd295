pub mod alumni;
pub mod health;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};

use crate::models::dto::ApiResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // JSON ou query string illisible → même enveloppe que les autres erreurs 400
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiResponse::failure(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ApiResponse::failure(err.to_string()));
        InternalError::from_response(err, response).into()
    }))
    .service(health::api_index)
    .service(
        web::scope("/api")
            .service(health::health_check)
            .configure(alumni::alumni_routes),
    )
    .default_service(web::to(route_not_found));
}

pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Route not found"))
}
