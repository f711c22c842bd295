use actix_web::{HttpResponse, web};

use crate::models::dto::{ApiResponse, RegisterAlumniRequest, UpdateAlumniRequest};
use crate::routes::route_not_found;
use crate::services::alumni_service::AlumniService;
use crate::services::error::AlumniError;
use crate::services::query::DirectoryFilter;

/// POST /api/alumni/register
pub async fn register_alumni(
    service: web::Data<AlumniService>,
    body: web::Json<RegisterAlumniRequest>,
) -> Result<HttpResponse, AlumniError> {
    let alumni = service.register(body.into_inner()).await?;

    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(alumni).with_message("Alumni registered successfully!")))
}

/// GET /api/alumni/directory?batch=&company=&search=&verified=
pub async fn get_directory(
    service: web::Data<AlumniService>,
    filter: web::Query<DirectoryFilter>,
) -> Result<HttpResponse, AlumniError> {
    let listing = service.list(filter.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing.alumni).with_count(listing.count)))
}

/// GET /api/alumni/{id}
pub async fn get_alumni(
    service: web::Data<AlumniService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AlumniError> {
    let alumni = service.get_by_id(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(alumni)))
}

/// PUT /api/alumni/{id}
pub async fn update_alumni(
    service: web::Data<AlumniService>,
    id: web::Path<String>,
    body: web::Json<UpdateAlumniRequest>,
) -> Result<HttpResponse, AlumniError> {
    let alumni = service.update(&id, body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(alumni).with_message("Profile updated successfully!")))
}

/// DELETE /api/alumni/{id}
pub async fn delete_alumni(
    service: web::Data<AlumniService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AlumniError> {
    service.delete(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Alumni profile deleted successfully!")))
}

/// GET /api/alumni/admin/stats (pas d'authentification)
pub async fn get_admin_stats(
    service: web::Data<AlumniService>,
) -> Result<HttpResponse, AlumniError> {
    let stats = service.stats().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// PATCH /api/alumni/{id}/verify (pas d'authentification)
pub async fn verify_alumni(
    service: web::Data<AlumniService>,
    id: web::Path<String>,
) -> Result<HttpResponse, AlumniError> {
    let alumni = service.verify(&id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(alumni).with_message("Alumni verified successfully!")))
}

// l'ordre compte: /directory et /admin/stats avant /{id}
// default_service: mauvaise méthode sur un chemin connu → 404 comme une route inconnue
pub fn alumni_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/alumni")
            .service(
                web::resource("/register")
                    .route(web::post().to(register_alumni))
                    .default_service(web::to(route_not_found)),
            )
            .service(
                web::resource("/directory")
                    .route(web::get().to(get_directory))
                    .default_service(web::to(route_not_found)),
            )
            .service(
                web::resource("/admin/stats")
                    .route(web::get().to(get_admin_stats))
                    .default_service(web::to(route_not_found)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_alumni))
                    .route(web::put().to(update_alumni))
                    .route(web::delete().to(delete_alumni))
                    .default_service(web::to(route_not_found)),
            )
            .service(
                web::resource("/{id}/verify")
                    .route(web::patch().to(verify_alumni))
                    .default_service(web::to(route_not_found)),
            ),
    );
}
