use actix_web::{App, HttpServer, middleware, web};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use alumni_connect::config::AppConfig;
use alumni_connect::db;
use alumni_connect::routes;
use alumni_connect::services::alumni_service::AlumniService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let store = db::open_store(&config)
        .await
        .map_err(std::io::Error::other)?;

    let service = web::Data::new(AlumniService::new(store));
    let app_service = service.clone();

    info!("🚀 Starting server on http://{}:{}", config.host, config.port);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_service.clone())
            .configure(routes::configure_routes)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let result = server.bind((config.host.as_str(), config.port))?.run().await;

    // arrêt propre (Ctrl+C géré par actix): fermeture du pool
    if let Err(e) = service.shutdown().await {
        error!(error = %e, "store did not close cleanly");
    }
    info!("👋 Server stopped");

    result
}
