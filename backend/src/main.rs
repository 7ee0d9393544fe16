use std::sync::Arc;

use actix_files::Files;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use log::{error, info};

use aqi_backend::config::ServerConfig;
use aqi_backend::handlers;
use aqi_backend::inference::ModelInference;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    info!("starting AQI prediction service");

    let config = ServerConfig::from_env();

    let model = match ModelInference::load(&config.model_dir) {
        Ok(model) => model,
        Err(e) => {
            error!("failed to load model artifacts: {:#}", e);
            std::process::exit(1);
        }
    };
    let info = model.get_model_info();
    info!(
        "model loaded from {} (format={}, features={})",
        config.model_dir.display(),
        info.format,
        info.feature_count
    );

    let model_data = web::Data::new(Arc::new(model));
    let bind_address = config.bind_address();
    let static_dir = config.static_dir.clone();

    info!("listening on http://{}", bind_address);
    info!("workers: {}", config.workers);
    info!("endpoints:");
    info!("   GET  /                - prediction form");
    info!("   POST /predict         - predict AQI from form fields");
    info!("   GET  /api/health      - health check");
    info!("   GET  /api/model-info  - model format and features");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(model_data.clone())
            .configure(handlers::configure)
            .service(Files::new("/static", static_dir.clone()).prefer_utf8(true))
            .default_service(web::route().to(handlers::not_found))
    })
    .workers(config.workers)
    .bind(&bind_address)?
    .run()
    .await
}
