mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::database::{MongoDB, Store};

fn cors_for(config: &Config) -> Cors {
    if config.cors_allowed_origins.is_empty() {
        return Cors::permissive();
    }

    config
        .cors_allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().context("invalid configuration")?;

    log::info!("🚀 Starting Mobilesebaa Server...");
    log::info!("📊 Database: {} ({})", config::redact_uri(&config.mongodb_uri), config.database_name);

    let db = MongoDB::new(&config.mongodb_uri, &config.database_name)
        .await
        .context("invalid MongoDB connection settings")?;

    // The listener starts even when the cluster is unreachable; /health reports it
    match db.ping().await {
        Ok(()) => {
            log::info!("✅ MongoDB connected successfully");
            db.ensure_indexes().await;
        }
        Err(e) => log::error!("❌ MongoDB unreachable at startup: {}", e),
    }

    let store: Arc<dyn Store> = Arc::new(db.clone());
    let db_data = web::Data::from(store);
    let config_data = web::Data::new(config.clone());

    let bind_address = config.bind_address();
    log::info!("🌐 Mobilesebaa is running on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .wrap(cors_for(&config_data))
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {}", bind_address))?
    .run()
    .await?;

    log::info!("🛑 Server stopped, closing MongoDB connection");
    db.client().clone().shutdown().await;

    Ok(())
}
