mod api;
mod config;
mod database;
mod middleware;
mod models;
mod routes;
mod services;
mod utils;

#[cfg(test)]
mod test_support;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Config,
    database::Store,
    services::{PaymentGateway, StripeGateway, TokenService},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    log::info!("🚀 Starting Employee Service...");
    log::info!("📊 Database: {}", config.database_name);

    let db = database::MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::other(e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    let gateway = StripeGateway::new(&config.stripe_secret_key)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let store: Arc<dyn Store> = Arc::new(db);
    let gateway: Arc<dyn PaymentGateway> = Arc::new(gateway);
    let store_data = web::Data::from(store);
    let gateway_data = web::Data::from(gateway);
    let tokens = web::Data::new(TokenService::new(&config.access_token_secret));

    let cors_origins = config.cors_origins.clone();
    let bind_addr = (config.host.clone(), config.port);

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PATCH", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .max_age(3600);
        let cors = if cors_origins.is_empty() {
            cors.allow_any_origin()
        } else {
            cors_origins
                .iter()
                .fold(cors, |cors, origin| cors.allowed_origin(origin))
        };

        App::new()
            .app_data(store_data.clone())
            .app_data(gateway_data.clone())
            .app_data(tokens.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()),
            )
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
