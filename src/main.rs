// main.rs
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;

use kkg_pjok_backend::config::AppConfig;
use kkg_pjok_backend::store::PgStore;
use kkg_pjok_backend::{AppState, db, routes};

// Body terbesar yang wajar untuk API ini (galeri hanya menyimpan URL).
const MAX_PAYLOAD: usize = 1024 * 1024;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("starting up...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Konfigurasi tidak valid: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match db::establish_connection(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Gagal inisialisasi pool database: {:?}", e);
            std::process::exit(1);
        }
    };

    let state = web::Data::new(AppState::new(Arc::new(PgStore::new(pool.clone())), &config));
    let allowed_origin = config.cors_allowed_origin.clone();

    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let cors = match &allowed_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(MAX_PAYLOAD))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    pool.close().await;
    log::info!("server stopped");
    Ok(())
}
