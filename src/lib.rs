use std::sync::Arc;

use actix_web::web;

pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::store::Store;

/// State yang dibagikan ke semua handler lewat `web::Data`.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: JwtKeys,
    pub bcrypt_cost: u32,
    pub default_member_password: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &AppConfig) -> Self {
        AppState {
            store,
            jwt: JwtKeys::new(&config.jwt_secret, config.token_ttl_days),
            bcrypt_cost: config.bcrypt_cost,
            default_member_password: config.default_member_password.clone(),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    controllers::configure(cfg);
}
