#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use serde_json::Value;

use kkg_pjok_backend::AppState;
use kkg_pjok_backend::auth::{JwtKeys, generate_jwt};
use kkg_pjok_backend::models::user::{NewUser, Role, User};
use kkg_pjok_backend::store::{MemoryStore, Store, UserStore};

pub const PASSWORD: &str = "rahasia123";

/// State aplikasi di atas `MemoryStore`, plus akses langsung ke store untuk seeding.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn Store> = store.clone();
        let state = web::Data::new(AppState {
            store: shared,
            jwt: JwtKeys::new("test-secret", 7),
            bcrypt_cost: 4,
            default_member_password: "password123".to_string(),
        });
        TestContext { store, state }
    }

    pub async fn user(&self, name: &str, role: Role) -> User {
        let email = format!("{}@kkg.test", name.to_lowercase().replace(' ', "."));
        let new_user = NewUser {
            email,
            password_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
            name: name.to_string(),
            role,
            position: None,
            school: Some("SDN 1".to_string()),
            phone: None,
        };
        self.store.insert_user(&new_user).await.unwrap().unwrap()
    }

    pub fn token(&self, user: &User) -> String {
        let token = generate_jwt(&self.state.jwt, user.id, &user.email, user.role).unwrap();
        format!("Bearer {}", token)
    }
}

// Bangun service uji dari `TestContext`.
macro_rules! app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.state.clone())
                .configure(kkg_pjok_backend::routes),
        )
        .await
    };
}

pub fn kind(body: &Value) -> &str {
    body["kind"].as_str().unwrap_or_default()
}
