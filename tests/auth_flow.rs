#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use common::{PASSWORD, TestContext, kind};
use kkg_pjok_backend::models::user::Role;
use kkg_pjok_backend::store::UserStore;

#[actix_web::test]
async fn signup_then_login_gives_a_usable_token() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "email": "Guru.Baru@kkg.test",
            "password": "olahraga",
            "name": "Guru Baru",
            "school": "SDN 4",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["role"], "anggota");
    assert!(body["user"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "guru.baru@kkg.test", "password": "olahraga" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!body["user"]["last_login_at"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/activities")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn wrong_email_and_wrong_password_look_the_same() {
    let ctx = TestContext::new();
    let user = ctx.user("Ani Anggota", Role::Anggota).await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": user.email, "password": "salah" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "tidak.ada@kkg.test", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let wrong_email: Value = test::read_body_json(resp).await;

    assert_eq!(wrong_password["message"], wrong_email["message"]);
}

#[actix_web::test]
async fn deleted_user_cannot_log_in() {
    let ctx = TestContext::new();
    let user = ctx.user("Ani Anggota", Role::Anggota).await;
    ctx.store.soft_delete_user(user.id).await.unwrap();
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": user.email, "password": PASSWORD }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn duplicate_signup_is_rejected() {
    let ctx = TestContext::new();
    let user = ctx.user("Ani Anggota", Role::Anggota).await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({ "email": user.email, "password": "olahraga", "name": "Ani Lagi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "duplicate");
}

#[actix_web::test]
async fn protected_routes_require_a_token() {
    let ctx = TestContext::new();
    let app = app!(ctx);

    for uri in [
        "/api/users",
        "/api/activities",
        "/api/attendance",
        "/api/meetings",
        "/api/transactions",
        "/api/transactions/summary",
        "/api/gallery",
        "/api/iuran/config",
        "/api/iuran/pembayaran",
        "/api/iuran/checklist",
        "/api/audit-logs",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    // Token dicek sebelum method.
    let req = test::TestRequest::put().uri("/api/gallery").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/activities")
        .insert_header((header::AUTHORIZATION, "Bearer bukan.token.valid"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn public_count_ignores_deleted_users() {
    let ctx = TestContext::new();
    ctx.user("Ani Anggota", Role::Anggota).await;
    let gone = ctx.user("Bayu Anggota", Role::Anggota).await;
    ctx.store.soft_delete_user(gone.id).await.unwrap();
    let app = app!(ctx);

    let req = test::TestRequest::get().uri("/api/users/public?type=count").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["count"], 1);

    let req = test::TestRequest::get().uri("/api/users/public").to_request();
    let members: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["name"], "Ani Anggota");
    assert!(members[0].get("email").is_none());
}
