#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use common::{TestContext, kind};
use kkg_pjok_backend::models::audit_log::AuditAction;
use kkg_pjok_backend::models::user::Role;

#[actix_web::test]
async fn only_sekretaris_or_admin_create_activities() {
    let ctx = TestContext::new();
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let sekretaris = ctx.user("Sari Sekretaris", Role::Sekretaris).await;
    let app = app!(ctx);
    let payload = json!({ "title": "Senam Pagi", "date": "2025-03-01" });

    let req = test::TestRequest::post()
        .uri("/api/activities")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/activities")
        .insert_header((header::AUTHORIZATION, ctx.token(&sekretaris)))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let qr = body["qr_code"].as_str().unwrap();
    assert_eq!(qr.len(), 6);
    assert!(qr.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert_eq!(body["status"], "draft");
}

#[actix_web::test]
async fn transactions_are_for_bendahara_or_admin() {
    let ctx = TestContext::new();
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/transactions")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .set_json(json!({ "description": "Kas", "amount": 10_000, "type": "income", "category": "kas", "date": "2025-01-05" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/transactions")
        .insert_header((header::AUTHORIZATION, ctx.token(&bendahara)))
        .set_json(json!({ "description": "Kas", "amount": 0, "type": "income", "category": "kas", "date": "2025-01-05" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "validation");

    for (amount, tx_type) in [(50_000, "income"), (20_000, "expense")] {
        let req = test::TestRequest::post()
            .uri("/api/transactions")
            .insert_header((header::AUTHORIZATION, ctx.token(&bendahara)))
            .set_json(json!({ "description": "Kas", "amount": amount, "type": tx_type, "category": "kas", "date": "2025-01-05" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/transactions/summary?category=kas")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total_income"], 50_000);
    assert_eq!(body["total_expense"], 20_000);
    assert_eq!(body["balance"], 30_000);
    assert_eq!(body["transaction_count"], 2);
}

#[actix_web::test]
async fn gallery_has_no_update() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let app = app!(ctx);

    let req = test::TestRequest::put()
        .uri("/api/gallery")
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .set_json(json!({ "title": "x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "method_not_allowed");

    let req = test::TestRequest::post()
        .uri("/api/iuran/checklist")
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[actix_web::test]
async fn user_management_is_admin_only() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header((header::AUTHORIZATION, ctx.token(&bendahara)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .set_json(json!({ "email": "cici@kkg.test", "name": "Cici" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["role"], "anggota");

    // Password default bisa dipakai login.
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "cici@kkg.test", "password": "password123" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/users?id={}", created["id"].as_str().unwrap()))
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .to_request();
    let users: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.len(), 2);
}

#[actix_web::test]
async fn audit_log_is_admin_only_and_clamped() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    for i in 0..3 {
        ctx.store
            .record_audit("activities", &i.to_string(), AuditAction::Insert, Some(admin.id), None)
            .await;
    }
    let app = app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/audit-logs")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/audit-logs?limit=0")
        .insert_header((header::AUTHORIZATION, ctx.token(&admin)))
        .to_request();
    let logs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["action"], "INSERT");
    assert_eq!(logs[0]["user_name"], "Admin");
}
