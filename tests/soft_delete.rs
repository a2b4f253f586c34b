#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use common::TestContext;
use kkg_pjok_backend::models::user::Role;

#[actix_web::test]
async fn deleted_rows_vanish_from_list_and_detail() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let token = ctx.token(&admin);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/activities")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "title": "Senam Pagi", "date": "2025-03-01" }))
        .to_request();
    let activity: Value = test::call_and_read_body_json(&app, req).await;

    let resources = [
        (
            "/api/meetings",
            json!({ "title": "Rapat Evaluasi", "date": "2025-03-02", "activity_id": activity["id"] }),
        ),
        (
            "/api/transactions",
            json!({ "description": "Beli bola", "amount": 75_000, "type": "expense", "category": "alat", "date": "2025-03-03" }),
        ),
        (
            "/api/gallery",
            json!({ "title": "Foto senam", "file_url": "https://cdn.example/senam.jpg", "activity_id": activity["id"] }),
        ),
        ("/api/iuran/config", json!({ "periode_tahun": 2025, "nominal": 50_000 })),
    ];

    for (base, payload) in resources {
        let req = test::TestRequest::post()
            .uri(base)
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED, "{}", base);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::delete()
            .uri(&format!("{}?id={}", base, id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT, "{}", base);

        let req = test::TestRequest::get()
            .uri(base)
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(rows.iter().all(|r| r["id"] != json!(id)), "{}", base);

        let req = test::TestRequest::get()
            .uri(&format!("{}?id={}", base, id))
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND, "{}", base);
    }
}

#[actix_web::test]
async fn deleted_transactions_leave_the_summary() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let token = ctx.token(&bendahara);
    let app = app!(ctx);

    let mut ids = Vec::new();
    for (amount, tx_type) in [(100_000, "income"), (40_000, "expense")] {
        let req = test::TestRequest::post()
            .uri("/api/transactions")
            .insert_header((header::AUTHORIZATION, token.as_str()))
            .set_json(json!({ "description": "Kas", "amount": amount, "type": tx_type, "category": "kas", "date": "2025-02-01" }))
            .to_request();
        let tx: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(tx["id"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/transactions?id={}", ids[1]))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/transactions/summary")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["total_income"], 100_000);
    assert_eq!(summary["total_expense"], 0);
    assert_eq!(summary["balance"], 100_000);
    assert_eq!(summary["transaction_count"], 1);
}

#[actix_web::test]
async fn deleted_config_no_longer_sets_the_checklist_fee() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let token = ctx.token(&admin);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/iuran/config")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "periode_tahun": 2025, "nominal": 50_000 }))
        .to_request();
    let config: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/iuran/config?id={}", config["id"].as_str().unwrap()))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri("/api/iuran/checklist?tahun=2025")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 1);
    assert!(rows[0]["iuran_per_bulan"].is_null());
    assert!(rows[0]["total_iuran"].is_null());
}
