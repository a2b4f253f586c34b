#[macro_use]
mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use common::{TestContext, kind};
use kkg_pjok_backend::models::user::Role;

async fn seed_config(ctx: &TestContext, token: &str, tahun: i32, nominal: i64) {
    let app = app!(ctx);
    let req = test::TestRequest::post()
        .uri("/api/iuran/config")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({ "periode_tahun": tahun, "nominal": nominal }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

async fn seed_payment(ctx: &TestContext, token: &str, user_id: &str, months: &[i32], jumlah: i64) -> String {
    let app = app!(ctx);
    let req = test::TestRequest::post()
        .uri("/api/iuran/pembayaran")
        .insert_header((header::AUTHORIZATION, token))
        .set_json(json!({
            "user_id": user_id,
            "periode_tahun": 2025,
            "bulan_dibayar": months,
            "jumlah": jumlah,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    body["id"].as_str().unwrap().to_string()
}

#[actix_web::test]
async fn partial_payment_shows_in_checklist() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&bendahara);

    seed_config(&ctx, &token, 2025, 50_000).await;
    seed_payment(&ctx, &token, &anggota.id.to_string(), &[3, 1, 2, 2], 150_000).await;

    let app = app!(ctx);
    let req = test::TestRequest::get()
        .uri("/api/iuran/checklist?tahun=2025")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(rows.len(), 2);
    let ani = rows.iter().find(|r| r["user_id"] == json!(anggota.id)).unwrap();
    assert_eq!(ani["total_dibayar"], 150_000);
    assert_eq!(ani["total_iuran"], 600_000);
    assert_eq!(ani["sisa_tunggakan"], 450_000);
    assert_eq!(ani["bulan_lunas"], json!([1, 2, 3]));
    assert_eq!(ani["bulan_belum_lunas"].as_array().unwrap().len(), 9);
    assert_eq!(ani["status_pembayaran"], "PARTIAL");

    let budi = rows.iter().find(|r| r["user_id"] == json!(bendahara.id)).unwrap();
    assert_eq!(budi["status_pembayaran"], "BELUM");
}

#[actix_web::test]
async fn second_delete_request_is_rejected() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&bendahara);
    let id = seed_payment(&ctx, &token, &anggota.id.to_string(), &[1], 50_000).await;

    let app = app!(ctx);
    let uri = format!("/api/iuran/pembayaran?id={}&action=request_delete", id);

    let first = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let resp = test::call_service(&app, first).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["delete_status"], "requested");
    assert_eq!(body["delete_requested_by"], json!(bendahara.id));

    let second = test::TestRequest::put()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "delete_already_requested");
}

#[actix_web::test]
async fn approval_needs_admin_and_a_pending_request() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let b_token = ctx.token(&bendahara);
    let a_token = ctx.token(&admin);

    seed_config(&ctx, &b_token, 2025, 50_000).await;
    let id = seed_payment(&ctx, &b_token, &anggota.id.to_string(), &[1, 2], 100_000).await;
    let app = app!(ctx);
    let approve_uri = format!("/api/iuran/pembayaran?id={}&action=approve_delete", id);

    // Bendahara tidak boleh menyetujui.
    let req = test::TestRequest::put()
        .uri(&approve_uri)
        .insert_header((header::AUTHORIZATION, b_token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&approve_uri)
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "delete_request_required");

    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}&action=request_delete", id))
        .insert_header((header::AUTHORIZATION, b_token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&approve_uri)
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["delete_status"], "approved");
    assert!(!body["deleted_at"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/iuran/pembayaran?tahun=2025")
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(rows.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/api/iuran/pembayaran?id={}", id))
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // Pembayaran yang dihapus tidak lagi dihitung.
    let req = test::TestRequest::get()
        .uri("/api/iuran/checklist?tahun=2025")
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ani = rows.iter().find(|r| r["user_id"] == json!(anggota.id)).unwrap();
    assert_eq!(ani["total_dibayar"], 0);
    assert_eq!(ani["status_pembayaran"], "BELUM");

    // Persetujuan ulang: barisnya sudah tidak ada.
    let req = test::TestRequest::put()
        .uri(&approve_uri)
        .insert_header((header::AUTHORIZATION, a_token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_cannot_request_delete() {
    let ctx = TestContext::new();
    let admin = ctx.user("Admin", Role::Admin).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&admin);
    let id = seed_payment(&ctx, &token, &anggota.id.to_string(), &[5], 50_000).await;

    let app = app!(ctx);
    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}&action=request_delete", id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/iuran/pembayaran?id={}", id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["delete_status"], "active");
}

#[actix_web::test]
async fn requested_payment_is_locked_for_edits() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&bendahara);
    let id = seed_payment(&ctx, &token, &anggota.id.to_string(), &[1], 50_000).await;
    let app = app!(ctx);

    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}", id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "jumlah": 100_000, "bulan_dibayar": [2, 1] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["jumlah"], 100_000);
    assert_eq!(body["bulan_dibayar"], json!([1, 2]));

    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}&action=request_delete", id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}", id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "jumlah": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "payment_locked");
}

#[actix_web::test]
async fn invalid_payments_and_actions_are_rejected() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&bendahara);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/iuran/pembayaran")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({
            "user_id": anggota.id,
            "periode_tahun": 2025,
            "bulan_dibayar": [0, 13],
            "jumlah": 50_000,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/iuran/pembayaran")
        .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
        .set_json(json!({
            "user_id": anggota.id,
            "periode_tahun": 2025,
            "bulan_dibayar": [1],
            "jumlah": 50_000,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/iuran/pembayaran?id={}&action=hapus", anggota.id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/iuran/pembayaran?id={}", anggota.id))
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::METHOD_NOT_ALLOWED
    );
}

#[actix_web::test]
async fn config_upsert_replaces_the_year() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let token = ctx.token(&bendahara);

    seed_config(&ctx, &token, 2025, 50_000).await;
    seed_config(&ctx, &token, 2025, 75_000).await;

    let app = app!(ctx);
    let req = test::TestRequest::get()
        .uri("/api/iuran/config?tahun=2025")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["nominal"], 75_000);
    assert_eq!(rows[0]["status"], "aktif");
}

#[actix_web::test]
async fn amounts_beyond_a_trillion_are_rejected() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let token = ctx.token(&bendahara);
    let app = app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/iuran/config")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({ "periode_tahun": 2025, "nominal": 1_000_000_000_000_000_000i64 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(kind(&body), "validation");

    let req = test::TestRequest::post()
        .uri("/api/iuran/pembayaran")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .set_json(json!({
            "user_id": anggota.id,
            "periode_tahun": 2025,
            "bulan_dibayar": [1],
            "jumlah": i64::MAX,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/iuran/checklist?tahun=2025")
        .insert_header((header::AUTHORIZATION, token.as_str()))
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(rows.iter().all(|r| r["total_iuran"].is_null() && r["total_dibayar"] == 0));
}

#[actix_web::test]
async fn members_are_forbidden_before_the_action_is_read() {
    let ctx = TestContext::new();
    let bendahara = ctx.user("Budi Bendahara", Role::Bendahara).await;
    let anggota = ctx.user("Ani Anggota", Role::Anggota).await;
    let id = seed_payment(&ctx, &ctx.token(&bendahara), &anggota.id.to_string(), &[1], 50_000).await;
    let app = app!(ctx);

    for action in ["bogus", "request_delete"] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/iuran/pembayaran?id={}&action={}", id, action))
            .insert_header((header::AUTHORIZATION, ctx.token(&anggota)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", action);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(kind(&body), "forbidden");
    }
}
