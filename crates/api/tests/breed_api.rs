//! End-to-end tests for the breed vocabulary endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{bare_request, body_json, build_test_app, json_request, seed_user_with_token};

fn gir_payload() -> serde_json::Value {
    json!({
        "name": "Gir",
        "species": "cattle",
        "breed_status": "indigenous",
        "temperament": "docile",
        "conservation_status": "not_at_risk",
        "milk_yield_min": 6.0,
        "milk_yield_max": 10.0,
        "milk_yield_unit": "l/day",
        "description": "Zebu dairy breed from Gujarat"
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn breed_crud_round_trip(pool: PgPool) {
    let (_, auth) = seed_user_with_token(&pool, "Meera", "moderator").await;
    let app = build_test_app(pool);

    let created = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/breeds", Some(&auth), gir_payload()))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/breeds", None))
        .await
        .unwrap();
    let listed = body_json(listed).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let updated = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/v1/breeds/Gir",
            Some(&auth),
            json!({ "conservation_status": "vulnerable" }),
        ))
        .await
        .unwrap();
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["conservation_status"], "vulnerable");
    assert_eq!(updated["species"], "cattle");

    let deleted = app
        .clone()
        .oneshot(bare_request("DELETE", "/api/v1/breeds/Gir", Some(&auth)))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app
        .oneshot(bare_request("GET", "/api/v1/breeds/Gir", None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn breed_writes_require_moderator(pool: PgPool) {
    let (_, user_auth) = seed_user_with_token(&pool, "Ravi", "user").await;
    let app = build_test_app(pool);

    let response = app
        .oneshot(json_request("POST", "/api/v1/breeds", Some(&user_auth), gir_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_enumeration_member_is_rejected_before_the_database(pool: PgPool) {
    let (_, auth) = seed_user_with_token(&pool, "Meera", "moderator").await;
    let app = build_test_app(pool);

    let mut payload = gir_payload();
    payload["temperament"] = json!("feisty");

    let response = app
        .oneshot(json_request("POST", "/api/v1/breeds", Some(&auth), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inverted_measure_range_is_rejected(pool: PgPool) {
    let (_, auth) = seed_user_with_token(&pool, "Meera", "moderator").await;
    let app = build_test_app(pool);

    let mut payload = gir_payload();
    payload["milk_yield_min"] = json!(12.0);
    payload["milk_yield_max"] = json!(6.0);

    let response = app
        .oneshot(json_request("POST", "/api/v1/breeds", Some(&auth), payload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn origin_lifecycle_and_validation(pool: PgPool) {
    let (_, auth) = seed_user_with_token(&pool, "Meera", "moderator").await;
    let app = build_test_app(pool);

    for name in ["Gir", "Brazilian Gir"] {
        let mut payload = gir_payload();
        payload["name"] = json!(name);
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/breeds", Some(&auth), payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // self-loop rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/breeds/Gir/origins",
            Some(&auth),
            json!({ "parent_breed_name": "Gir" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // contribution outside 0..100 rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/breeds/Brazilian%20Gir/origins",
            Some(&auth),
            json!({ "parent_breed_name": "Gir", "contribution_pct": 140.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // valid edge round trip
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/breeds/Brazilian%20Gir/origins",
            Some(&auth),
            json!({ "parent_breed_name": "Gir", "contribution_pct": 100.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let edge = body_json(response).await;

    let listed = app
        .clone()
        .oneshot(bare_request("GET", "/api/v1/breeds/Brazilian%20Gir/origins", None))
        .await
        .unwrap();
    let listed = body_json(listed).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let deleted = app
        .oneshot(bare_request(
            "DELETE",
            &format!("/api/v1/breeds/Brazilian%20Gir/origins/{}", edge["id"]),
            Some(&auth),
        ))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}
